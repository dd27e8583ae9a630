//! Ambient signal consulted by the required-variable guard.

use polvar_store::Registry;

/// Answers whether any variable value source is registered in the process.
pub trait VariableSourceProbe {
    fn has_value_sources(&self) -> bool;
}

impl VariableSourceProbe for Registry {
    fn has_value_sources(&self) -> bool {
        self.has_policies()
    }
}

impl VariableSourceProbe for bool {
    fn has_value_sources(&self) -> bool {
        *self
    }
}

impl<T: VariableSourceProbe + ?Sized> VariableSourceProbe for &T {
    fn has_value_sources(&self) -> bool {
        (**self).has_value_sources()
    }
}
