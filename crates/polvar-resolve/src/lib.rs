//! # polvar-resolve
//!
//! Resolves the variable values a policy evaluation sees for one
//! (policy, resource) pair.
//!
//! ## Layers
//!
//! ```text
//! request.operation default   ← highest (only if still unset)
//! --set overrides
//! policy/resource values
//! global values               ← lowest
//! ```
//!
//! Later layers overwrite earlier ones key by key. A collision is never an
//! error.
//!
//! The one hard failure is the required-variable guard: a policy that
//! declares variables, evaluated against an in-scope kind, with no values
//! supplied anywhere while value sources are registered in the process.

pub mod error;
pub mod probe;
pub mod publish;
pub mod variables;

pub use error::ResolveError;
pub use probe::VariableSourceProbe;
pub use variables::{DEFAULT_OPERATION, REQUEST_OPERATION, Variables, VariableQuery};
