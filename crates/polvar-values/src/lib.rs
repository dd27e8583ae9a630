//! # polvar-values
//!
//! Input layer for policy dry runs: the values document an operator writes
//! next to their tests, and the `--set` overrides collected on the command
//! line.
//!
//! Both are plain data. Resolution and publishing live in `polvar-resolve`.
//!
//! ```text
//! values.yaml ──load──▶ ValuesDocument ─┐
//!                                       ├──▶ Variables (polvar-resolve)
//! --set k=v   ──parse─▶ Overrides ──────┘
//! ```

pub mod document;
pub mod error;
pub mod overrides;

pub use document::{
    ApiResource, ForeachValues, Labels, NamespaceSelector, PolicyValues, ResourceValues,
    RuleValues, Subresource, VALUES_API_VERSION, VALUES_KIND, ValueMap, ValuesDocument,
};
pub use error::ValuesError;
pub use overrides::Overrides;
