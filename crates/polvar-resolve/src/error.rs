//! Errors surfaced by variable resolution.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The policy needs variables but no value was supplied for this resource.
    #[error(
        "policy `{policy}` has variables; pass values for resource `{resource}` using the --set or --values-file flag"
    )]
    MissingVariableValues { policy: String, resource: String },
}
