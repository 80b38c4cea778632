use thiserror::Error;

/// Errors related to registering bindings and managing containers.
#[derive(Error, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingRegistryError {
    #[error("Registration target '{interface}' is not declared as an abstract contract.")]
    InvalidInterface { interface: &'static str },
    #[error("Implementation '{implementation}' does not satisfy interface '{interface}'.")]
    ImplementationMismatch {
        implementation: &'static str,
        interface: &'static str,
    },
    #[error("Unrecognized lifecycle: {0}")]
    InvalidLifecycle(String),
    #[error("Cannot activate container which was never created: {0}")]
    UnknownContainer(String),
}

/// Errors related to resolving instances from the active set.
#[derive(Error, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ResolutionError {
    #[error("No active binding for interface: {interface}")]
    NoActiveBinding { interface: &'static str },
    #[error("Active binding for '{interface}' produced an incompatible instance.")]
    IncompatibleBinding { interface: &'static str },
}

/// Errors surfaced when invoking a wrapped callable. A parameter which is
/// neither supplied by the caller nor covered by an active binding fails with
/// the call contract's own [MissingArgument](InvocationError::MissingArgument)
/// error rather than a resolution error.
#[derive(Error, Clone, Eq, PartialEq, Hash, Debug)]
pub enum InvocationError {
    #[error("Missing required argument: {parameter}")]
    MissingArgument { parameter: &'static str },
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}
