/// Represents errors that can occur in tree-provider operations
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The path or node id does not resolve to anything
    #[error("Not found: {0}")]
    NotFound(String),

    /// The capability is not implemented by this provider instance.
    /// Permanent for the instance; callers should disable the affordance
    /// rather than retry.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Transport or backend failure; retryable
    #[error("I/O failure: {0}")]
    Io(String),

    /// Backend-reported conflict (e.g. rename target exists); passed through
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A path segment is empty or contains the separator
    #[error("Invalid segment: {0:?}")]
    InvalidSegment(String),

    /// No mount registered under this name
    #[error("Unknown mount: {0}")]
    UnknownMount(String),

    /// No registered provider's predicate matched this node id
    #[error("No provider for node id: {0}")]
    NoProvider(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Error::NotFound(what.into())
    }

    pub fn not_supported<S: Into<String>>(capability: S) -> Self {
        Error::NotSupported(capability.into())
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Error::Io(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Error::Conflict(message.into())
    }

    pub fn invalid_segment<S: Into<String>>(segment: S) -> Self {
        Error::InvalidSegment(segment.into())
    }

    pub fn unknown_mount<S: Into<String>>(name: S) -> Self {
        Error::UnknownMount(name.into())
    }

    pub fn no_provider<S: Into<String>>(node_id: S) -> Self {
        Error::NoProvider(node_id.into())
    }

    /// Whether a caller may reasonably retry the failed operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
