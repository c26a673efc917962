/// Errors from the orchestration layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Tree error: {0}")]
    Tree(#[from] polyfs::Error),

    #[error("Side store error: {0}")]
    SideStore(#[from] sidecar::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether a caller may reasonably retry the failed operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Tree(polyfs::Error::Io(_)))
    }
}
