/// Errors from the side-store layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Tree error: {0}")]
    Tree(#[from] polyfs::Error),

    #[error("Store {store}: {message}")]
    Store { store: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No store named {0:?}")]
    UnknownStore(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn store<S: Into<String>, M: Into<String>>(store: S, message: M) -> Self {
        Error::Store {
            store: store.into(),
            message: message.into(),
        }
    }

    pub fn unknown_store<S: Into<String>>(name: S) -> Self {
        Error::UnknownStore(name.into())
    }
}
