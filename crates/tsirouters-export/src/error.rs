use tsirouters_registry::{JsonlError, RegistryError};

/// Faults while generating artifacts. "Not found" is not one of them.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("artifact write failed: {0}")]
    Io(#[from] JsonlError),

    #[error("archive error: {0}")]
    Archive(String),
}

impl ExportError {
    pub(crate) fn archive(message: impl Into<String>) -> Self {
        Self::Archive(message.into())
    }
}
