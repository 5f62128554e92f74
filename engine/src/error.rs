use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("XML error: {0}")]
    XmlError(String),

    // The file opened but is not a word-processing document we can walk.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl EngineError {
    pub fn archive(message: impl Into<String>) -> Self {
        Self::ArchiveError(message.into())
    }

    pub fn xml(message: impl Into<String>) -> Self {
        Self::XmlError(message.into())
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument(message.into())
    }
}

impl From<zip::result::ZipError> for EngineError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(source) => EngineError::IoError { source },
            other => EngineError::ArchiveError(other.to_string()),
        }
    }
}
