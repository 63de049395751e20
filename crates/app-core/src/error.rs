use thiserror::Error;

/// Reasons a raw landmark buffer cannot be turned into a [`crate::HandFrame`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("expected 42 or 63 landmark values, got {0}")]
    BadLength(usize),
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("line {line}: unknown media kind `{kind}`")]
    UnknownKind { line: usize, kind: String },
    #[error("line {line}: missing source reference")]
    MissingSource { line: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("playlist has no tracks")]
    EmptyPlaylist,
}
