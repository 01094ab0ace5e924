use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersioningError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
}
