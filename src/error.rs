use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotiveError {
    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("dataset parse error: {0}")]
    DatasetParse(String),

    #[error("dataset contains no observations: {0}")]
    EmptyDataset(String),

    #[error("invalid lexicon: {0}")]
    InvalidLexicon(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MotiveError>;
