use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnyRpgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Invalid config value for {key}: {value}")]
    Config { key: String, value: String },
}

impl From<serde_json::Error> for AnyRpgError {
    fn from(e: serde_json::Error) -> Self {
        AnyRpgError::Serialize(e.to_string())
    }
}
