use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported emit format: {0}")]
    UnsupportedFormat(String),
    #[error("[MHS ERROR] Expected ':=' after '{name}'")]
    MissingInitializer { name: String },
    #[error("parse error: {0}")]
    ParseError(String),
}
