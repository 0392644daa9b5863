use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize the HSM model: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Language {0} is not supported")]
    UnsupportedLanguage(String),
    #[error("No state machine found in {0}")]
    NoStateMachine(String),
    #[error("Reverse generation (code -> UML) is not implemented")]
    ReverseUnsupported,
}
