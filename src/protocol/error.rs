use thiserror::Error;

/// Failure while rendering an intent into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
}

/// Failure while reconstructing an intent from tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty command")]
    Empty,

    #[error("malformed command line: {0}")]
    Malformed(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("unknown flag for '{command}': {flag}")]
    UnknownFlag { command: String, flag: String },

    #[error("flag {0} expects a value")]
    MissingValue(&'static str),

    #[error("flag {0} given more than once")]
    DuplicateFlag(&'static str),

    #[error("invalid value for {flag}: '{value}'")]
    InvalidValue { flag: &'static str, value: String },
}
