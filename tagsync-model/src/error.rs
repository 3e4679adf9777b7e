use std::fmt::{self, Display};

/// Errors produced by model constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    EmptyTagName,
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::EmptyTagName => write!(f, "tag name must not be empty"),
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
