use thiserror::Error;

// Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum FixError {
    #[error("{usage}")]
    Usage { usage: String },

    #[error("could not convert string to float: '{token}'")]
    Number { token: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixError {
    pub fn number(token: &str) -> Self {
        FixError::Number { token: token.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, FixError>;
