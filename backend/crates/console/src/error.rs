//! Console error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The server answered with an error body
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        details: Vec<String>,
    },

    /// No answer, or an answer that was not the expected JSON
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("You must be logged in to {0}")]
    NotLoggedIn(&'static str),

    #[error("token store error: {0}")]
    Store(#[from] std::io::Error),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

impl ConsoleError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ConsoleError::Api { status: 401, .. })
    }

    /// Text for the error banner; `fallback` stands in for failures the
    /// server never explained.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ConsoleError::Api { message, .. } if !message.is_empty() => message.clone(),
            ConsoleError::NotLoggedIn(_) => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}
