use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Missing credentials/config or a missing Node.js runtime.
    Environment(String),
    /// The browser-side flow broke: login, missing element, export trigger.
    Automation(String),
    /// Bad user input: dates, column selections.
    Validation(String),
    /// Malformed CSV: missing header, ragged rows.
    Format(String),
    Http(String),
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Environment(msg) => write!(f, "Environment error: {}", msg),
            AppError::Automation(msg) => write!(f, "Automation error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Format(msg) => write!(f, "Format error: {}", msg),
            AppError::Http(msg) => write!(f, "HTTP error: {}", msg),
            AppError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Format(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Http(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
