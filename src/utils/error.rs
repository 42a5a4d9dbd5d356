use crate::utils::output::OutputStyle;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for consistent error handling across the application
pub type AppResult<T> = Result<T, AppError>;

pub fn report_error(err: &AppError) {
    match err {
        AppError::Config(msg) => {
            eprintln!("⚠️  {}", OutputStyle::warning(&format!("Config: {}", msg)));
        }
        AppError::Io(msg) => {
            eprintln!("❌ {}", OutputStyle::error(msg));
        }
        AppError::Serialization(msg) => {
            eprintln!("❌ {}", OutputStyle::error(&format!("Serialization: {}", msg)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Config("marker cannot be empty".to_string());
        assert_eq!(err.to_string(), "Config error: marker cannot be empty");

        let err = AppError::Io("permission denied".to_string());
        assert_eq!(err.to_string(), "IO error: permission denied");
    }
}
