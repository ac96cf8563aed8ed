use std::fmt;

/// Application error types for better error handling and user feedback.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Errors related to reading or writing the reminder store
    Storage(String),
    /// Errors related to parsing persisted or external JSON
    Parse(String),
    /// Errors related to importing an external reminder payload
    Import(String),
    /// Errors related to data validation
    Validation(String),
    /// Errors related to showing or cancelling notifications
    Notify(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AppError::Import(msg) => write!(f, "Import error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Notify(msg) => write!(f, "Notification error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.to_string()
    }
}

// Convenience constructors
impl AppError {
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        AppError::Storage(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        AppError::Parse(msg.into())
    }

    pub fn import<S: Into<String>>(msg: S) -> Self {
        AppError::Import(msg.into())
    }

    pub fn validation<S: Into<String>>(msg: S) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn notify<S: Into<String>>(msg: S) -> Self {
        AppError::Notify(msg.into())
    }
}

/// Result type alias for fallible operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::storage("file not found");
        assert_eq!(err.to_string(), "Storage error: file not found");
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = AppError::import("bad payload");
        let s: String = err.into();
        assert!(s.contains("Import error"));
    }

    #[test]
    fn test_error_constructors() {
        let storage_err = AppError::storage("test");
        assert!(matches!(storage_err, AppError::Storage(_)));

        let validation_err = AppError::validation("test");
        assert!(matches!(validation_err, AppError::Validation(_)));
    }
}
