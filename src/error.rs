use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error: source and target languages are identical")]
    IdenticalLanguages,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Service error: {0}")]
    Service(String),
}

impl AppError {
    /// Warnings are detected before any model call is made; service errors
    /// carry an upstream failure.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::IdenticalLanguages | AppError::Configuration(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = AppError::Validation("product name is required".to_string());
        assert_eq!(
            error.to_string(),
            "Validation error: product name is required"
        );
        assert!(error.is_warning());
    }

    #[test]
    fn test_identical_languages_error() {
        let error = AppError::IdenticalLanguages;
        assert_eq!(
            error.to_string(),
            "Validation error: source and target languages are identical"
        );
        assert!(error.is_warning());
    }

    #[test]
    fn test_configuration_error() {
        let error = AppError::Configuration("HF_API_TOKEN not set".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: HF_API_TOKEN not set"
        );
        assert!(error.is_warning());
    }

    #[test]
    fn test_service_error_is_not_warning() {
        let error = AppError::Service("upstream timeout".to_string());
        assert_eq!(error.to_string(), "Service error: upstream timeout");
        assert!(!error.is_warning());
    }

    #[test]
    fn test_app_result_ok() {
        fn returns_ok() -> AppResult<i32> {
            Ok(42)
        }
        let result = returns_ok();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_app_result_err() {
        fn returns_err() -> AppResult<i32> {
            Err(AppError::IdenticalLanguages)
        }
        assert!(returns_err().is_err());
    }
}
