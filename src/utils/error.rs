use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unknown category: {category_id}")]
    UnknownCategory { category_id: String },

    #[error("Unknown option '{option_id}' in category '{category_id}'")]
    UnknownOption {
        category_id: String,
        option_id: String,
    },

    #[error("No services selected")]
    NoSelections,

    #[error("Cannot {action} from the {stage} stage")]
    InvalidTransition { action: String, stage: String },

    #[error("{message}")]
    SubmissionUnavailable { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Catalog,
    Input,
    Session,
    Backend,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EstimatorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EstimatorError::ConfigValidationError { .. }
            | EstimatorError::InvalidConfigValueError { .. }
            | EstimatorError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EstimatorError::UnknownCategory { .. } | EstimatorError::UnknownOption { .. } => {
                ErrorCategory::Catalog
            }
            EstimatorError::ValidationError { .. } => ErrorCategory::Input,
            EstimatorError::NoSelections | EstimatorError::InvalidTransition { .. } => {
                ErrorCategory::Session
            }
            EstimatorError::SubmissionUnavailable { .. } => ErrorCategory::Backend,
            EstimatorError::IoError(_) | EstimatorError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Session => ErrorSeverity::Low,
            ErrorCategory::Backend => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Catalog | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Only the backend can fail transiently; everything else needs a change of input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EstimatorError::SubmissionUnavailable { .. })
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EstimatorError::IoError(_) => {
                "Check that the file exists and is readable".to_string()
            }
            EstimatorError::SerializationError(_) => {
                "Check the JSON syntax of the catalog file".to_string()
            }
            EstimatorError::ConfigValidationError { field, .. }
            | EstimatorError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' entry in the configuration", field)
            }
            EstimatorError::MissingConfigError { field } => {
                format!("Add the '{}' entry to the configuration", field)
            }
            EstimatorError::ValidationError { .. } => {
                "Correct the highlighted form fields and submit again".to_string()
            }
            EstimatorError::UnknownCategory { .. } | EstimatorError::UnknownOption { .. } => {
                "Run the `catalog` command to list valid category and option ids".to_string()
            }
            EstimatorError::NoSelections => {
                "Select at least one service before continuing".to_string()
            }
            EstimatorError::InvalidTransition { .. } => {
                "Go back to the previous step and try again".to_string()
            }
            EstimatorError::SubmissionUnavailable { .. } => {
                "Wait a moment and submit the quote again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EstimatorError::SubmissionUnavailable { message } => message.clone(),
            EstimatorError::NoSelections => {
                "Your quote is empty. Pick a project type or a service first.".to_string()
            }
            EstimatorError::ValidationError { message } => format!("Please check the form: {}", message),
            EstimatorError::UnknownCategory { category_id } => {
                format!("There is no '{}' step in this estimator.", category_id)
            }
            EstimatorError::UnknownOption {
                category_id,
                option_id,
            } => format!("'{}' is not an option of '{}'.", option_id, category_id),
            other => format!("Something went wrong: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, EstimatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_submission_failures_are_retryable() {
        let unavailable = EstimatorError::SubmissionUnavailable {
            message: "down".to_string(),
        };
        assert!(unavailable.is_retryable());
        assert_eq!(unavailable.category(), ErrorCategory::Backend);
        assert_eq!(unavailable.severity(), ErrorSeverity::Medium);
        assert_eq!(unavailable.user_friendly_message(), "down");

        assert!(!EstimatorError::NoSelections.is_retryable());
        assert!(!EstimatorError::MissingConfigError {
            field: "pricing.currency".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_severity_ordering() {
        let io = EstimatorError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert!(io.severity() > EstimatorError::NoSelections.severity());
    }
}
