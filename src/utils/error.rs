use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Malformed cart payload: {reason}")]
    MalformedCart { reason: String },

    #[error("Product {product_id} out of stock: requested {requested}, available {available}")]
    OutOfStock {
        product_id: u64,
        requested: i64,
        available: i64,
    },

    #[error("Product {product_id} is not in the cart")]
    NotInCart { product_id: u64 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Business,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::ApiError(_) => ErrorCategory::Network,
            CartError::IoError(_) | CartError::StorageError { .. } => ErrorCategory::Storage,
            CartError::SerializationError(_) | CartError::MalformedCart { .. } => {
                ErrorCategory::Data
            }
            CartError::OutOfStock { .. } | CartError::NotInCart { .. } => ErrorCategory::Business,
            CartError::ConfigError { .. }
            | CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 業務規則拒絕，購物車保持不變
            ErrorCategory::Business => ErrorSeverity::Low,
            // 網路錯誤通常可以重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 是否為可重試的錯誤
    pub fn is_retryable(&self) -> bool {
        match self {
            CartError::ApiError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::ApiError(_) => "Could not reach the catalog service".to_string(),
            CartError::IoError(_) | CartError::StorageError { .. } => {
                "Could not access the cart storage".to_string()
            }
            CartError::SerializationError(_) | CartError::MalformedCart { .. } => {
                "The stored cart could not be read".to_string()
            }
            CartError::OutOfStock { product_id, .. } => {
                format!("Product {} does not have enough stock", product_id)
            }
            CartError::NotInCart { product_id } => {
                format!("Product {} is not in the cart", product_id)
            }
            CartError::ConfigError { message } => format!("Configuration problem: {}", message),
            CartError::ConfigValidationError { field, .. }
            | CartError::InvalidConfigValueError { field, .. } => {
                format!("Configuration field '{}' is invalid", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the catalog API is running and the --api-url is correct".to_string()
            }
            ErrorCategory::Storage => {
                "Check that the storage path exists and is writable".to_string()
            }
            ErrorCategory::Data => "Remove the stored cart entry and try again".to_string(),
            ErrorCategory::Business => "Adjust the requested quantity".to_string(),
            ErrorCategory::Configuration => {
                "Review the command line flags or the TOML configuration file".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_errors_are_low_severity() {
        let err = CartError::OutOfStock {
            product_id: 1,
            requested: 2,
            available: 1,
        };
        assert_eq!(err.category(), ErrorCategory::Business);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(!err.is_retryable());

        let err = CartError::NotInCart { product_id: 7 };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().contains('7'));
    }

    #[test]
    fn test_configuration_errors_are_critical() {
        let err = CartError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: "ftp://x".to_string(),
            reason: "Unsupported URL scheme: ftp".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("api.base_url"));
    }

    #[test]
    fn test_serde_errors_convert_into_data_errors() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CartError = parse_err.into();
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
