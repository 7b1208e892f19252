//! Error type shared by every calculator, loader and upstream client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolsError {
    /// Rejected by the validation layer before any calculation ran
    #[error("{field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    #[error("Exchange rate not available for {0}")]
    RateUnavailable(String),

    #[error("No tool is registered at {0}")]
    UnknownRoute(String),

    #[error("OPENAI_API_KEY is not set on the server.")]
    MissingApiKey,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ToolsError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput { field, message: message.into() }
    }

    /// True for errors caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::RateUnavailable(_) | Self::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ToolsError>;

/// Reject unless `value` is finite and strictly positive
pub(crate) fn ensure_positive(field: &'static str, value: f64, message: &str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ToolsError::invalid(field, message))
    }
}

/// Reject unless `value` is finite and not negative
pub(crate) fn ensure_non_negative(field: &'static str, value: f64, message: &str) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ToolsError::invalid(field, message))
    }
}

/// Reject unless `value` lies in `[min, max]`
pub(crate) fn ensure_range(field: &'static str, value: f64, min: f64, max: f64, message: &str) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ToolsError::invalid(field, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = ToolsError::invalid("home_price", "Home price must be greater than 0");
        assert_eq!(err.to_string(), "home_price: Home price must be greater than 0");
        assert!(err.is_client_error());
        assert!(!ToolsError::MissingApiKey.is_client_error());
    }

    #[test]
    fn test_guards() {
        assert!(ensure_positive("x", 1.0, "m").is_ok());
        assert!(ensure_positive("x", 0.0, "m").is_err());
        assert!(ensure_positive("x", f64::NAN, "m").is_err());
        assert!(ensure_non_negative("x", 0.0, "m").is_ok());
        assert!(ensure_non_negative("x", -0.01, "m").is_err());
        assert!(ensure_range("x", 30.0, 0.0, 30.0, "m").is_ok());
        assert!(ensure_range("x", 30.5, 0.0, 30.0, "m").is_err());
    }
}
