//! Error types for the mathzone formula layout library.
//!
//! The classifier and the scorer are total over their inputs and never fail.
//! Errors only surface where configuration or observation documents enter the
//! library.

use thiserror::Error;

/// Primary error type for configuration and document decoding.
#[derive(Error, Debug)]
pub enum MathzoneError {
    #[error("invalid config value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

impl MathzoneError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience Result type alias for MathzoneError.
pub type Result<T> = std::result::Result<T, MathzoneError>;

/// Checks that a threshold is finite and non-negative.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(MathzoneError::invalid(
            field,
            format!("expected a finite non-negative number, got {value}"),
        ));
    }
    Ok(())
}

/// Checks that a value lies inside the closed range `[lo, hi]`.
pub(crate) fn ensure_in_range(field: &'static str, value: f64, lo: f64, hi: f64) -> Result<()> {
    if !value.is_finite() || value < lo || value > hi {
        return Err(MathzoneError::invalid(
            field,
            format!("expected a number in [{lo}, {hi}], got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negative_rejects_nan_and_negative() {
        assert!(ensure_non_negative("gap", 0.0).is_ok());
        assert!(ensure_non_negative("gap", -1.0).is_err());
        assert!(ensure_non_negative("gap", f64::NAN).is_err());
        assert!(ensure_non_negative("gap", f64::INFINITY).is_err());
    }

    #[test]
    fn invalid_config_message_names_field() {
        let err = ensure_in_range("center_tolerance", 0.9, 0.0, 0.5).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("center_tolerance"), "{msg}");
        assert!(msg.contains("[0, 0.5]"), "{msg}");
    }
}
