//! Error types for the status badge workspace.
//!
//! Only failures that happen while drawing or encoding travel as errors.
//! Bad query parameters and missing assets are absorbed earlier and never
//! surface here.

use thiserror::Error;

/// Result type alias using BadgeError.
pub type BadgeResult<T> = Result<T, BadgeError>;

/// Primary error type for badge operations.
#[derive(Debug, Error)]
pub enum BadgeError {
    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    Config(String),

    // === Asset Errors ===
    /// Raised inside asset providers only; callers receive `None` instead.
    #[error("Asset unavailable '{name}': {message}")]
    Asset { name: String, message: String },

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BadgeError {
    /// Build an asset error from any displayable cause.
    pub fn asset(name: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        BadgeError::Asset {
            name: name.into(),
            message: cause.to_string(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            BadgeError::Asset { .. } => 404,
            BadgeError::Config(_)
            | BadgeError::Render(_)
            | BadgeError::Encode(_)
            | BadgeError::Internal(_) => 500,
        }
    }
}

impl From<std::io::Error> for BadgeError {
    fn from(err: std::io::Error) -> Self {
        BadgeError::Internal(err.to_string())
    }
}

impl From<serde_yaml::Error> for BadgeError {
    fn from(err: serde_yaml::Error) -> Self {
        BadgeError::Config(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_errors_map_to_500() {
        assert_eq!(BadgeError::Render("boom".into()).http_status_code(), 500);
        assert_eq!(BadgeError::Encode("boom".into()).http_status_code(), 500);
    }

    #[test]
    fn test_asset_error_message() {
        let err = BadgeError::asset("card_gold.png", "No such file");
        assert_eq!(
            err.to_string(),
            "Asset unavailable 'card_gold.png': No such file"
        );
    }
}
