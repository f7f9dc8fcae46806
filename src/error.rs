//! Centralized error types for mirrorgen
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use thiserror::Error;

/// Top-level error type for generation operations
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Interpolation error: {0}")]
    Interpolate(#[from] InterpolateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Placeholder substitution errors
#[derive(Error, Debug)]
pub enum InterpolateError {
    #[error("No value for placeholder {{{name}}}")]
    MissingVariable { name: String },

    #[error("Unmatched brace in template string: {text}")]
    UnmatchedBrace { text: String },
}

/// Input document errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Required configuration missing: {key}")]
    MissingKey { key: String },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Duplicate registry name: {name}. Registry names must be unique")]
    DuplicateRegistry { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_display() {
        let err = InterpolateError::MissingVariable {
            name: "name".to_string(),
        };
        assert!(err.to_string().contains("{name}"));
    }

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::MissingKey {
            key: "registries".to_string(),
        };
        let gen_err: GenerateError = config_err.into();
        assert!(matches!(gen_err, GenerateError::Config(_)));
    }
}
