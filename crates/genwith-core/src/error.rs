//! Error handling for the genwith code generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! # Examples
//!
//! ```
//! use genwith_core::error::{Error, Result};
//!
//! fn check_package(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(Error::missing_field("package"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_package("acme").is_ok());
//! ```

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use thiserror::Error;

/// Result type for genwith operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for genwith operations
#[derive(Debug, Error)]
pub enum Error {
    /// Mutually exclusive or dependent flags were misused
    #[error("invalid flag combination: {0}")]
    InvalidCombination(String),

    /// A required string input was absent or empty
    #[error("missing required field: --{0}")]
    MissingRequiredField(String),

    /// The template body itself is malformed
    #[error("template parse error: {0}")]
    TemplateParse(String),

    /// Substitution failed while executing the template
    #[error("template execution error: {0}")]
    RenderExecution(String),

    /// Persisting the generated text failed
    #[error("failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A formatting tool exited unsuccessfully
    #[error("{tool} failed:\n{output}")]
    ExternalTool { tool: String, output: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new invalid-combination error
    pub fn invalid_combination<S: Into<String>>(msg: S) -> Self {
        Self::InvalidCombination(msg.into())
    }

    /// Create a new missing-field error
    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        Self::MissingRequiredField(field.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Name of the stage that produced this error, for operator-facing logs
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidCombination(_) | Self::MissingRequiredField(_) => "validating flags",
            Self::TemplateParse(_) => "parsing template",
            Self::RenderExecution(_) => "executing template",
            Self::FileWrite { .. } => "writing output",
            Self::ExternalTool { .. } => "formatting output",
            Self::Io(_) | Self::Yaml(_) | Self::TomlDe(_) | Self::TomlSer(_) | Self::Config(_) => {
                "loading configuration"
            }
        }
    }
}
