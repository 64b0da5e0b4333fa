//! Feature flags and the validated configuration model.
//!
//! A generation run starts from a raw [`Flags`] set, either parsed from the
//! command line or loaded from a YAML/TOML file. [`Flags::validate`] is the
//! only way to obtain a [`Config`], so every `Config` the renderer sees is a
//! self-consistent selection of features.
//!
//! # Examples
//!
//! ```
//! use genwith_core::config::{Flag, Flags};
//!
//! let flags = Flags {
//!     include_config: true,
//!     include_endpoint_value: true,
//!     package: "acme".to_string(),
//!     ..Default::default()
//! };
//! let config = flags.validate().unwrap();
//! assert!(config.is_set(Flag::EndpointValue));
//! assert_eq!(config.package_name(), "acme");
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::path::Path;

use crate::{provenance, Error};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Decoder used when none is given
pub const DEFAULT_DECODER: &str = "json";

/// Raw, unvalidated feature switches as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, clap::Args)]
#[serde(default, deny_unknown_fields)]
pub struct Flags {
    /// Include client.do function
    #[arg(long = "do")]
    #[serde(rename = "do")]
    pub include_do: bool,

    /// Include token-related options
    #[arg(long = "token")]
    #[serde(rename = "token")]
    pub include_token: bool,

    /// Include config-related options
    #[arg(long = "config")]
    #[serde(rename = "config")]
    pub include_config: bool,

    /// Include oauth2.Endpoint var in config instantiation
    #[arg(long = "endpoint")]
    #[serde(rename = "endpoint")]
    pub include_endpoint_value: bool,

    /// Include oauth2.Endpoint func in config instantiation
    #[arg(long = "endpoint-func")]
    #[serde(rename = "endpoint_func", alias = "endpoint-func")]
    pub include_endpoint_func: bool,

    /// Include NewClient & options
    #[arg(long = "client")]
    #[serde(rename = "client")]
    pub include_client: bool,

    /// Include a rate limiting transport option
    #[arg(long = "ratelimit")]
    #[serde(rename = "ratelimit")]
    pub include_rate_limiter: bool,

    /// The name of the package for generation
    #[arg(long, default_value = "", hide_default_value = true)]
    pub package: String,

    /// The decoder to use [default: json]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoder: Option<String>,
}

impl Flags {
    /// Check the flag combination and build the configuration model.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidCombination`] if both endpoint flags are set, or if an
    ///   endpoint flag is set without `config`.
    /// * [`Error::MissingRequiredField`] if the package name is empty.
    pub fn validate(&self) -> crate::Result<Config> {
        if self.include_endpoint_value && self.include_endpoint_func {
            return Err(Error::invalid_combination(
                "only one of --endpoint or --endpoint-func allowed",
            ));
        }
        if (self.include_endpoint_value || self.include_endpoint_func) && !self.include_config {
            return Err(Error::invalid_combination(
                "--endpoint or --endpoint-func requires --config",
            ));
        }
        let package = self.package.trim();
        if package.is_empty() {
            return Err(Error::missing_field("package"));
        }

        Ok(Config {
            include_do: self.include_do,
            include_token: self.include_token,
            include_config: self.include_config,
            include_endpoint_value: self.include_endpoint_value,
            include_endpoint_func: self.include_endpoint_func,
            include_client: self.include_client,
            include_rate_limiter: self.include_rate_limiter,
            package_name: package.to_string(),
            decoder_name: self.decoder_name().to_string(),
            invocation_summary: provenance::summarize_flags(self),
        })
    }

    /// Decoder identifier, falling back to [`DEFAULT_DECODER`]
    pub fn decoder_name(&self) -> &str {
        self.decoder.as_deref().unwrap_or(DEFAULT_DECODER)
    }

    /// Lay `overrides` on top of these flags.
    ///
    /// Booleans are OR-ed; the package is replaced when non-empty and the
    /// decoder whenever the override names one.
    pub fn overlay(mut self, overrides: &Flags) -> Self {
        self.include_do |= overrides.include_do;
        self.include_token |= overrides.include_token;
        self.include_config |= overrides.include_config;
        self.include_endpoint_value |= overrides.include_endpoint_value;
        self.include_endpoint_func |= overrides.include_endpoint_func;
        self.include_client |= overrides.include_client;
        self.include_rate_limiter |= overrides.include_rate_limiter;
        if !overrides.package.is_empty() {
            self.package = overrides.package.clone();
        }
        if overrides.decoder.is_some() {
            self.decoder = overrides.decoder.clone();
        }
        self
    }

    /// Load flags from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let content = fs::read_to_string(path).await?;
        log::debug!("Loading flags from {}", path.display());
        let flags = match format {
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };
        Ok(flags)
    }

    /// Save flags to a YAML or TOML file, chosen by extension
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = match FileFormat::from_path(path)? {
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };
        fs::write(path, content).await?;
        Ok(())
    }
}

enum FileFormat {
    Yaml,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> crate::Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            _ => Err(Error::config(format!(
                "unsupported flags file {}: expected .yaml, .yml or .toml",
                path.display()
            ))),
        }
    }
}

/// The boolean switches that gate template regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    Do,
    Token,
    Config,
    EndpointValue,
    EndpointFunc,
    Client,
    RateLimiter,
}

impl Flag {
    /// Returns the command-line spelling of the flag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Do => "do",
            Self::Token => "token",
            Self::Config => "config",
            Self::EndpointValue => "endpoint",
            Self::EndpointFunc => "endpoint-func",
            Self::Client => "client",
            Self::RateLimiter => "ratelimit",
        }
    }

    /// Returns an iterator over all flags, in command-line order
    pub fn all() -> impl Iterator<Item = Self> {
        use Flag::*;
        [
            Do,
            Token,
            Config,
            EndpointValue,
            EndpointFunc,
            Client,
            RateLimiter,
        ]
        .iter()
        .copied()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated, self-consistent selection of features for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    include_do: bool,
    include_token: bool,
    include_config: bool,
    include_endpoint_value: bool,
    include_endpoint_func: bool,
    include_client: bool,
    include_rate_limiter: bool,
    package_name: String,
    decoder_name: String,
    invocation_summary: String,
}

impl Config {
    /// Whether the given switch is on
    pub fn is_set(&self, flag: Flag) -> bool {
        match flag {
            Flag::Do => self.include_do,
            Flag::Token => self.include_token,
            Flag::Config => self.include_config,
            Flag::EndpointValue => self.include_endpoint_value,
            Flag::EndpointFunc => self.include_endpoint_func,
            Flag::Client => self.include_client,
            Flag::RateLimiter => self.include_rate_limiter,
        }
    }

    /// Name of the generated package
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Identifier of the response-body decoder
    pub fn decoder_name(&self) -> &str {
        &self.decoder_name
    }

    /// Human-readable record of the flags used, embedded in the output header
    pub fn invocation_summary(&self) -> &str {
        &self.invocation_summary
    }

    /// Replace the recorded invocation, e.g. with the literal command line
    pub fn with_invocation_summary(mut self, summary: impl Into<String>) -> Self {
        self.invocation_summary = summary.into();
        self
    }
}
