//! Configuration error types.

/// Errors that can occur when loading or validating a world configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to parse TOML content.
    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    /// Parsed values violate a sizing constraint.
    #[error("invalid config: {0}")]
    Invalid(String),
}
