//! Error types.
//!
//! [`SessionError`] is the one error kind the session core knows about. It is
//! never propagated to the caller: the session logs it and degrades the
//! affected action. [`ConfigError`] covers reading the INI configuration.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// An audio clip reference required by the session was not supplied.
    #[error("missing configuration asset: please set {asset}")]
    MissingConfigurationAsset { asset: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),
    #[error("invalid value for [{section}] {key}: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        reason: String,
    },
    #[error("failed to save config: {0}")]
    Save(#[from] std::io::Error),
}
