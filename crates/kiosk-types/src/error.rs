//! Error types for the kiosk browser.

use std::io;

/// Errors produced by the kiosk browser.
#[derive(Debug, thiserror::Error)]
pub enum KioskError {
    #[error("invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("VFS error: {0}")]
    Vfs(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, KioskError>;
