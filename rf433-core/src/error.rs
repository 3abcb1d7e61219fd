#![forbid(unsafe_code)]

//! Common error type for rf433 crates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// I/O related failures.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parsing failures.
    #[error("Config parse error: {0}")]
    ConfigParse(toml::de::Error),

    /// The persistent byte store failed verification even after a reformat.
    #[error("Persistent store unwritable")]
    StoreUnwritable,
}

/// Convenient alias for results throughout rf433 crates.
pub type Result<T> = std::result::Result<T, Error>;
