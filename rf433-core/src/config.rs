#![forbid(unsafe_code)]

//! rf433 configuration handling. Parses a TOML file into a strongly-typed
//! structure. Timing and code parameters are deliberately absent: they are
//! fixed by the wire format and not operator-tunable.

use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

use crate::Error;

/// Host configuration shared by the rf433 sender and receiver binaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Logging verbosity (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: Option<String>,

    /// Location of the pairing file (counter + shared secret).
    pub secret_file: Option<PathBuf>,

    /// Character device the encoded symbols are written to for transmission.
    #[serde(default = "default_tx_device")]
    pub tx_device: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            secret_file: None,
            tx_device: default_tx_device(),
        }
    }
}

fn default_tx_device() -> String {
    "/dev/tx433".to_string()
}

impl LinkConfig {
    /// Load a configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let data = fs::read_to_string(&path).map_err(Error::from)?;
        let cfg = toml::from_str::<LinkConfig>(&data).map_err(Error::ConfigParse)?;
        Ok(cfg)
    }
}
