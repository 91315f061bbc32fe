//! Runner configuration: a TOML file, overridden by command-line flags.
//!
//! ```toml
//! load_address = 0x0100
//! entry_point = 0x0100
//! max_steps = 1000000
//! stop_on_halt = true
//!
//! [clock]
//! mhz = 3.5
//! realtime = false
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use z80emu_core::core::ClockConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub clock: ClockConfig,
    /// Where the image is copied into memory.
    pub load_address: u16,
    /// Initial PC; the load address when unset.
    pub entry_point: Option<u16>,
    pub max_steps: Option<u64>,
    pub stop_on_halt: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            load_address: 0,
            entry_point: None,
            max_steps: None,
            stop_on_halt: true,
        }
    }
}

impl RunnerConfig {
    pub fn entry(&self) -> u16 {
        self.entry_point.unwrap_or(self.load_address)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `explicit` if given (it must exist), else from the per-user
    /// config file if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };
        log::debug!("reading config from {}", path.display());
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text, &path)
    }
}

/// `<config_dir>/z80emu/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("z80emu").join("config.toml"))
}

/// Parse a 16-bit address given as decimal, `0x1234`, or `1234h`.
pub fn parse_address(s: &str) -> Result<u16, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else if let Some(hex) = s.strip_suffix('h').or_else(|| s.strip_suffix('H')) {
        u16::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid address {s:?}: {e}"))
}
