//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/i3ricing/config.json`.
//! Every field is optional; a missing file means compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "socket_path": "/run/user/1000/i3/ipc-socket.1234",
//!   "ignored_outputs": ["__i3", "xroot-0"],
//!   "primary_first": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the invisible output i3 uses to hold the scratchpad.
pub const STASH_OUTPUT: &str = "__i3";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit IPC socket path.  When unset the socket is discovered from
    /// `$I3SOCK`, `$SWAYSOCK` or `i3 --get-socketpath`.
    pub socket_path: Option<String>,

    /// Tree outputs that never take part in output lookups.
    pub ignored_outputs: Vec<String>,

    /// Sort the primary RandR output first when numbering outputs.
    ///
    /// `dmenu -m` and friends count monitors the way
    /// `xrandr --listactivemonitors` does, which lists the primary first.
    pub primary_first: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: None,
            ignored_outputs: vec![STASH_OUTPUT.to_string()],
            primary_first: true,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Whether the tree output called `name` is excluded from lookups.
    pub fn is_ignored_output(&self, name: &str) -> bool {
        self.ignored_outputs.iter().any(|o| o == name)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
