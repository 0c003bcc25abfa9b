//! Watch mode configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! debounce_ms = 200
//! cooldown_ms = 800
//! ```

use serde::{Deserialize, Serialize};

/// Watch mode settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet window after the last change event before a rebuild starts.
    /// Coalesces editor write bursts into a single rebuild.
    pub debounce_ms: u64,
    /// Minimum pause between two consecutive rebuilds.
    pub cooldown_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            cooldown_ms: 800,
        }
    }
}
