//! Undo/redo history limits.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default maximum number of undo entries.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Default byte budget for the undo stack (estimated, not measured).
pub const DEFAULT_MAX_BYTES: usize = 50 * 1024 * 1024;

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_BYTES
}

/// Bounds enforced on the undo stack after every push.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Maximum number of undo entries kept.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Budget for the sum of the undo entries' estimated sizes. The newest
    /// entry is always kept even if it alone exceeds the budget.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl HistoryConfig {
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        Self {
            max_entries,
            max_bytes,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_entries == 0 {
            return Err(ConfigError::ZeroEntries);
        }
        if self.max_bytes == 0 {
            return Err(ConfigError::ZeroBytes);
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
