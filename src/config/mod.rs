//! Runner configuration.
//!
//! A [`RunnerConfig`] chooses the traversal discipline and the stop
//! conditions of a [`Runner`](crate::pipeline::Runner) run. It is stored as
//! TOML by default; files with a `.json` extension are read and written as
//! JSON instead.
//!
//! ```toml
//! traversal = "infinite"
//! max_visits = 500
//! stop_when_silent = true
//! set_up = true
//! dismantle = true
//! ```

use crate::error::{FlowError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Level-order discipline used to pick the next node to visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    /// Every reachable node once, then stop.
    #[default]
    OneShot,
    /// Rounds over an ever-growing depth window, never ends on its own.
    Infinite,
    /// The full closure, cycled forever.
    RepeatedOneShot,
}

impl TraversalMode {
    /// Whether the iterator for this mode ends by itself.
    pub fn is_bounded(&self) -> bool {
        matches!(self, TraversalMode::OneShot)
    }
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalMode::OneShot => write!(f, "one_shot"),
            TraversalMode::Infinite => write!(f, "infinite"),
            TraversalMode::RepeatedOneShot => write!(f, "repeated_one_shot"),
        }
    }
}

/// Settings for one graph run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub traversal: TraversalMode,

    /// Upper bound on processing visits. Always applies, and is the only
    /// bound for the endless traversals when `stop_when_silent` is off.
    #[serde(default = "default_max_visits")]
    pub max_visits: u64,

    /// Stop once every source visited during a full round produced nothing.
    #[serde(default = "default_true")]
    pub stop_when_silent: bool,

    /// Run the setting-up visitor before processing.
    #[serde(default = "default_true")]
    pub set_up: bool,

    /// Run the dismantling visitor after processing, even on failure.
    #[serde(default = "default_true")]
    pub dismantle: bool,
}

fn default_max_visits() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            traversal: TraversalMode::default(),
            max_visits: default_max_visits(),
            stop_when_silent: true,
            set_up: true,
            dismantle: true,
        }
    }
}

impl RunnerConfig {
    pub fn with_traversal(mut self, traversal: TraversalMode) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_max_visits(mut self, max_visits: u64) -> Self {
        self.max_visits = max_visits;
        self
    }

    pub fn with_stop_when_silent(mut self, stop: bool) -> Self {
        self.stop_when_silent = stop;
        self
    }

    /// Enable or disable both lifecycle passes.
    pub fn with_lifecycle(mut self, enabled: bool) -> Self {
        self.set_up = enabled;
        self.dismantle = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_visits == 0 {
            return Err(FlowError::Config("max_visits must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| FlowError::Config(format!("Failed to parse runner config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| FlowError::Config(format!("Failed to serialize runner config: {}", e)))
    }

    /// Load from disk; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FlowError::Config(format!("Failed to read runner config {:?}: {}", path, e))
        })?;

        if is_json(path) {
            let config: Self = serde_json::from_str(&content).map_err(|e| {
                FlowError::Config(format!("Failed to parse runner config {:?}: {}", path, e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Load from disk, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load runner config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save to disk in the format implied by the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FlowError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| {
                FlowError::Config(format!("Failed to serialize runner config: {}", e))
            })?
        } else {
            self.to_toml_string()?
        };

        std::fs::write(path, content).map_err(|e| {
            FlowError::Config(format!("Failed to write runner config {:?}: {}", path, e))
        })
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
