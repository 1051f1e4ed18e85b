//! `batchrun.yaml` — runner configuration file.
//!
//! ```yaml
//! engine:
//!   batch_size: 25
//!   yield_delay_ms: 50
//!   failure_mode: collect
//! sequential:
//!   yield_every: 20
//!   yield_delay_ms: 10
//! log:
//!   level: warn
//!   components:
//!     batchrun-engine: debug
//! ```

use anyhow::{Context, Result};
use batchrun_core::config::{EngineConfig, SequentialConfig};
use batchrun_observability::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub sequential: SequentialConfig,
    #[serde(default = "default_log")]
    pub log: LogConfig,
}

fn default_log() -> LogConfig {
    LogConfig {
        level: "warn".into(),
        ..LogConfig::default()
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            sequential: SequentialConfig::default(),
            log: default_log(),
        }
    }
}

impl RunnerConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).context("parsing runner config YAML")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate().context("engine section")?;
        self.sequential.validate().context("sequential section")?;
        Ok(())
    }
}
