use anyhow::Context;
use betsplit_core::SettlementConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directory holding session files and `config.json`.
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub settlement: SettlementConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            settlement: SettlementConfig::default(),
        }
    }
}

impl CliConfig {
    /// Read `config.json` from the data directory, falling back to defaults.
    ///
    /// `data_dir` comes from `--data-dir`; without it the platform data
    /// directory is used.
    pub async fn load(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let path = data_dir.join(CONFIG_FILE);
        let mut config: Self = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        config.data_dir = data_dir;

        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("betsplit")
}
