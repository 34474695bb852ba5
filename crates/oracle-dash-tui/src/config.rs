/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed dashboard configuration
[POS]:    Configuration layer - connection and timing setup
[UPDATE]: When adding new configuration options
*/

use serde::{Deserialize, Serialize};

/// Top-level configuration for the dashboard
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// WebSocket URL of the oracle service
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Seconds before an unanswered request times out
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Seconds between timeout sweeps over pending requests
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            request_timeout_secs: default_request_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:8910".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_sweep_interval_secs() -> u64 {
    2
}

impl DashboardConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
