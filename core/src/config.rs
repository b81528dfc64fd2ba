//! Runtime configuration loaded from the data/ directory.
//!
//! Scoring weights are deliberately absent: they live as constants in
//! `history.rs` and are not tunable per deployment.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotaConfig {
    /// Example titles shown per volunteer in a conflict preview.
    pub conflict_preview_limit: usize,
    /// Note attached to assignments created from suggestions.
    pub auto_schedule_note: String,
    /// chrono format for services with neither title nor event type.
    pub fallback_title_format: String,
}

impl Default for RotaConfig {
    fn default() -> Self {
        Self {
            conflict_preview_limit: 3,
            auto_schedule_note: "auto_schedule".into(),
            fallback_title_format: "%d/%m/%Y".into(),
        }
    }
}

impl RotaConfig {
    /// Load from `{data_dir}/rota.json`. Missing keys take their defaults.
    /// In tests, use RotaConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/rota.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: RotaConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.auto_schedule_note.trim().is_empty() {
            anyhow::bail!("{path}: auto_schedule_note must not be empty");
        }
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::default()
    }
}
