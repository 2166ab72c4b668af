//! Engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for recording and replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Periodic pointer sampling cadence while recording, in milliseconds.
    pub sample_interval_ms: u64,

    /// Gap between consecutive recorded timestamps above which replay
    /// surfaces an idle-gap diagnostic. Diagnostic only, never alters
    /// scheduling.
    pub gap_threshold_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: 100,
            gap_threshold_ms: 500,
        }
    }
}

impl EngineConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn gap_threshold(&self) -> Duration {
        Duration::from_millis(self.gap_threshold_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_cadence() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_interval(), Duration::from_millis(100));
        assert_eq!(config.gap_threshold(), Duration::from_millis(500));
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: EngineConfig = serde_json::from_str(r#"{"sampleIntervalMs": 50}"#).unwrap();
        assert_eq!(config.sample_interval_ms, 50);
        assert_eq!(config.gap_threshold_ms, 500);
    }
}
