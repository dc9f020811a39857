//! Dashboard settings. Every field has a default, so a partial (or absent)
//! config file is fine.
//!
//! Desktop builds look for `taskscope.json` in the platform config directory
//! (e.g. `~/.config/taskscope/taskscope.json` on Linux). Web builds always use
//! the defaults.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prepare::EfficiencyCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Efficiency strictly below this is `Low`.
    pub efficiency_low_pct: f64,
    /// Efficiency strictly above this is `High`.
    pub efficiency_high_pct: f64,
    /// Category assigned when efficiency cannot be computed.
    pub undefined_efficiency: EfficiencyCategory,
    /// Bars shown in ranked breakdowns (top clients, slowest task types).
    pub top_n: usize,
    pub histogram_bins: usize,
    /// SLA-days histogram window, inclusive on both ends.
    pub sla_window_days: (i64, i64),
    pub table_default_columns: usize,
    pub table_default_rows: usize,
    pub table_min_rows: usize,
    pub table_max_rows: usize,
    /// Prepared tables kept per session, keyed by upload content.
    pub cache_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            efficiency_low_pct: 50.0,
            efficiency_high_pct: 100.0,
            undefined_efficiency: EfficiencyCategory::Normal,
            top_n: 10,
            histogram_bins: 30,
            sla_window_days: (-30, 60),
            table_default_columns: 8,
            table_default_rows: 50,
            table_min_rows: 10,
            table_max_rows: 100,
            cache_capacity: 4,
        }
    }
}

pub const CONFIG_FILENAME: &str = "taskscope.json";

impl DashboardConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Load the user config, falling back to defaults on any problem.
    pub fn load() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let Some(dirs) = directories::ProjectDirs::from("com", "Taskscope", "taskscope") else {
                debug!("no config directory available; using defaults");
                return Self::default();
            };
            let path = dirs.config_dir().join(CONFIG_FILENAME);
            match std::fs::read_to_string(&path) {
                Ok(raw) => match Self::from_json(&raw) {
                    Ok(config) => {
                        debug!(path = %path.display(), "loaded dashboard config");
                        config
                    }
                    Err(err) => {
                        warn!(path = %path.display(), %err, "invalid dashboard config; using defaults");
                        Self::default()
                    }
                },
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
                Err(err) => {
                    warn!(path = %path.display(), %err, "unreadable dashboard config; using defaults");
                    Self::default()
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            debug!("web build; using default dashboard config");
            Self::default()
        }
    }

    /// Clamp a requested detail-table row count into the allowed range.
    pub fn clamp_rows(&self, rows: usize) -> usize {
        rows.clamp(self.table_min_rows, self.table_max_rows.max(self.table_min_rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json(r#"{ "top_n": 5, "undefined_efficiency": "Unknown" }"#)
            .unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.undefined_efficiency, EfficiencyCategory::Unknown);
        assert_eq!(config.efficiency_low_pct, 50.0);
        assert_eq!(config.sla_window_days, (-30, 60));
    }

    #[test]
    fn rows_are_clamped() {
        let config = DashboardConfig::default();
        assert_eq!(config.clamp_rows(3), 10);
        assert_eq!(config.clamp_rows(500), 100);
        assert_eq!(config.clamp_rows(42), 42);
    }
}
