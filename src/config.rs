//! Project configuration.
//!
//! Loaded from an optional `volta.toml`. Every field has a default so a
//! missing file, or a file that sets only a few keys, is valid.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoltaError};
use crate::fields::Phase;

pub const CONFIG_FILE: &str = "volta.toml";

/// Date window and display metadata for one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseWindow {
    pub phase: Phase,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Hex colour, `#rrggbb`.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project_name: String,
    pub final_deadline: NaiveDate,
    pub page_size: usize,
    pub recent_since_year: i32,
    pub urgent_days: i64,
    pub upcoming_days: i64,
    pub stats_refresh_secs: u64,
    pub full_refresh_secs: u64,
    pub bootstrap_file: String,
    pub phases: Vec<PhaseWindow>,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project_name: "Project Volta - Critical Raw Materials & Batteries".into(),
            final_deadline: date(2026, 1, 23),
            page_size: 12,
            recent_since_year: 2023,
            urgent_days: 3,
            upcoming_days: 7,
            stats_refresh_secs: 30,
            full_refresh_secs: 60,
            bootstrap_file: "literature-db.json".into(),
            phases: vec![
                PhaseWindow {
                    phase: Phase::I,
                    name: "Foundation & Definition".into(),
                    start: date(2025, 12, 1),
                    end: date(2025, 12, 20),
                    color: "#3b82f6".into(),
                },
                PhaseWindow {
                    phase: Phase::II,
                    name: "Analysis & Evaluation".into(),
                    start: date(2025, 12, 21),
                    end: date(2026, 1, 10),
                    color: "#10b981".into(),
                },
                PhaseWindow {
                    phase: Phase::III,
                    name: "Strategy & Synthesis".into(),
                    start: date(2026, 1, 11),
                    end: date(2026, 1, 15),
                    color: "#f59e0b".into(),
                },
                PhaseWindow {
                    phase: Phase::IV,
                    name: "Finalization".into(),
                    start: date(2026, 1, 16),
                    end: date(2026, 1, 22),
                    color: "#8b5cf6".into(),
                },
                PhaseWindow {
                    phase: Phase::V,
                    name: "Delivery".into(),
                    start: date(2026, 1, 23),
                    end: date(2026, 1, 25),
                    color: "#ef4444".into(),
                },
            ],
        }
    }
}

impl Config {
    /// Load from `explicit` if given, else `<data_dir>/volta.toml` if present,
    /// else defaults. An explicit path that does not exist is an error.
    pub fn load(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        let path: PathBuf = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = data_dir.join(CONFIG_FILE);
                if !p.exists() {
                    tracing::debug!("no {} in {}, using defaults", CONFIG_FILE, data_dir.display());
                    return Ok(Config::default());
                }
                p
            }
        };
        let raw = fs::read_to_string(&path)?;
        let config = Self::parse(&raw).map_err(|message| VoltaError::Config { path: path.clone(), message })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn parse(raw: &str) -> std::result::Result<Self, String> {
        let config: Config = toml::from_str(raw).map_err(|e| e.to_string())?;
        if config.page_size == 0 {
            return Err("page_size must be at least 1".into());
        }
        if let Some(w) = config.phases.iter().find(|w| w.end < w.start) {
            return Err(format!("phase {:?} ends before it starts", w.phase));
        }
        Ok(config)
    }

    /// Window for `phase`, if configured.
    pub fn phase_window(&self, phase: Phase) -> Option<&PhaseWindow> {
        self.phases.iter().find(|w| w.phase == phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::parse("page_size = 5\nproject_name = \"Thesis\"\n").unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.project_name, "Thesis");
        assert_eq!(config.urgent_days, 3);
        assert_eq!(config.phases.len(), 5);
    }

    #[test]
    fn test_phase_tables_parse() {
        let raw = r##"
            [[phases]]
            phase = "I"
            name = "Kickoff"
            start = "2026-02-01"
            end = "2026-02-10"
            color = "#000000"
        "##;
        let config = Config::parse(raw).unwrap();
        assert_eq!(config.phases.len(), 1);
        assert_eq!(config.phase_window(Phase::I).unwrap().name, "Kickoff");
        assert!(config.phase_window(Phase::II).is_none());
    }

    #[test]
    fn test_rejects_zero_page_size_and_inverted_windows() {
        assert!(Config::parse("page_size = 0").is_err());
        let raw = r##"
            [[phases]]
            phase = "II"
            name = "Backwards"
            start = "2026-02-10"
            end = "2026-02-01"
            color = "#000000"
        "##;
        assert!(Config::parse(raw).is_err());
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(Config::load(Some(&dir.path().join("nope.toml")), dir.path()).is_err());
    }
}
