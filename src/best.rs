//! Best-progress records
//!
//! One entry per level id, holding the highest progress fraction ever
//! reached. Persisted as JSON; the simulation itself never touches disk.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clamp01;

/// Why the store could not be written
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    Io(String),
    Json(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "best-progress I/O error: {e}"),
            Self::Json(e) => write!(f, "best-progress encode error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Per-level best progress, in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestProgress {
    pub levels: BTreeMap<String, f32>,
}

impl BestProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run. Returns true if it beat the stored best.
    pub fn record(&mut self, level_id: &str, progress: f32) -> bool {
        let progress = clamp01(progress);
        match self.levels.get_mut(level_id) {
            Some(best) if progress <= *best => false,
            Some(best) => {
                *best = progress;
                true
            }
            None => {
                self.levels.insert(level_id.to_string(), progress);
                true
            }
        }
    }

    /// Best progress for a level, 0 if never played
    pub fn best(&self, level_id: &str) -> f32 {
        self.levels.get(level_id).copied().unwrap_or(0.0)
    }

    /// Best progress as a whole percentage, rounded down
    pub fn percent(&self, level_id: &str) -> u32 {
        (self.best(level_id) * 100.0).floor() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Load from a JSON file, starting fresh if missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let Ok(json) = std::fs::read_to_string(path) else {
            log::info!("No best-progress file at {}, starting fresh", path.display());
            return Self::new();
        };
        match serde_json::from_str::<BestProgress>(&json) {
            Ok(mut best) => {
                // Clamp anything hand-edited out of range
                for value in best.levels.values_mut() {
                    *value = clamp01(*value);
                }
                log::info!("Loaded best progress for {} levels", best.levels.len());
                best
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {e}, starting fresh", path.display());
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let json =
            serde_json::to_string_pretty(self).map_err(|e| StoreError::Json(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| StoreError::Io(e.to_string()))?;
        log::info!("Best progress saved ({} levels)", self.levels.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_maximum() {
        let mut best = BestProgress::new();
        assert!(best.record("l1", 0.4));
        assert!(!best.record("l1", 0.3));
        assert!(!best.record("l1", 0.4));
        assert!(best.record("l1", 0.75));
        assert_eq!(best.best("l1"), 0.75);
    }

    #[test]
    fn test_unknown_level_is_zero() {
        let best = BestProgress::new();
        assert_eq!(best.best("l9"), 0.0);
        assert_eq!(best.percent("l9"), 0);
        assert!(best.is_empty());
    }

    #[test]
    fn test_percent_rounds_down() {
        let mut best = BestProgress::new();
        best.record("l2", 0.999);
        assert_eq!(best.percent("l2"), 99);
        best.record("l2", 1.0);
        assert_eq!(best.percent("l2"), 100);
    }

    #[test]
    fn test_record_clamps() {
        let mut best = BestProgress::new();
        best.record("l1", 1.7);
        assert_eq!(best.best("l1"), 1.0);
        let mut other = BestProgress::new();
        assert!(other.record("l1", f32::NAN));
        assert_eq!(other.best("l1"), 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let name = format!("rift_pulse_best_{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let mut best = BestProgress::new();
        best.record("l1", 0.5);
        best.record("l3", 1.0);
        best.save(&path).unwrap();

        let loaded = BestProgress::load(&path);
        assert_eq!(loaded, best);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_or_corrupt_starts_fresh() {
        let dir = std::env::temp_dir();
        let missing = dir.join("rift_pulse_best_does_not_exist.json");
        assert!(BestProgress::load(&missing).is_empty());

        let corrupt = dir.join(format!("rift_pulse_best_corrupt_{}.json", std::process::id()));
        std::fs::write(&corrupt, "{ not json").unwrap();
        assert!(BestProgress::load(&corrupt).is_empty());
        let _ = std::fs::remove_file(&corrupt);
    }
}
