//! Habit snapshots handed over by the record store.
//!
//! The CLI only reads snapshots. A missing file is treated as "no habits yet".

use std::path::Path;

use anyhow::{Context, Result};
use ht_core::Habit;
use serde::{Deserialize, Serialize};

/// All habits at one point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub habits: Vec<Habit>,
}

impl Snapshot {
    /// Reads a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no snapshot file, starting empty");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let snapshot: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::debug!(habits = snapshot.habits.len(), "loaded snapshot");
        Ok(snapshot)
    }

    /// Finds a habit by exact ID, then by case-insensitive name.
    pub fn find(&self, query: &str) -> Option<&Habit> {
        self.habits
            .iter()
            .find(|h| h.id.as_str() == query)
            .or_else(|| {
                self.habits
                    .iter()
                    .find(|h| h.name.as_str().eq_ignore_ascii_case(query))
            })
    }
}
