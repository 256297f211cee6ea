use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::session::stats::SessionStats;

pub const HEADER: &str =
    "duration_ms,pass,miss,fail,character_keys,non_character_keys,delete_keys,total_keys";

/// One line of the append-only stats log. Field order is the column order.
#[derive(Debug, Serialize)]
struct StatsRecord {
    duration_ms: u64,
    pass: u64,
    miss: u64,
    fail: u64,
    character_keys: u64,
    non_character_keys: u64,
    delete_keys: u64,
    total_keys: u64,
}

impl From<&SessionStats> for StatsRecord {
    fn from(stats: &SessionStats) -> Self {
        Self {
            duration_ms: stats.duration_ms,
            pass: stats.pass,
            miss: stats.miss,
            fail: stats.fail,
            character_keys: stats.character_keys,
            non_character_keys: stats.non_character_keys,
            delete_keys: stats.delete_keys,
            total_keys: stats.total_keys,
        }
    }
}

/// Append-only CSV file of finished sessions.
pub struct StatsLog {
    path: PathBuf,
}

impl StatsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, writing the header first when the file is new.
    /// Returns the file path.
    pub fn append(&self, stats: &SessionStats) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(StatsRecord::from(stats))?;
        writer.flush()?;

        Ok(self.path.clone())
    }
}
