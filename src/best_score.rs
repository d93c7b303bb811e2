//! Best distance persistence
//!
//! A single integer survives between runs. The file store keeps it as a small
//! JSON document; the memory store is for tests and headless runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// On-disk record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub best_distance: u32,
}

/// Somewhere the best distance can be read from and written to
pub trait BestDistanceStore {
    /// Stored best, 0 if nothing has been saved yet
    fn load(&self) -> Result<u32, PersistenceError>;

    fn store(&mut self, distance: u32) -> Result<(), PersistenceError>;

    /// Record `distance` if it beats the stored best. Returns whether it did.
    fn submit(&mut self, distance: u32) -> Result<bool, PersistenceError> {
        let best = self.load()?;
        if distance <= best {
            return Ok(false);
        }
        self.store(distance)?;
        log::info!("New best distance: {} m (was {} m)", distance, best);
        Ok(true)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u32) -> Self {
        Self { best }
    }
}

impl BestDistanceStore for MemoryStore {
    fn load(&self) -> Result<u32, PersistenceError> {
        Ok(self.best)
    }

    fn store(&mut self, distance: u32) -> Result<(), PersistenceError> {
        self.best = distance;
        Ok(())
    }
}

/// JSON file at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestDistanceStore for JsonFileStore {
    fn load(&self) -> Result<u32, PersistenceError> {
        if !self.path.exists() {
            log::debug!("no best score at {}, starting fresh", self.path.display());
            return Ok(0);
        }
        let json = fs::read_to_string(&self.path)?;
        let record: BestScore = serde_json::from_str(&json)?;
        Ok(record.best_distance)
    }

    fn store(&mut self, distance: u32) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&BestScore {
            best_distance: distance,
        })?;
        fs::write(&self.path, json)?;
        log::debug!("best score saved to {}", self.path.display());
        Ok(())
    }
}
