//! Timestamp Stores
//! Key-value stores for last-synced timestamps: an in-memory one, and one
//! that mirrors its contents to a JSON file.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::{
    common::errors::TimestampStoreError, domain::synchronization::repository::TimestampStore,
};

type Entries = HashMap<String, DateTime<Utc>>;

#[derive(Debug, Default)]
pub struct InMemoryTimestampStore {
    entries: RwLock<Entries>,
}

impl InMemoryTimestampStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimestampStore for InMemoryTimestampStore {
    fn put(&self, key: &str, value: DateTime<Utc>) -> Result<(), TimestampStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| TimestampStoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, TimestampStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| TimestampStoreError::Poisoned)?;
        Ok(entries.get(key).copied())
    }
}

/// Keeps every entry in memory and rewrites the whole file on each put.
/// The file is replaced through a rename, so readers of the file never see a
/// half-written document.
#[derive(Debug)]
pub struct JsonFileTimestampStore {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl JsonFileTimestampStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TimestampStoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Entries::new()
            } else {
                serde_json::from_str::<Entries>(&raw)?
            }
        } else {
            Entries::new()
        };
        info!(
            "Opened timestamp store {} with {} entries",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn flush(&self, entries: &Entries) -> Result<(), TimestampStoreError> {
        let serialized = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, serialized)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Flushed {} timestamps to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl TimestampStore for JsonFileTimestampStore {
    fn put(&self, key: &str, value: DateTime<Utc>) -> Result<(), TimestampStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| TimestampStoreError::Poisoned)?;
        let previous = entries.insert(key.to_string(), value);
        if let Err(e) = self.flush(&entries) {
            // keep memory and file in agreement
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, TimestampStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| TimestampStoreError::Poisoned)?;
        Ok(entries.get(key).copied())
    }
}
