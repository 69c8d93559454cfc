use tracing::{debug, instrument};

use crate::error::StorageError;
use crate::model::attendance::AttendanceRecord;
use crate::storage::KeyValueStorage;

pub const DEFAULT_STORAGE_KEY: &str = "z_attendance_records";

/// Persists the whole ordered record list as one JSON array under a fixed key.
pub struct RecordStore<S: KeyValueStorage> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Nothing persisted yet (or a blank entry) is the empty history, not an error.
    #[instrument(name = "record_store_load", skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Result<Vec<AttendanceRecord>, StorageError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            debug!("No persisted records");
            return Ok(Vec::new());
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<AttendanceRecord> = serde_json::from_str(&raw)?;
        log::info!("Loaded {} attendance records", records.len());
        Ok(records)
    }

    pub fn save_all(&mut self, records: &[AttendanceRecord]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(records)?;
        self.storage.set(&self.key, &raw)?;
        debug!(key = %self.key, count = records.len(), "Saved attendance records");
        Ok(())
    }
}
