//! Sync Time Tracker
//! Remembers when forms and cohorts were last fully synced. Writes go through
//! a single lock; readers go straight to the store and may see a value one
//! write behind, never a torn one.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use log::{error, info};

use crate::domain::synchronization::{
    repository::TimestampStore,
    value_objects::{category::SyncCategory, stage_outcome::StageStatus},
};

#[derive(Clone)]
pub struct SyncTimeTracker {
    store: Arc<dyn TimestampStore>,
    write_lock: Arc<Mutex<()>>,
}

impl fmt::Debug for SyncTimeTracker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SyncTimeTracker").finish_non_exhaustive()
    }
}

impl SyncTimeTracker {
    pub fn new(store: Arc<dyn TimestampStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Stores `at` for `category` when the stage fully succeeded and the
    /// category tracks a sync time. Returns whether anything was written.
    pub fn record_success(
        &self,
        category: SyncCategory,
        status: StageStatus,
        at: DateTime<Utc>,
    ) -> bool {
        let key = match category.last_synced_key() {
            Some(key) if status.is_success() => key,
            _ => return false,
        };

        let _guard = match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match self.store.put(key, at) {
            Ok(()) => {
                info!("Recorded {} at {}", key, at);
                true
            }
            Err(e) => {
                error!("Failed to record {}: {}", key, e);
                false
            }
        }
    }

    pub fn last_synced(&self, category: SyncCategory) -> Option<DateTime<Utc>> {
        let key = category.last_synced_key()?;
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to read {}: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::errors::TimestampStoreError,
        domain::synchronization::repository::MockTimestampStore,
        infrastructure::db::timestamp_store::InMemoryTimestampStore,
    };

    fn tracker() -> SyncTimeTracker {
        SyncTimeTracker::new(Arc::new(InMemoryTimestampStore::new()))
    }

    #[test]
    fn success_updates_tracked_categories() {
        let tracker = tracker();
        let now = Utc::now();

        assert!(tracker.record_success(SyncCategory::Forms, StageStatus::Success, now));
        assert!(tracker.record_success(SyncCategory::Cohorts, StageStatus::Success, now));
        assert_eq!(tracker.last_synced(SyncCategory::Forms), Some(now));
        assert_eq!(tracker.last_synced(SyncCategory::Cohorts), Some(now));
    }

    #[test]
    fn partial_failure_does_not_update() {
        let tracker = tracker();
        let now = Utc::now();

        for status in [
            StageStatus::PartialFailure,
            StageStatus::NetworkFailure,
            StageStatus::ParseFailure,
        ] {
            assert!(!tracker.record_success(SyncCategory::Forms, status, now));
        }
        assert_eq!(tracker.last_synced(SyncCategory::Forms), None);
    }

    #[test]
    fn untracked_categories_are_ignored() {
        let tracker = tracker();
        assert!(!tracker.record_success(
            SyncCategory::FormTemplates,
            StageStatus::Success,
            Utc::now()
        ));
        assert_eq!(tracker.last_synced(SyncCategory::Patients), None);
    }

    #[test]
    fn store_failures_are_swallowed() {
        let mut store = MockTimestampStore::new();
        store
            .expect_put()
            .withf(|key, _| key == "cohorts_last_synced")
            .times(1)
            .returning(|_, _| Err(TimestampStoreError::Poisoned));
        store
            .expect_get()
            .returning(|_| Err(TimestampStoreError::Poisoned));

        let tracker = SyncTimeTracker::new(Arc::new(store));
        assert!(!tracker.record_success(SyncCategory::Cohorts, StageStatus::Success, Utc::now()));
        assert_eq!(tracker.last_synced(SyncCategory::Cohorts), None);
    }
}
