// Interface for the host key-value store holding last-synced timestamps

use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use crate::common::errors::TimestampStoreError;

#[cfg_attr(test, automock)]
pub trait TimestampStore: Send + Sync {
    fn put(&self, key: &str, value: DateTime<Utc>) -> Result<(), TimestampStoreError>;
    fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>, TimestampStoreError>;
}
