//! Sync Events
//! One event is published per planned stage of a request, or a single event
//! when authentication fails. Events are built fresh for each stage and never
//! mutated afterwards.

use std::fmt;

use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::synchronization::authenticator::AuthStatus;

use super::{
    category::SyncCategory,
    stage_outcome::{StageOutcome, StageStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum SyncStatus {
    Authentication(AuthStatus),
    Stage(StageStatus),
    /// The stage was planned but its gate stayed closed.
    Skipped { blocked_by: SyncCategory },
}

impl From<AuthStatus> for SyncStatus {
    fn from(status: AuthStatus) -> Self {
        SyncStatus::Authentication(status)
    }
}

impl From<StageStatus> for SyncStatus {
    fn from(status: StageStatus) -> Self {
        SyncStatus::Stage(status)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyncStatus::Authentication(status) => write!(f, "authentication: {}", status),
            SyncStatus::Stage(status) => write!(f, "{}", status),
            SyncStatus::Skipped { blocked_by } => write!(f, "skipped (blocked by {})", blocked_by),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct SyncEvent {
    #[getset(get_copy = "pub")]
    request_id: Uuid,
    #[getset(get_copy = "pub")]
    category: SyncCategory,
    #[getset(get_copy = "pub")]
    status: SyncStatus,
    #[getset(get_copy = "pub")]
    primary_count: Option<u32>,
    /// Only set on patients events: the stage's total count, for partial
    /// failures as well as full successes.
    #[getset(get_copy = "pub")]
    secondary_count: Option<u32>,
    #[getset(get = "pub")]
    message: String,
}

impl SyncEvent {
    pub fn authentication_failed(
        request_id: Uuid,
        category: SyncCategory,
        status: AuthStatus,
    ) -> Self {
        Self {
            request_id,
            category,
            status: status.into(),
            primary_count: None,
            secondary_count: None,
            message: format!("Authentication failed: {}", status),
        }
    }

    pub fn stage_completed(request_id: Uuid, category: SyncCategory, outcome: &StageOutcome) -> Self {
        let status = outcome.status();
        let noun = category.entity_noun();
        let (primary_count, message) = match status {
            StageStatus::Success => (
                Some(outcome.success_count()),
                format!("Downloaded {} {}", outcome.success_count(), noun),
            ),
            StageStatus::PartialFailure => (
                Some(outcome.success_count()),
                format!(
                    "Downloaded {} of {} {}",
                    outcome.success_count(),
                    outcome.total_count(),
                    noun
                ),
            ),
            StageStatus::NetworkFailure | StageStatus::ParseFailure => {
                (None, format!("Failed to download {}: {}", noun, status))
            }
        };
        let secondary_count = match category {
            SyncCategory::Patients if status.reports_counts() => Some(outcome.total_count()),
            _ => None,
        };

        Self {
            request_id,
            category,
            status: status.into(),
            primary_count,
            secondary_count,
            message,
        }
    }

    pub fn stage_skipped(request_id: Uuid, category: SyncCategory, blocked_by: SyncCategory) -> Self {
        Self {
            request_id,
            category,
            status: SyncStatus::Skipped { blocked_by },
            primary_count: None,
            secondary_count: None,
            message: format!(
                "Skipped {}: {} did not complete successfully",
                category.entity_noun(),
                blocked_by.entity_noun()
            ),
        }
    }
}

/// Everything one request published, in publication order.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct SyncReport {
    #[getset(get_copy = "pub")]
    request_id: Uuid,
    #[getset(get_copy = "pub")]
    category: SyncCategory,
    #[getset(get = "pub")]
    events: Vec<SyncEvent>,
}

impl SyncReport {
    pub fn new(request_id: Uuid, category: SyncCategory, events: Vec<SyncEvent>) -> Self {
        Self {
            request_id,
            category,
            events,
        }
    }

    pub fn authenticated(&self) -> bool {
        !self
            .events
            .iter()
            .any(|event| matches!(event.status(), SyncStatus::Authentication(_)))
    }

    pub fn event_for(&self, category: SyncCategory) -> Option<&SyncEvent> {
        self.events.iter().find(|event| event.category() == category)
    }

    pub fn last_message(&self) -> Option<&str> {
        self.events.last().map(|event| event.message().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_event_carries_primary_count_only() {
        let event = SyncEvent::stage_completed(
            Uuid::new_v4(),
            SyncCategory::Forms,
            &StageOutcome::success(12),
        );
        assert_eq!(event.status(), SyncStatus::Stage(StageStatus::Success));
        assert_eq!(event.primary_count(), Some(12));
        assert_eq!(event.secondary_count(), None);
        assert_eq!(event.message(), "Downloaded 12 forms");
    }

    #[test]
    fn patients_event_carries_total_as_secondary_count() {
        let event = SyncEvent::stage_completed(
            Uuid::new_v4(),
            SyncCategory::Patients,
            &StageOutcome::partial(5, 8),
        );
        assert_eq!(event.primary_count(), Some(5));
        assert_eq!(event.secondary_count(), Some(8));
        assert_eq!(event.message(), "Downloaded 5 of 8 patients");
    }

    #[test]
    fn failed_stage_event_has_no_counts() {
        let event = SyncEvent::stage_completed(
            Uuid::new_v4(),
            SyncCategory::Patients,
            &StageOutcome::failed(StageStatus::NetworkFailure),
        );
        assert_eq!(event.primary_count(), None);
        assert_eq!(event.secondary_count(), None);
        assert_eq!(event.message(), "Failed to download patients: network failure");
    }

    #[test]
    fn auth_failure_event_has_no_counts() {
        let event = SyncEvent::authentication_failed(
            Uuid::new_v4(),
            SyncCategory::Cohorts,
            AuthStatus::InvalidCredentials,
        );
        assert_eq!(
            event.status(),
            SyncStatus::Authentication(AuthStatus::InvalidCredentials)
        );
        assert_eq!(event.primary_count(), None);
        assert_eq!(event.message(), "Authentication failed: invalid credentials");
    }

    #[test]
    fn report_detects_auth_failure() {
        let id = Uuid::new_v4();
        let report = SyncReport::new(
            id,
            SyncCategory::Forms,
            vec![SyncEvent::authentication_failed(
                id,
                SyncCategory::Forms,
                AuthStatus::ServerError,
            )],
        );
        assert!(!report.authenticated());
        assert!(report.event_for(SyncCategory::Forms).is_some());
    }

    #[test]
    fn events_serialize_for_transports() {
        let event = SyncEvent::stage_skipped(
            Uuid::new_v4(),
            SyncCategory::Encounters,
            SyncCategory::Observations,
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["category"], "encounters");
        assert_eq!(json["status"]["kind"], "skipped");
        assert_eq!(json["status"]["detail"]["blocked_by"], "observations");
    }
}
