//! Sync Request
//! Immutable description of one unit of work submitted to the orchestrator.

use getset::Getters;
use uuid::Uuid;

use super::{category::SyncCategory, credentials::Credentials};

/// What a request asks to synchronize, with the parameters that target needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTarget {
    Forms,
    FormTemplates { form_ids: Vec<String> },
    Cohorts,
    /// Runs the patients, observations and encounters chain.
    Patients { cohort_ids: Vec<String> },
}

impl SyncTarget {
    pub fn category(&self) -> SyncCategory {
        match self {
            SyncTarget::Forms => SyncCategory::Forms,
            SyncTarget::FormTemplates { .. } => SyncCategory::FormTemplates,
            SyncTarget::Cohorts => SyncCategory::Cohorts,
            SyncTarget::Patients { .. } => SyncCategory::Patients,
        }
    }

    /// Notification text shown when a request for this target starts.
    pub fn start_message(&self) -> String {
        match self {
            SyncTarget::Forms => "Downloading Forms Metadata".to_string(),
            SyncTarget::FormTemplates { form_ids } => {
                format!("Downloading Forms Template for {} forms", form_ids.len())
            }
            SyncTarget::Cohorts => "Downloading Cohorts".to_string(),
            SyncTarget::Patients { .. } => "Downloading Patients".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct SyncRequest {
    id: Uuid,
    credentials: Credentials,
    target: SyncTarget,
}

impl SyncRequest {
    pub fn new(credentials: Credentials, target: SyncTarget) -> Self {
        Self {
            id: Uuid::new_v4(),
            credentials,
            target,
        }
    }

    pub fn forms(credentials: Credentials) -> Self {
        Self::new(credentials, SyncTarget::Forms)
    }

    pub fn form_templates(credentials: Credentials, form_ids: Vec<String>) -> Self {
        Self::new(credentials, SyncTarget::FormTemplates { form_ids })
    }

    pub fn cohorts(credentials: Credentials) -> Self {
        Self::new(credentials, SyncTarget::Cohorts)
    }

    pub fn patients_for_cohorts(credentials: Credentials, cohort_ids: Vec<String>) -> Self {
        Self::new(credentials, SyncTarget::Patients { cohort_ids })
    }

    /// Builds a request from a transport-level category tag.
    ///
    /// Only the four request categories are accepted; observations and
    /// encounters are reachable through the patients chain alone.
    pub fn from_category(
        category: SyncCategory,
        credentials: Credentials,
        ids: Vec<String>,
    ) -> Option<Self> {
        let target = match category {
            SyncCategory::Forms => SyncTarget::Forms,
            SyncCategory::FormTemplates => SyncTarget::FormTemplates { form_ids: ids },
            SyncCategory::Cohorts => SyncTarget::Cohorts,
            SyncCategory::Patients => SyncTarget::Patients { cohort_ids: ids },
            SyncCategory::Observations | SyncCategory::Encounters => return None,
        };
        Some(Self::new(credentials, target))
    }

    pub fn category(&self) -> SyncCategory {
        self.target.category()
    }
}
