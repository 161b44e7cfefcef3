use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::errors::OrchestratorError;

/// Entity category a download stage fetches.
///
/// `Patients`, `Observations` and `Encounters` form the patient chain: a
/// single patients request runs all three in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncCategory {
    Forms,
    FormTemplates,
    Cohorts,
    Patients,
    Observations,
    Encounters,
}

impl SyncCategory {
    pub const ALL: [SyncCategory; 6] = [
        SyncCategory::Forms,
        SyncCategory::FormTemplates,
        SyncCategory::Cohorts,
        SyncCategory::Patients,
        SyncCategory::Observations,
        SyncCategory::Encounters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncCategory::Forms => "forms",
            SyncCategory::FormTemplates => "form_templates",
            SyncCategory::Cohorts => "cohorts",
            SyncCategory::Patients => "patients",
            SyncCategory::Observations => "observations",
            SyncCategory::Encounters => "encounters",
        }
    }

    /// Plural noun used in progress messages.
    pub fn entity_noun(&self) -> &'static str {
        match self {
            SyncCategory::Forms => "forms",
            SyncCategory::FormTemplates => "form templates",
            SyncCategory::Cohorts => "cohorts",
            SyncCategory::Patients => "patients",
            SyncCategory::Observations => "observations",
            SyncCategory::Encounters => "encounters",
        }
    }

    /// Key under which the last successful sync time is persisted, for the
    /// categories that track one.
    pub fn last_synced_key(&self) -> Option<&'static str> {
        match self {
            SyncCategory::Forms => Some("forms_last_synced"),
            SyncCategory::Cohorts => Some("cohorts_last_synced"),
            _ => None,
        }
    }
}

impl fmt::Display for SyncCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncCategory {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        SyncCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| OrchestratorError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_transport_tags() {
        assert_eq!("forms".parse::<SyncCategory>().unwrap(), SyncCategory::Forms);
        assert_eq!(
            "Form-Templates".parse::<SyncCategory>().unwrap(),
            SyncCategory::FormTemplates
        );
        assert_eq!(
            " ENCOUNTERS ".parse::<SyncCategory>().unwrap(),
            SyncCategory::Encounters
        );
    }

    #[test]
    fn it_rejects_unknown_tags() {
        let err = "visits".parse::<SyncCategory>().unwrap_err();
        assert!(matches!(err, OrchestratorError::UnknownCategory(tag) if tag == "visits"));
    }

    #[test]
    fn only_forms_and_cohorts_track_sync_time() {
        let tracked: Vec<_> = SyncCategory::ALL
            .iter()
            .filter_map(|c| c.last_synced_key())
            .collect();
        assert_eq!(tracked, vec!["forms_last_synced", "cohorts_last_synced"]);
    }
}
