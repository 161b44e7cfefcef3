//! Stage Plan
//! The ordered stages a request runs, and the gate deciding whether each
//! stage may start given what its predecessor reported.

use getset::{CopyGetters, Getters};

use super::value_objects::{
    category::SyncCategory,
    stage_outcome::{StageParams, StageStatus},
    sync_config::PatientChainPolicy,
    sync_request::SyncTarget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageGate {
    Always,
    /// Runs only if the previous stage of the plan reported `Success`.
    PredecessorSucceeded,
}

impl StageGate {
    /// `predecessor` is the previous planned stage's category and status,
    /// `None` for the first stage or when that stage was itself skipped.
    pub fn is_open(&self, predecessor: Option<(SyncCategory, StageStatus)>) -> bool {
        match self {
            StageGate::Always => true,
            StageGate::PredecessorSucceeded => {
                matches!(predecessor, Some((_, status)) if status.is_success())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct PlannedStage {
    #[getset(get_copy = "pub")]
    category: SyncCategory,
    #[getset(get = "pub")]
    params: StageParams,
    #[getset(get_copy = "pub")]
    gate: StageGate,
}

impl PlannedStage {
    fn new(category: SyncCategory, params: StageParams, gate: StageGate) -> Self {
        Self {
            category,
            params,
            gate,
        }
    }

    /// Whether a `Success` from this stage refreshes the category's
    /// last-synced timestamp.
    pub fn records_sync_time(&self) -> bool {
        self.category.last_synced_key().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct StagePlan {
    stages: Vec<PlannedStage>,
}

impl StagePlan {
    pub fn for_target(target: &SyncTarget, policy: PatientChainPolicy) -> Self {
        let stages = match target {
            SyncTarget::Forms => vec![PlannedStage::new(
                SyncCategory::Forms,
                StageParams::None,
                StageGate::Always,
            )],
            SyncTarget::FormTemplates { form_ids } => vec![PlannedStage::new(
                SyncCategory::FormTemplates,
                StageParams::FormIds(form_ids.clone()),
                StageGate::Always,
            )],
            SyncTarget::Cohorts => vec![PlannedStage::new(
                SyncCategory::Cohorts,
                StageParams::None,
                StageGate::Always,
            )],
            SyncTarget::Patients { cohort_ids } => {
                let chained = match policy {
                    PatientChainPolicy::BestEffort => StageGate::Always,
                    PatientChainPolicy::StopOnFailure => StageGate::PredecessorSucceeded,
                };
                vec![
                    PlannedStage::new(
                        SyncCategory::Patients,
                        StageParams::CohortIds(cohort_ids.clone()),
                        StageGate::Always,
                    ),
                    PlannedStage::new(
                        SyncCategory::Observations,
                        StageParams::CohortIds(cohort_ids.clone()),
                        chained,
                    ),
                    PlannedStage::new(
                        SyncCategory::Encounters,
                        StageParams::CohortIds(cohort_ids.clone()),
                        chained,
                    ),
                ]
            }
        };

        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cohorts() -> Vec<String> {
        vec!["A".to_string(), "B".to_string()]
    }

    #[test]
    fn single_category_targets_plan_one_stage() {
        let plan = StagePlan::for_target(&SyncTarget::Forms, PatientChainPolicy::BestEffort);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.stages()[0].category(), SyncCategory::Forms);
        assert!(plan.stages()[0].records_sync_time());

        let plan = StagePlan::for_target(
            &SyncTarget::FormTemplates {
                form_ids: vec!["f1".to_string()],
            },
            PatientChainPolicy::BestEffort,
        );
        assert_eq!(plan.stages()[0].params(), &StageParams::FormIds(vec!["f1".to_string()]));
        assert!(!plan.stages()[0].records_sync_time());
    }

    #[test]
    fn patients_chain_passes_cohorts_to_every_stage() {
        let plan = StagePlan::for_target(
            &SyncTarget::Patients {
                cohort_ids: cohorts(),
            },
            PatientChainPolicy::BestEffort,
        );
        let categories: Vec<_> = plan.stages().iter().map(|s| s.category()).collect();
        assert_eq!(
            categories,
            vec![
                SyncCategory::Patients,
                SyncCategory::Observations,
                SyncCategory::Encounters
            ]
        );
        for stage in plan.stages() {
            assert_eq!(stage.params(), &StageParams::CohortIds(cohorts()));
            assert_eq!(stage.gate(), StageGate::Always);
        }
    }

    #[test]
    fn stop_on_failure_gates_the_chain() {
        let plan = StagePlan::for_target(
            &SyncTarget::Patients {
                cohort_ids: cohorts(),
            },
            PatientChainPolicy::StopOnFailure,
        );
        assert_eq!(plan.stages()[0].gate(), StageGate::Always);
        assert_eq!(plan.stages()[1].gate(), StageGate::PredecessorSucceeded);
        assert_eq!(plan.stages()[2].gate(), StageGate::PredecessorSucceeded);
    }

    #[test]
    fn only_full_success_opens_a_gate() {
        let gate = StageGate::PredecessorSucceeded;
        assert!(gate.is_open(Some((SyncCategory::Patients, StageStatus::Success))));
        assert!(!gate.is_open(Some((SyncCategory::Patients, StageStatus::PartialFailure))));
        assert!(!gate.is_open(Some((SyncCategory::Patients, StageStatus::NetworkFailure))));
        assert!(!gate.is_open(None));
        assert!(StageGate::Always.is_open(None));
    }
}
