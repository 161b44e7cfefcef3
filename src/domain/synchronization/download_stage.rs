//! Download Stages
//! A stage fetches one entity category from the remote source and persists it
//! locally, one entity at a time, so a partial failure keeps what was stored.

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::common::errors::{OrchestratorError, Result};

use super::value_objects::{
    category::SyncCategory,
    stage_outcome::{StageOutcome, StageParams},
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DownloadStage: Send + Sync {
    async fn run(&self, params: &StageParams) -> StageOutcome;
}

/// One stage implementation per category.
#[derive(Clone)]
pub struct DownloadStages {
    forms: Arc<dyn DownloadStage>,
    form_templates: Arc<dyn DownloadStage>,
    cohorts: Arc<dyn DownloadStage>,
    patients: Arc<dyn DownloadStage>,
    observations: Arc<dyn DownloadStage>,
    encounters: Arc<dyn DownloadStage>,
}

impl DownloadStages {
    pub fn builder() -> DownloadStagesBuilder {
        DownloadStagesBuilder::default()
    }

    pub fn get(&self, category: SyncCategory) -> &Arc<dyn DownloadStage> {
        match category {
            SyncCategory::Forms => &self.forms,
            SyncCategory::FormTemplates => &self.form_templates,
            SyncCategory::Cohorts => &self.cohorts,
            SyncCategory::Patients => &self.patients,
            SyncCategory::Observations => &self.observations,
            SyncCategory::Encounters => &self.encounters,
        }
    }
}

impl fmt::Debug for DownloadStages {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let categories: Vec<_> = SyncCategory::ALL.iter().map(|c| c.as_str()).collect();
        f.debug_struct("DownloadStages")
            .field("categories", &categories)
            .finish()
    }
}

#[derive(Default)]
pub struct DownloadStagesBuilder {
    stages: HashMap<SyncCategory, Arc<dyn DownloadStage>>,
}

impl DownloadStagesBuilder {
    pub fn stage(mut self, category: SyncCategory, stage: Arc<dyn DownloadStage>) -> Self {
        self.stages.insert(category, stage);
        self
    }

    pub fn forms(self, stage: Arc<dyn DownloadStage>) -> Self {
        self.stage(SyncCategory::Forms, stage)
    }

    pub fn form_templates(self, stage: Arc<dyn DownloadStage>) -> Self {
        self.stage(SyncCategory::FormTemplates, stage)
    }

    pub fn cohorts(self, stage: Arc<dyn DownloadStage>) -> Self {
        self.stage(SyncCategory::Cohorts, stage)
    }

    pub fn patients(self, stage: Arc<dyn DownloadStage>) -> Self {
        self.stage(SyncCategory::Patients, stage)
    }

    pub fn observations(self, stage: Arc<dyn DownloadStage>) -> Self {
        self.stage(SyncCategory::Observations, stage)
    }

    pub fn encounters(self, stage: Arc<dyn DownloadStage>) -> Self {
        self.stage(SyncCategory::Encounters, stage)
    }

    /// Fails on the first category without a stage.
    pub fn build(mut self) -> Result<DownloadStages> {
        let mut take = |category: SyncCategory| {
            self.stages
                .remove(&category)
                .ok_or(OrchestratorError::MissingStage(category))
        };
        Ok(DownloadStages {
            forms: take(SyncCategory::Forms)?,
            form_templates: take(SyncCategory::FormTemplates)?,
            cohorts: take(SyncCategory::Cohorts)?,
            patients: take(SyncCategory::Patients)?,
            observations: take(SyncCategory::Observations)?,
            encounters: take(SyncCategory::Encounters)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_stage() -> Arc<dyn DownloadStage> {
        let mut stage = MockDownloadStage::new();
        stage.expect_run().returning(|_| StageOutcome::success(0));
        Arc::new(stage)
    }

    #[test]
    fn build_requires_every_category() {
        let err = DownloadStages::builder()
            .forms(noop_stage())
            .form_templates(noop_stage())
            .cohorts(noop_stage())
            .patients(noop_stage())
            .observations(noop_stage())
            .build()
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::MissingStage(SyncCategory::Encounters)));
    }

    #[tokio::test]
    async fn built_stages_are_looked_up_by_category() {
        let stages = DownloadStages::builder()
            .forms(noop_stage())
            .form_templates(noop_stage())
            .cohorts(noop_stage())
            .patients(noop_stage())
            .observations(noop_stage())
            .encounters(noop_stage())
            .build()
            .unwrap();

        let outcome = stages
            .get(SyncCategory::Cohorts)
            .run(&StageParams::None)
            .await;
        assert_eq!(outcome, StageOutcome::success(0));
        assert!(format!("{:?}", stages).contains("encounters"));
    }
}
