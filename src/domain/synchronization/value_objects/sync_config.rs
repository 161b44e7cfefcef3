use std::{fs, path::Path};

use derivative::Derivative;
use getset::{CopyGetters, Setters};
use serde::Deserialize;

use crate::common::errors::{OrchestratorError, Result};

/// How the patients chain reacts to an unsuccessful predecessor.
#[derive(Derivative, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "snake_case")]
pub enum PatientChainPolicy {
    /// Observations and encounters always run, whatever the patients stage
    /// reported.
    #[derivative(Default)]
    BestEffort,
    /// A stage in the chain runs only when its predecessor fully succeeded.
    StopOnFailure,
}

#[derive(Derivative, Debug, Clone, PartialEq, Eq, CopyGetters, Setters, Deserialize)]
#[derivative(Default)]
#[getset(get_copy = "pub", set = "pub")]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Requests that may wait behind the one in flight.
    #[derivative(Default(value = "100"))]
    request_queue_size: usize,
    /// Events buffered per subscriber before a slow one starts lagging.
    #[derivative(Default(value = "100"))]
    event_channel_size: usize,
    patient_chain_policy: PatientChainPolicy,
}

impl OrchestratorConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| OrchestratorError::Config(e.to_string()))?;
        config.validate()
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            OrchestratorError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    fn validate(self) -> Result<Self> {
        if self.request_queue_size == 0 {
            return Err(OrchestratorError::Config(
                "request_queue_size must be positive".to_string(),
            ));
        }
        if self.event_channel_size == 0 {
            return Err(OrchestratorError::Config(
                "event_channel_size must be positive".to_string(),
            ));
        }
        Ok(self)
    }
}
