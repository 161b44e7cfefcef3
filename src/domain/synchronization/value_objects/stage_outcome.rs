//! Stage Outcome
//! The immutable result a download stage reports back to the orchestrator.

use std::fmt;

use getset::CopyGetters;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Every attempted entity was fetched and persisted.
    Success,
    /// Some entities were persisted; counts say how many.
    PartialFailure,
    NetworkFailure,
    ParseFailure,
}

impl StageStatus {
    /// Only a full success unlocks gated stages and timestamp updates.
    pub fn is_success(&self) -> bool {
        matches!(self, StageStatus::Success)
    }

    /// Statuses whose outcome counts are meaningful to report.
    pub fn reports_counts(&self) -> bool {
        matches!(self, StageStatus::Success | StageStatus::PartialFailure)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StageStatus::Success => f.write_str("success"),
            StageStatus::PartialFailure => f.write_str("partial failure"),
            StageStatus::NetworkFailure => f.write_str("network failure"),
            StageStatus::ParseFailure => f.write_str("parse failure"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct StageOutcome {
    status: StageStatus,
    success_count: u32,
    total_count: u32,
}

impl StageOutcome {
    /// Builds an outcome, keeping `success_count <= total_count` for
    /// count-reporting statuses. A `Success` that did not persist everything
    /// it attempted is reported as `PartialFailure`.
    pub fn new(status: StageStatus, success_count: u32, total_count: u32) -> Self {
        let mut status = status;
        let mut success_count = success_count;
        if status.reports_counts() && success_count > total_count {
            warn!(
                "Stage reported {} successes out of {} attempts, clamping",
                success_count, total_count
            );
            success_count = total_count;
        }
        if status == StageStatus::Success && success_count < total_count {
            warn!(
                "Stage reported success with {} of {} entities, downgrading to partial failure",
                success_count, total_count
            );
            status = StageStatus::PartialFailure;
        }

        Self {
            status,
            success_count,
            total_count,
        }
    }

    pub fn success(total_count: u32) -> Self {
        Self::new(StageStatus::Success, total_count, total_count)
    }

    pub fn partial(success_count: u32, total_count: u32) -> Self {
        Self::new(StageStatus::PartialFailure, success_count, total_count)
    }

    pub fn failed(status: StageStatus) -> Self {
        Self::new(status, 0, 0)
    }
}

/// Per-stage input. Each stage receives only what it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageParams {
    None,
    FormIds(Vec<String>),
    CohortIds(Vec<String>),
}
