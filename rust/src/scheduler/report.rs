//! Scheduling results and errors.

use thiserror::Error;

use crate::models::ScheduledJob;

/// Errors raised by strict scheduling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// A `uses` chain returned to a workflow that was still being resolved.
    /// The path starts and ends with the repeated workflow name.
    #[error("Workflow reference cycle: {}", .path.join(" -> "))]
    WorkflowCycle { path: Vec<String> },
}

/// Why a declared job was left out of the schedule.
#[derive(Clone, Debug, PartialEq)]
pub enum ExclusionReason {
    /// A direct prerequisite is not a job of the workflow.
    DanglingPrerequisite { missing: Vec<String> },
    /// The job sits on a dependency cycle.
    Cycle,
    /// Waiting on prerequisites that were themselves excluded.
    BlockedBy { prerequisites: Vec<String> },
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DanglingPrerequisite { .. } => "dangling_prerequisite",
            Self::Cycle => "cycle",
            Self::BlockedBy { .. } => "blocked",
        }
    }

    /// Job ids the reason points at.
    pub fn related(&self) -> &[String] {
        match self {
            Self::DanglingPrerequisite { missing } => missing,
            Self::Cycle => &[],
            Self::BlockedBy { prerequisites } => prerequisites,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExcludedJob {
    pub id: String,
    pub reason: ExclusionReason,
}

/// Output of one scheduling pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleReport {
    /// Jobs in visitation order, not sorted by start.
    pub scheduled: Vec<ScheduledJob>,
    /// Declared jobs the pass never reached, in declaration order.
    pub excluded: Vec<ExcludedJob>,
}

impl ScheduleReport {
    /// Latest end over the scheduled jobs: the workflow's critical path length.
    pub fn span(&self) -> f64 {
        self.scheduled.iter().fold(0.0, |max, job| job.end.max(max))
    }

    pub fn is_complete(&self) -> bool {
        self.excluded.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ScheduledJob> {
        self.scheduled.iter().find(|job| job.id == id)
    }
}
