//! Critical path scheduling of workflow jobs.
//!
//! A workflow is scheduled with a single forward pass in topological order.
//! Composite jobs are sized by recursively scheduling the workflow they use.

mod core;
mod graph;
mod report;
mod resolver;

pub use self::core::{calculate_scheduled_jobs, critical_path_duration, schedule_workflow};
pub use graph::DependencyGraph;
pub use report::{ExcludedJob, ExclusionReason, ScheduleError, ScheduleReport};
pub use resolver::DurationResolver;
