//! Rust implementation of the pipeviz scheduling and timeline layout core.
//!
//! Turns declarative workflows (jobs, dependency edges, references to other
//! workflows) into start/end times per job, and packs the scheduled jobs
//! into timeline rows. Everything here is a pure function of its input.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;
use std::collections::HashMap;

mod completeness;
mod config;
mod interner;
pub mod layout;
pub mod logging;
mod models;
pub mod scheduler;
pub mod sorting;
pub mod validation;

pub use completeness::{has_missing_durations, jobs_missing_durations};
pub use config::{ScheduleConfig, TimelineConfig};
pub use layout::{assign_rows, TimelineLayout};
pub use models::{Edge, Job, Pipeline, ScheduledJob, Workflow};
pub use scheduler::{
    calculate_scheduled_jobs, critical_path_duration, schedule_workflow, ExcludedJob,
    ExclusionReason, ScheduleError, ScheduleReport,
};
pub use sorting::sort_chronologically;
pub use validation::{validate_pipeline, ValidationIssue};

/// A job left out of a schedule (PyO3 wrapper).
#[pyclass(name = "ExcludedJob")]
#[derive(Clone, Debug)]
pub struct PyExcludedJob {
    #[pyo3(get)]
    pub id: String,
    /// "dangling_prerequisite", "cycle" or "blocked"
    #[pyo3(get)]
    pub reason: String,
    /// Missing prerequisites for "dangling_prerequisite", excluded
    /// prerequisites for "blocked", empty for "cycle".
    #[pyo3(get)]
    pub related: Vec<String>,
}

impl From<ExcludedJob> for PyExcludedJob {
    fn from(job: ExcludedJob) -> Self {
        Self {
            reason: job.reason.as_str().to_string(),
            related: job.reason.related().to_vec(),
            id: job.id,
        }
    }
}

#[pymethods]
impl PyExcludedJob {
    fn __repr__(&self) -> String {
        format!(
            "ExcludedJob(id={:?}, reason={:?}, related={:?})",
            self.id, self.reason, self.related
        )
    }
}

/// Scheduled and excluded jobs of one workflow (PyO3 wrapper).
#[pyclass(name = "ScheduleReport")]
#[derive(Clone, Debug)]
pub struct PyScheduleReport {
    #[pyo3(get)]
    pub scheduled: Vec<ScheduledJob>,
    #[pyo3(get)]
    pub excluded: Vec<PyExcludedJob>,
    /// Critical path length
    #[pyo3(get)]
    pub span: f64,
}

impl From<ScheduleReport> for PyScheduleReport {
    fn from(report: ScheduleReport) -> Self {
        Self {
            span: report.span(),
            scheduled: report.scheduled,
            excluded: report.excluded.into_iter().map(Into::into).collect(),
        }
    }
}

#[pymethods]
impl PyScheduleReport {
    fn __repr__(&self) -> String {
        format!(
            "ScheduleReport(scheduled={}, excluded={}, span={})",
            self.scheduled.len(),
            self.excluded.len(),
            self.span
        )
    }
}

/// Timeline layout of a scheduled workflow (PyO3 wrapper).
#[pyclass(name = "TimelineLayout")]
#[derive(Clone, Debug)]
pub struct PyTimelineLayout {
    /// Jobs in chronological order
    #[pyo3(get)]
    pub jobs: Vec<ScheduledJob>,
    #[pyo3(get)]
    pub rows: HashMap<String, usize>,
    #[pyo3(get)]
    pub row_count: usize,
    #[pyo3(get)]
    pub span: f64,
    #[pyo3(get)]
    pub ticks: Vec<f64>,
    #[pyo3(get)]
    pub axis_labels: Vec<String>,
    #[pyo3(get)]
    pub include_hours: bool,
    /// Hover label per job, parallel to `jobs`
    #[pyo3(get)]
    pub labels: Vec<String>,
}

impl From<TimelineLayout> for PyTimelineLayout {
    fn from(layout: TimelineLayout) -> Self {
        Self {
            axis_labels: layout.axis_labels(),
            jobs: layout.jobs,
            rows: layout.rows.into_iter().collect(),
            row_count: layout.row_count,
            span: layout.span,
            ticks: layout.ticks,
            include_hours: layout.include_hours,
            labels: layout.labels,
        }
    }
}

#[pymethods]
impl PyTimelineLayout {
    /// Row of a job, None for unknown ids.
    fn row_of(&self, id: &str) -> Option<usize> {
        self.rows.get(id).copied()
    }

    fn __repr__(&self) -> String {
        format!(
            "TimelineLayout(jobs={}, row_count={}, span={})",
            self.jobs.len(),
            self.row_count,
            self.span
        )
    }
}

/// Schedule every job of a workflow.
///
/// # Arguments
/// * `workflow` - Workflow to schedule
/// * `pipeline` - Pipeline used to resolve `uses` references
///
/// # Returns
/// * List of ScheduledJob in visitation order (not sorted by start).
///   Unreachable jobs are silently left out.
#[pyfunction]
#[pyo3(name = "calculate_scheduled_jobs")]
fn py_calculate_scheduled_jobs(workflow: Workflow, pipeline: Pipeline) -> Vec<ScheduledJob> {
    calculate_scheduled_jobs(&workflow, &pipeline)
}

/// Critical path length of a named workflow; 0 if the name is unknown.
#[pyfunction]
#[pyo3(name = "critical_path_duration")]
fn py_critical_path_duration(workflow_name: &str, pipeline: Pipeline) -> f64 {
    critical_path_duration(workflow_name, &pipeline)
}

/// Whether any job duration in the workflow cannot be determined.
#[pyfunction]
#[pyo3(name = "has_missing_durations")]
fn py_has_missing_durations(workflow: Workflow, pipeline: Pipeline) -> bool {
    has_missing_durations(&workflow, &pipeline)
}

/// Ids of the workflow's jobs whose duration cannot be determined.
#[pyfunction]
#[pyo3(name = "jobs_missing_durations")]
fn py_jobs_missing_durations(workflow: Workflow, pipeline: Pipeline) -> Vec<String> {
    jobs_missing_durations(&workflow, &pipeline)
}

/// Assign each scheduled job a timeline row.
///
/// # Returns
/// * Dict mapping job ID to row index
#[pyfunction]
#[pyo3(name = "assign_rows")]
fn py_assign_rows(jobs: Vec<ScheduledJob>) -> HashMap<String, usize> {
    assign_rows(&jobs).into_iter().collect()
}

/// Schedule a workflow and report excluded jobs.
///
/// # Arguments
/// * `workflow` - Workflow to schedule
/// * `pipeline` - Pipeline used to resolve `uses` references
/// * `config` - Scheduling configuration (defaults: memoized, strict cycles)
///
/// # Returns
/// * ScheduleReport with scheduled jobs, excluded jobs and span
///
/// # Raises
/// * ValueError if a workflow reference cycle is found and
///   `config.fail_on_workflow_cycle` is set
#[pyfunction]
#[pyo3(name = "schedule_workflow", signature = (workflow, pipeline, config=None))]
fn py_schedule_workflow(
    workflow: Workflow,
    pipeline: Pipeline,
    config: Option<ScheduleConfig>,
) -> PyResult<PyScheduleReport> {
    let config = config.unwrap_or_default();
    match schedule_workflow(&workflow, &pipeline, &config) {
        Ok(report) => Ok(report.into()),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// Return the jobs sorted by start time, ties broken by ID.
#[pyfunction]
#[pyo3(name = "sort_chronologically")]
fn py_sort_chronologically(mut jobs: Vec<ScheduledJob>) -> Vec<ScheduledJob> {
    sort_chronologically(&mut jobs);
    jobs
}

/// Lay out scheduled jobs for a timeline: order, rows and axis.
#[pyfunction]
#[pyo3(name = "build_timeline", signature = (jobs, config=None))]
fn py_build_timeline(jobs: Vec<ScheduledJob>, config: Option<TimelineConfig>) -> PyTimelineLayout {
    TimelineLayout::build(jobs, &config.unwrap_or_default()).into()
}

/// Axis tick positions from 0 to `span`.
#[pyfunction]
#[pyo3(name = "axis_ticks", signature = (span, config=None))]
fn py_axis_ticks(span: f64, config: Option<TimelineConfig>) -> Vec<f64> {
    layout::axis_ticks(span, &config.unwrap_or_default())
}

/// Format seconds as m:ss, or h:mm:ss with include_hours.
#[pyfunction]
#[pyo3(name = "format_duration", signature = (seconds, include_hours=false))]
fn py_format_duration(seconds: f64, include_hours: bool) -> String {
    layout::format_duration(seconds, include_hours)
}

/// Check a pipeline for structural problems.
///
/// # Returns
/// * List of human-readable issue descriptions (empty when valid)
#[pyfunction]
#[pyo3(name = "validate_pipeline")]
fn py_validate_pipeline(pipeline: Pipeline) -> Vec<String> {
    validate_pipeline(&pipeline)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// The pipeviz.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Data model
    m.add_class::<Job>()?;
    m.add_class::<Edge>()?;
    m.add_class::<Workflow>()?;
    m.add_class::<Pipeline>()?;
    m.add_class::<ScheduledJob>()?;

    // Results
    m.add_class::<PyExcludedJob>()?;
    m.add_class::<PyScheduleReport>()?;
    m.add_class::<PyTimelineLayout>()?;

    // Config types
    m.add_class::<ScheduleConfig>()?;
    m.add_class::<TimelineConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_calculate_scheduled_jobs, m)?)?;
    m.add_function(wrap_pyfunction!(py_critical_path_duration, m)?)?;
    m.add_function(wrap_pyfunction!(py_has_missing_durations, m)?)?;
    m.add_function(wrap_pyfunction!(py_jobs_missing_durations, m)?)?;
    m.add_function(wrap_pyfunction!(py_assign_rows, m)?)?;
    m.add_function(wrap_pyfunction!(py_schedule_workflow, m)?)?;
    m.add_function(wrap_pyfunction!(py_sort_chronologically, m)?)?;
    m.add_function(wrap_pyfunction!(py_build_timeline, m)?)?;
    m.add_function(wrap_pyfunction!(py_axis_ticks, m)?)?;
    m.add_function(wrap_pyfunction!(py_format_duration, m)?)?;
    m.add_function(wrap_pyfunction!(py_validate_pipeline, m)?)?;

    Ok(())
}
