//! Critical-path forward pass (Kahn's algorithm with running finish times).

use std::collections::VecDeque;

use crate::config::ScheduleConfig;
use crate::interner::JobIndex;
use crate::models::{Pipeline, ScheduledJob, Workflow};
use crate::{log_steps, log_summary, log_trace};

use super::graph::DependencyGraph;
use super::report::{ExcludedJob, ExclusionReason, ScheduleError, ScheduleReport};
use super::resolver::DurationResolver;

/// Schedule every job of `workflow`, resolving composite durations against
/// `pipeline`.
///
/// Output is in visitation order. Jobs the traversal never reaches (cycles,
/// dangling prerequisites) are left out; use [`schedule_workflow`] to learn
/// which and why.
pub fn calculate_scheduled_jobs(workflow: &Workflow, pipeline: &Pipeline) -> Vec<ScheduledJob> {
    DurationResolver::new(pipeline, ScheduleConfig::lenient())
        .schedule(workflow)
        .map(|report| report.scheduled)
        .unwrap_or_default()
}

/// Critical path length of the workflow called `workflow_name`, or 0 when
/// no such workflow exists.
pub fn critical_path_duration(workflow_name: &str, pipeline: &Pipeline) -> f64 {
    DurationResolver::new(pipeline, ScheduleConfig::lenient())
        .critical_path(workflow_name)
        .unwrap_or(0.0)
}

/// Schedule `workflow` and report excluded jobs.
///
/// # Returns
/// * `Ok(ScheduleReport)` with scheduled jobs in visitation order and
///   excluded jobs in declaration order
/// * `Err(ScheduleError::WorkflowCycle)` if `config.fail_on_workflow_cycle`
///   is set and a `uses` chain loops
pub fn schedule_workflow(
    workflow: &Workflow,
    pipeline: &Pipeline,
    config: &ScheduleConfig,
) -> Result<ScheduleReport, ScheduleError> {
    DurationResolver::new(pipeline, config.clone()).schedule(workflow)
}

/// Run the forward pass over a built graph.
pub(crate) fn forward_pass(
    graph: &DependencyGraph<'_>,
    resolver: &mut DurationResolver<'_>,
) -> Result<ScheduleReport, ScheduleError> {
    let verbosity = resolver.verbosity();
    let mut in_degree = graph.in_degrees().to_vec();
    let mut finish: Vec<Option<f64>> = vec![None; graph.len()];
    let mut scheduled: Vec<ScheduledJob> = Vec::with_capacity(graph.declared().len());

    let mut queue: VecDeque<JobIndex> = graph
        .declared()
        .iter()
        .copied()
        .filter(|&index| in_degree[index as usize] == 0)
        .collect();
    log_trace!(
        verbosity,
        "Seeded queue: {:?}",
        queue.iter().map(|&i| graph.id(i)).collect::<Vec<_>>()
    );

    while let Some(index) = queue.pop_front() {
        let Some(job) = graph.job(index) else {
            log_trace!(verbosity, "  Skipping undeclared id {:?}", graph.id(index));
            continue;
        };

        let duration = resolver.job_duration(job)?;
        let start = start_time(graph.prerequisites(index), &finish);
        let end = start + duration;
        finish[index as usize] = Some(end);
        log_steps!(verbosity, "  Scheduled {} at [{}, {}]", job.id, start, end);

        scheduled.push(ScheduledJob {
            id: job.id.clone(),
            start,
            end,
            uses: job.uses.clone(),
        });

        for &successor in graph.successors(index) {
            let degree = &mut in_degree[successor as usize];
            *degree -= 1;
            log_trace!(
                verbosity,
                "    {} in-degree -> {}",
                graph.id(successor),
                *degree
            );
            if *degree == 0 {
                queue.push_back(successor);
            }
        }
    }

    let excluded = classify_unreached(graph, &finish);
    for job in &excluded {
        log_summary!(
            verbosity,
            "Excluded {} ({}: {:?})",
            job.id,
            job.reason.as_str(),
            job.reason.related()
        );
    }

    Ok(ScheduleReport {
        scheduled,
        excluded,
    })
}

/// A job starts at 0 without prerequisites, otherwise when the slowest
/// prerequisite finishes.
fn start_time(prerequisites: &[JobIndex], finish: &[Option<f64>]) -> f64 {
    if prerequisites.is_empty() {
        return 0.0;
    }
    prerequisites
        .iter()
        .map(|&p| finish[p as usize].unwrap_or(0.0))
        .fold(f64::NEG_INFINITY, f64::max)
}

fn classify_unreached(graph: &DependencyGraph<'_>, finish: &[Option<f64>]) -> Vec<ExcludedJob> {
    let unreached: Vec<bool> = (0..graph.len())
        .map(|i| graph.job(i as JobIndex).is_some() && finish[i].is_none())
        .collect();

    graph
        .declared()
        .iter()
        .copied()
        .filter(|&index| unreached[index as usize])
        .map(|index| ExcludedJob {
            id: graph.id(index).to_string(),
            reason: exclusion_reason(graph, index, &unreached),
        })
        .collect()
}

fn exclusion_reason(
    graph: &DependencyGraph<'_>,
    index: JobIndex,
    unreached: &[bool],
) -> ExclusionReason {
    let prerequisites = graph.prerequisites(index);

    let missing = distinct_ids(
        graph,
        prerequisites.iter().copied().filter(|&p| graph.job(p).is_none()),
    );
    if !missing.is_empty() {
        return ExclusionReason::DanglingPrerequisite { missing };
    }

    if on_cycle(graph, index, unreached) {
        return ExclusionReason::Cycle;
    }

    ExclusionReason::BlockedBy {
        prerequisites: distinct_ids(
            graph,
            prerequisites
                .iter()
                .copied()
                .filter(|&p| unreached[p as usize]),
        ),
    }
}

/// Whether `origin` can reach itself through unreached jobs.
fn on_cycle(graph: &DependencyGraph<'_>, origin: JobIndex, unreached: &[bool]) -> bool {
    let mut seen = vec![false; graph.len()];
    let mut stack: Vec<JobIndex> = graph.successors(origin).to_vec();

    while let Some(index) = stack.pop() {
        if index == origin {
            return true;
        }
        if !unreached[index as usize] || seen[index as usize] {
            continue;
        }
        seen[index as usize] = true;
        stack.extend_from_slice(graph.successors(index));
    }
    false
}

fn distinct_ids(
    graph: &DependencyGraph<'_>,
    indices: impl Iterator<Item = JobIndex>,
) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for index in indices {
        let id = graph.id(index);
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
