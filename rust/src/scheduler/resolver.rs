//! Duration resolution through nested workflow references.

use rustc_hash::FxHashMap;

use crate::config::ScheduleConfig;
use crate::models::{Job, Pipeline, Workflow};
use crate::{log_steps, log_summary};

use super::core::forward_pass;
use super::graph::DependencyGraph;
use super::report::{ScheduleError, ScheduleReport};

/// Resolves job durations for one top-level scheduling request.
///
/// A composite job takes the critical path length of the workflow it
/// `uses`, which means scheduling that workflow first. The resolver keeps
/// the chain of workflow names currently being scheduled so a reference
/// back into that chain is caught instead of recursing forever, and a memo
/// of finished sub-workflow spans that lives only as long as the request.
pub struct DurationResolver<'p> {
    pipeline: &'p Pipeline,
    config: ScheduleConfig,
    memo: FxHashMap<String, f64>,
    path: Vec<String>,
    /// Lenient cycle hits so far; spans computed across one are not memoized.
    cycles_seen: usize,
}

impl<'p> DurationResolver<'p> {
    pub fn new(pipeline: &'p Pipeline, config: ScheduleConfig) -> Self {
        Self {
            pipeline,
            config,
            memo: FxHashMap::default(),
            path: Vec::new(),
            cycles_seen: 0,
        }
    }

    pub(crate) fn verbosity(&self) -> u8 {
        self.config.verbosity
    }

    /// Schedule a workflow against this resolver's pipeline.
    pub fn schedule(&mut self, workflow: &Workflow) -> Result<ScheduleReport, ScheduleError> {
        let graph = DependencyGraph::build(workflow);
        forward_pass(&graph, self)
    }

    /// Explicit duration if present, else the span of the `uses` workflow,
    /// else 0.
    pub fn job_duration(&mut self, job: &Job) -> Result<f64, ScheduleError> {
        if let Some(duration) = job.duration {
            return Ok(duration);
        }
        match job.uses.as_deref() {
            Some(name) => self.critical_path(name),
            None => Ok(0.0),
        }
    }

    /// Critical path length of a named workflow. Unknown names resolve to 0.
    pub fn critical_path(&mut self, name: &str) -> Result<f64, ScheduleError> {
        let verbosity = self.config.verbosity;

        if let Some(pos) = self.path.iter().position(|n| n == name) {
            let mut path = self.path[pos..].to_vec();
            path.push(name.to_string());
            if self.config.fail_on_workflow_cycle {
                return Err(ScheduleError::WorkflowCycle { path });
            }
            log_summary!(
                verbosity,
                "Workflow cycle {} resolved as 0",
                path.join(" -> ")
            );
            self.cycles_seen += 1;
            return Ok(0.0);
        }

        let pipeline = self.pipeline;
        let Some(workflow) = pipeline.get(name) else {
            log_steps!(verbosity, "Unknown workflow {:?} resolved as 0", name);
            return Ok(0.0);
        };

        if let Some(&span) = self.memo.get(name) {
            log_steps!(verbosity, "Memo hit for {}: {}", name, span);
            return Ok(span);
        }

        let cycles_before = self.cycles_seen;
        self.path.push(name.to_string());
        let report = self.schedule(workflow);
        self.path.pop();
        let span = report?.span();

        log_steps!(verbosity, "Workflow {} spans {}", name, span);
        if self.config.memoize && self.cycles_seen == cycles_before {
            self.memo.insert(name.to_string(), span);
        }
        Ok(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_pipeline(workflows: Vec<(&str, Vec<Job>)>) -> Pipeline {
        workflows
            .into_iter()
            .map(|(name, jobs)| (name.to_string(), Workflow::from_parts(jobs, vec![])))
            .collect()
    }

    #[test]
    fn test_job_duration_kinds() {
        let pipeline = make_pipeline(vec![("sub", vec![Job::leaf("x", 12.0)])]);
        let mut resolver = DurationResolver::new(&pipeline, ScheduleConfig::default());

        assert_eq!(resolver.job_duration(&Job::leaf("a", 0.0)), Ok(0.0));
        assert_eq!(resolver.job_duration(&Job::composite("b", "sub")), Ok(12.0));
        assert_eq!(resolver.job_duration(&Job::composite("c", "gone")), Ok(0.0));
        assert_eq!(resolver.job_duration(&Job::unknown("d")), Ok(0.0));
    }

    #[test]
    fn test_memo_reused_within_request() {
        let pipeline = make_pipeline(vec![
            ("leaf", vec![Job::leaf("x", 5.0)]),
            (
                "fanout",
                vec![Job::composite("one", "leaf"), Job::composite("two", "leaf")],
            ),
        ]);
        let mut resolver = DurationResolver::new(&pipeline, ScheduleConfig::default());

        assert_eq!(resolver.critical_path("fanout"), Ok(5.0));
        assert_eq!(resolver.memo.get("leaf"), Some(&5.0));
        assert_eq!(resolver.memo.get("fanout"), Some(&5.0));
        assert!(resolver.path.is_empty());
    }

    #[test]
    fn test_memo_disabled() {
        let pipeline = make_pipeline(vec![("leaf", vec![Job::leaf("x", 5.0)])]);
        let config = ScheduleConfig {
            memoize: false,
            ..ScheduleConfig::default()
        };
        let mut resolver = DurationResolver::new(&pipeline, config);

        assert_eq!(resolver.critical_path("leaf"), Ok(5.0));
        assert!(resolver.memo.is_empty());
    }

    #[test]
    fn test_self_reference_strict() {
        let pipeline = make_pipeline(vec![("loop", vec![Job::composite("again", "loop")])]);
        let mut resolver = DurationResolver::new(&pipeline, ScheduleConfig::default());

        assert_eq!(
            resolver.critical_path("loop"),
            Err(ScheduleError::WorkflowCycle {
                path: vec!["loop".to_string(), "loop".to_string()],
            })
        );
        assert!(resolver.path.is_empty());
    }

    #[test]
    fn test_lenient_cycle_not_memoized() {
        let pipeline = make_pipeline(vec![(
            "loop",
            vec![Job::composite("again", "loop"), Job::leaf("work", 2.0)],
        )]);
        let mut resolver = DurationResolver::new(&pipeline, ScheduleConfig::lenient());

        assert_eq!(resolver.critical_path("loop"), Ok(2.0));
        assert!(resolver.memo.is_empty());
    }
}
