//! Structural checks over a whole pipeline.
//!
//! Scheduling never calls into this module; it degrades silently on bad
//! input instead. Callers that want to reject a pipeline up front run
//! [`validate_pipeline`] themselves.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::config::ScheduleConfig;
use crate::models::{Pipeline, Workflow};
use crate::scheduler::{schedule_workflow, ExclusionReason};

/// A problem found in a pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("Job \"{job}\" in workflow \"{workflow}\" references unknown workflow \"{uses}\"")]
    UnknownWorkflow {
        workflow: String,
        job: String,
        uses: String,
    },
    #[error("Job \"{job}\" is defined more than once in workflow \"{workflow}\"")]
    DuplicateJob { workflow: String, job: String },
    #[error("Edge \"{from}\" -> \"{to}\" in workflow \"{workflow}\" references unknown job \"{missing}\"")]
    DanglingEdge {
        workflow: String,
        from: String,
        to: String,
        missing: String,
    },
    #[error("Jobs {} in workflow \"{workflow}\" depend on each other in a cycle", .jobs.join(", "))]
    DependencyCycle { workflow: String, jobs: Vec<String> },
    #[error("Workflow reference cycle: {}", .path.join(" -> "))]
    WorkflowCycle { path: Vec<String> },
}

/// Collect every issue in `pipeline`, workflow by workflow in declaration
/// order, followed by workflow reference cycles.
pub fn validate_pipeline(pipeline: &Pipeline) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (name, workflow) in &pipeline.workflows {
        check_jobs(name, workflow, pipeline, &mut issues);
        check_edges(name, workflow, &mut issues);
        check_dependency_cycles(name, workflow, pipeline, &mut issues);
    }
    check_workflow_cycles(pipeline, &mut issues);
    issues
}

fn check_jobs(
    name: &str,
    workflow: &Workflow,
    pipeline: &Pipeline,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut reported: FxHashSet<&str> = FxHashSet::default();

    for job in &workflow.nodes {
        if !seen.insert(job.id.as_str()) && reported.insert(job.id.as_str()) {
            issues.push(ValidationIssue::DuplicateJob {
                workflow: name.to_string(),
                job: job.id.clone(),
            });
        }
        if let Some(uses) = &job.uses {
            if pipeline.get(uses).is_none() {
                issues.push(ValidationIssue::UnknownWorkflow {
                    workflow: name.to_string(),
                    job: job.id.clone(),
                    uses: uses.clone(),
                });
            }
        }
    }
}

fn check_edges(name: &str, workflow: &Workflow, issues: &mut Vec<ValidationIssue>) {
    let declared: FxHashSet<&str> = workflow.nodes.iter().map(|j| j.id.as_str()).collect();

    for edge in &workflow.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !declared.contains(endpoint.as_str()) {
                issues.push(ValidationIssue::DanglingEdge {
                    workflow: name.to_string(),
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
    }
}

fn check_dependency_cycles(
    name: &str,
    workflow: &Workflow,
    pipeline: &Pipeline,
    issues: &mut Vec<ValidationIssue>,
) {
    let Ok(report) = schedule_workflow(workflow, pipeline, &ScheduleConfig::lenient()) else {
        return;
    };
    let jobs: Vec<String> = report
        .excluded
        .into_iter()
        .filter(|job| job.reason == ExclusionReason::Cycle)
        .map(|job| job.id)
        .collect();
    if !jobs.is_empty() {
        issues.push(ValidationIssue::DependencyCycle {
            workflow: name.to_string(),
            jobs,
        });
    }
}

fn check_workflow_cycles(pipeline: &Pipeline, issues: &mut Vec<ValidationIssue>) {
    let mut walk = ReferenceWalk::new(pipeline);
    for name in pipeline.names() {
        walk.visit(name);
    }

    let mut seen_cycles: Vec<Vec<String>> = Vec::new();
    for path in walk.cycles {
        // The same loop can be entered from more than one workflow.
        let mut members = path[..path.len() - 1].to_vec();
        members.sort();
        if !seen_cycles.contains(&members) {
            seen_cycles.push(members);
            issues.push(ValidationIssue::WorkflowCycle { path });
        }
    }
}

/// Depth-first walk over `uses` references. A job with an explicit duration
/// never consults the workflow it uses, so it adds no reference. Every job
/// is followed regardless of whether its workflow would schedule it.
struct ReferenceWalk<'p> {
    pipeline: &'p Pipeline,
    path: Vec<&'p str>,
    done: FxHashSet<&'p str>,
    /// Each cycle starts and ends with the repeated workflow name.
    cycles: Vec<Vec<String>>,
}

impl<'p> ReferenceWalk<'p> {
    fn new(pipeline: &'p Pipeline) -> Self {
        Self {
            pipeline,
            path: Vec::new(),
            done: FxHashSet::default(),
            cycles: Vec::new(),
        }
    }

    fn visit(&mut self, name: &'p str) {
        if let Some(pos) = self.path.iter().position(|&n| n == name) {
            let mut cycle: Vec<String> = self.path[pos..].iter().map(|n| n.to_string()).collect();
            cycle.push(name.to_string());
            self.cycles.push(cycle);
            return;
        }
        if self.done.contains(name) {
            return;
        }
        let pipeline = self.pipeline;
        let Some(workflow) = pipeline.get(name) else {
            return;
        };

        self.path.push(name);
        for job in &workflow.nodes {
            if job.duration.is_some() {
                continue;
            }
            if let Some(uses) = job.uses.as_deref() {
                self.visit(uses);
            }
        }
        self.path.pop();
        self.done.insert(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Job};

    fn make_pipeline(workflows: Vec<(&str, Workflow)>) -> Pipeline {
        workflows
            .into_iter()
            .map(|(name, wf)| (name.to_string(), wf))
            .collect()
    }

    #[test]
    fn test_clean_pipeline() {
        let pipeline = make_pipeline(vec![
            ("sub", Workflow::from_parts(vec![Job::leaf("x", 1.0)], vec![])),
            (
                "main",
                Workflow::from_parts(
                    vec![Job::leaf("a", 1.0), Job::composite("b", "sub")],
                    vec![Edge::between("a", "b")],
                ),
            ),
        ]);
        assert!(validate_pipeline(&pipeline).is_empty());
    }

    #[test]
    fn test_unknown_workflow_message() {
        let pipeline = make_pipeline(vec![(
            "main",
            Workflow::from_parts(vec![Job::composite("deploy", "release")], vec![]),
        )]);
        let issues = validate_pipeline(&pipeline);

        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].to_string(),
            "Job \"deploy\" in workflow \"main\" references unknown workflow \"release\""
        );
    }

    #[test]
    fn test_duplicate_reported_once() {
        let pipeline = make_pipeline(vec![(
            "main",
            Workflow::from_parts(
                vec![Job::leaf("a", 1.0), Job::leaf("a", 2.0), Job::leaf("a", 3.0)],
                vec![],
            ),
        )]);
        assert_eq!(
            validate_pipeline(&pipeline),
            vec![ValidationIssue::DuplicateJob {
                workflow: "main".to_string(),
                job: "a".to_string(),
            }]
        );
    }

    #[test]
    fn test_dangling_edge() {
        let pipeline = make_pipeline(vec![(
            "main",
            Workflow::from_parts(vec![Job::leaf("a", 1.0)], vec![Edge::between("a", "ghost")]),
        )]);
        assert_eq!(
            validate_pipeline(&pipeline),
            vec![ValidationIssue::DanglingEdge {
                workflow: "main".to_string(),
                from: "a".to_string(),
                to: "ghost".to_string(),
                missing: "ghost".to_string(),
            }]
        );
    }

    #[test]
    fn test_dependency_cycle() {
        let pipeline = make_pipeline(vec![(
            "main",
            Workflow::from_parts(
                vec![Job::leaf("a", 1.0), Job::leaf("b", 1.0), Job::leaf("c", 1.0)],
                vec![
                    Edge::between("a", "b"),
                    Edge::between("b", "a"),
                    Edge::between("b", "c"),
                ],
            ),
        )]);
        assert_eq!(
            validate_pipeline(&pipeline),
            vec![ValidationIssue::DependencyCycle {
                workflow: "main".to_string(),
                jobs: vec!["a".to_string(), "b".to_string()],
            }]
        );
    }

    #[test]
    fn test_workflow_cycle_through_unscheduled_job() {
        // "x" waits on a missing job and never runs, but its reference still loops.
        let pipeline = make_pipeline(vec![
            (
                "a",
                Workflow::from_parts(
                    vec![Job::leaf("start", 1.0), Job::composite("x", "b")],
                    vec![Edge::between("ghost", "x")],
                ),
            ),
            ("b", Workflow::from_parts(vec![Job::composite("y", "a")], vec![])),
        ]);
        let issues = validate_pipeline(&pipeline);

        assert!(issues.contains(&ValidationIssue::WorkflowCycle {
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        }));
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_workflow_cycle_on_dependency_cycle() {
        let pipeline = make_pipeline(vec![(
            "loop",
            Workflow::from_parts(
                vec![Job::composite("p", "loop"), Job::leaf("q", 1.0)],
                vec![Edge::between("p", "q"), Edge::between("q", "p")],
            ),
        )]);
        let issues = validate_pipeline(&pipeline);

        assert!(issues.contains(&ValidationIssue::WorkflowCycle {
            path: vec!["loop".to_string(), "loop".to_string()],
        }));
    }

    #[test]
    fn test_explicit_duration_breaks_reference_loop() {
        let pipeline = make_pipeline(vec![
            ("a", Workflow::from_parts(vec![Job::composite("x", "b")], vec![])),
            (
                "b",
                Workflow::from_parts(
                    vec![Job {
                        id: "y".to_string(),
                        duration: Some(5.0),
                        uses: Some("a".to_string()),
                    }],
                    vec![],
                ),
            ),
        ]);
        assert!(validate_pipeline(&pipeline).is_empty());
    }

    #[test]
    fn test_workflow_cycle_reported_once() {
        let pipeline = make_pipeline(vec![
            ("a", Workflow::from_parts(vec![Job::composite("x", "b")], vec![])),
            ("b", Workflow::from_parts(vec![Job::composite("y", "a")], vec![])),
        ]);
        assert_eq!(
            validate_pipeline(&pipeline),
            vec![ValidationIssue::WorkflowCycle {
                path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            }]
        );
    }
}
