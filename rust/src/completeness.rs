//! Checks whether every job duration in a workflow can be determined.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::{Job, Pipeline, Workflow};

/// Whether any job in `workflow` has a duration that cannot be determined.
///
/// A job is resolvable if it has an explicit duration (zero included) or
/// `uses` a workflow whose jobs are all resolvable, checked transitively.
/// A job with neither field is missing, as is a `uses` naming an unknown
/// workflow or looping back into a workflow already being checked. An empty
/// workflow has nothing missing.
pub fn has_missing_durations(workflow: &Workflow, pipeline: &Pipeline) -> bool {
    let mut check = CompletenessCheck::new(pipeline);
    workflow.nodes.iter().any(|job| check.job_missing(job))
}

/// Ids of the jobs in `workflow` whose duration cannot be determined, in
/// declaration order.
///
/// Every declaration of a duplicated id is checked, so a shadowed
/// declaration with no duration still makes the id missing. Each id is
/// listed once, at its first missing declaration.
pub fn jobs_missing_durations(workflow: &Workflow, pipeline: &Pipeline) -> Vec<String> {
    let mut check = CompletenessCheck::new(pipeline);
    let mut listed: FxHashSet<&str> = FxHashSet::default();
    workflow
        .nodes
        .iter()
        .filter(|job| check.job_missing(job) && listed.insert(job.id.as_str()))
        .map(|job| job.id.clone())
        .collect()
}

struct CompletenessCheck<'p> {
    pipeline: &'p Pipeline,
    /// Workflow name -> has a missing duration somewhere below it.
    memo: FxHashMap<&'p str, bool>,
    path: Vec<&'p str>,
}

impl<'p> CompletenessCheck<'p> {
    fn new(pipeline: &'p Pipeline) -> Self {
        Self {
            pipeline,
            memo: FxHashMap::default(),
            path: Vec::new(),
        }
    }

    fn job_missing(&mut self, job: &Job) -> bool {
        if job.duration.is_some() {
            return false;
        }
        match job.uses.as_deref() {
            Some(name) => self.workflow_missing(name),
            None => true,
        }
    }

    fn workflow_missing(&mut self, name: &str) -> bool {
        let pipeline = self.pipeline;
        let Some((name, workflow)) = pipeline.workflows.iter().find(|(n, _)| n == name) else {
            return true;
        };
        let name = name.as_str();

        if self.path.contains(&name) {
            return true;
        }
        if let Some(&missing) = self.memo.get(name) {
            return missing;
        }

        self.path.push(name);
        let missing = workflow.nodes.iter().any(|job| self.job_missing(job));
        self.path.pop();

        // A path hit means this workflow sits on a loop, which is missing
        // from any entry point, so every answer is safe to keep.
        self.memo.insert(name, missing);
        missing
    }
}
