//! Pipeline data model consumed and produced by the scheduler.

use pyo3::prelude::*;

/// A job inside a workflow.
///
/// A job is a leaf with an explicit duration, a composite that borrows its
/// duration from another workflow through `uses`, or a leaf whose duration
/// is unknown. If both fields are set, `duration` wins.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub duration: Option<f64>,
    #[pyo3(get, set)]
    pub uses: Option<String>,
}

impl Job {
    pub fn leaf(id: &str, duration: f64) -> Self {
        Self {
            id: id.to_string(),
            duration: Some(duration),
            uses: None,
        }
    }

    pub fn composite(id: &str, uses: &str) -> Self {
        Self {
            id: id.to_string(),
            duration: None,
            uses: Some(uses.to_string()),
        }
    }

    pub fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            duration: None,
            uses: None,
        }
    }
}

#[pymethods]
impl Job {
    #[new]
    #[pyo3(signature = (id, duration=None, uses=None))]
    fn new(id: String, duration: Option<f64>, uses: Option<String>) -> Self {
        Self { id, duration, uses }
    }

    fn __repr__(&self) -> String {
        format!(
            "Job(id={:?}, duration={:?}, uses={:?})",
            self.id, self.duration, self.uses
        )
    }
}

/// `source` must finish before `target` starts.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    #[pyo3(get, set)]
    pub source: String,
    #[pyo3(get, set)]
    pub target: String,
}

impl Edge {
    pub fn between(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

#[pymethods]
impl Edge {
    #[new]
    fn new(source: String, target: String) -> Self {
        Self { source, target }
    }

    fn __repr__(&self) -> String {
        format!("Edge(source={:?}, target={:?})", self.source, self.target)
    }
}

/// One dependency graph of jobs.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Workflow {
    #[pyo3(get, set)]
    pub nodes: Vec<Job>,
    #[pyo3(get, set)]
    pub edges: Vec<Edge>,
}

impl Workflow {
    pub fn from_parts(nodes: Vec<Job>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }
}

#[pymethods]
impl Workflow {
    #[new]
    #[pyo3(signature = (nodes=None, edges=None))]
    fn new(nodes: Option<Vec<Job>>, edges: Option<Vec<Edge>>) -> Self {
        Self {
            nodes: nodes.unwrap_or_default(),
            edges: edges.unwrap_or_default(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Workflow(nodes={}, edges={})",
            self.nodes.len(),
            self.edges.len()
        )
    }
}

/// Named workflows in declaration order.
///
/// Names are looked up linearly; pipelines hold a handful of workflows and
/// declaration order doubles as iteration order everywhere.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pipeline {
    #[pyo3(get, set)]
    pub workflows: Vec<(String, Workflow)>,
}

impl Pipeline {
    /// Look up a workflow by name.
    pub fn get(&self, name: &str) -> Option<&Workflow> {
        self.workflows
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, wf)| wf)
    }

    /// Add or replace a workflow. A replaced workflow keeps its position.
    pub fn insert(&mut self, name: &str, workflow: Workflow) {
        match self.workflows.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = workflow,
            None => self.workflows.push((name.to_string(), workflow)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.workflows.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

impl FromIterator<(String, Workflow)> for Pipeline {
    fn from_iter<I: IntoIterator<Item = (String, Workflow)>>(iter: I) -> Self {
        let mut pipeline = Pipeline::default();
        for (name, workflow) in iter {
            pipeline.insert(&name, workflow);
        }
        pipeline
    }
}

#[pymethods]
impl Pipeline {
    #[new]
    #[pyo3(signature = (workflows=None))]
    fn new(workflows: Option<Vec<(String, Workflow)>>) -> Self {
        workflows.unwrap_or_default().into_iter().collect()
    }

    #[pyo3(name = "get")]
    fn py_get(&self, name: &str) -> Option<Workflow> {
        self.get(name).cloned()
    }

    #[pyo3(name = "insert")]
    fn py_insert(&mut self, name: &str, workflow: Workflow) {
        self.insert(name, workflow);
    }

    fn __len__(&self) -> usize {
        self.len()
    }

    fn __repr__(&self) -> String {
        format!("Pipeline(workflows={:?})", self.names().collect::<Vec<_>>())
    }
}

/// A job placed on the time axis. `end - start` is its resolved duration.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledJob {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub start: f64,
    #[pyo3(get, set)]
    pub end: f64,
    /// Carried through so the timeline can drill into the sub-workflow.
    #[pyo3(get, set)]
    pub uses: Option<String>,
}

impl ScheduledJob {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[pymethods]
impl ScheduledJob {
    #[new]
    #[pyo3(signature = (id, start, end, uses=None))]
    fn new(id: String, start: f64, end: f64, uses: Option<String>) -> Self {
        Self {
            id,
            start,
            end,
            uses,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduledJob(id={:?}, start={}, end={}, uses={:?})",
            self.id, self.start, self.end, self.uses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_preserves_declaration_order() {
        let pipeline: Pipeline = vec![
            ("zeta".to_string(), Workflow::default()),
            ("alpha".to_string(), Workflow::default()),
        ]
        .into_iter()
        .collect();

        assert_eq!(pipeline.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_pipeline_insert_replaces_in_place() {
        let mut pipeline = Pipeline::default();
        pipeline.insert("a", Workflow::default());
        pipeline.insert("b", Workflow::default());
        pipeline.insert(
            "a",
            Workflow::from_parts(vec![Job::leaf("x", 1.0)], vec![]),
        );

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(pipeline.get("a").map(|wf| wf.nodes.len()), Some(1));
        assert!(pipeline.get("missing").is_none());
    }

    #[test]
    fn test_scheduled_job_duration() {
        let job = ScheduledJob {
            id: "a".to_string(),
            start: 2.5,
            end: 10.0,
            uses: None,
        };
        assert!((job.duration() - 7.5).abs() < 1e-9);
    }
}
