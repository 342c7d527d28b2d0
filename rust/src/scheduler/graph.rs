//! Dependency graph for one workflow.

use crate::interner::{JobIdInterner, JobIndex};
use crate::models::{Job, Workflow};

/// Prerequisite/successor adjacency over the jobs of a workflow.
///
/// All lookups are direct index accesses. Ids that only appear on edges are
/// interned too: they get adjacency and in-degree like any job but carry no
/// [`Job`], so the scheduler skips them. No validation happens here.
pub struct DependencyGraph<'w> {
    ids: JobIdInterner,
    /// Declared job per index; the last declaration of a duplicate id wins.
    jobs: Vec<Option<&'w Job>>,
    prerequisites: Vec<Vec<JobIndex>>,
    successors: Vec<Vec<JobIndex>>,
    in_degree: Vec<usize>,
    /// Declared jobs in first-declaration order.
    declared: Vec<JobIndex>,
}

impl<'w> DependencyGraph<'w> {
    pub fn build(workflow: &'w Workflow) -> Self {
        let capacity = workflow.nodes.len();
        let mut graph = Self {
            ids: JobIdInterner::with_capacity(capacity),
            jobs: Vec::with_capacity(capacity),
            prerequisites: Vec::with_capacity(capacity),
            successors: Vec::with_capacity(capacity),
            in_degree: Vec::with_capacity(capacity),
            declared: Vec::with_capacity(capacity),
        };

        for job in &workflow.nodes {
            let (index, is_new) = graph.intern(&job.id);
            if is_new {
                graph.declared.push(index);
            }
            graph.jobs[index as usize] = Some(job);
        }

        for edge in &workflow.edges {
            let (source, _) = graph.intern(&edge.source);
            let (target, _) = graph.intern(&edge.target);
            graph.prerequisites[target as usize].push(source);
            graph.successors[source as usize].push(target);
            graph.in_degree[target as usize] += 1;
        }

        graph
    }

    fn intern(&mut self, id: &str) -> (JobIndex, bool) {
        let (index, is_new) = self.ids.intern(id);
        if is_new {
            self.jobs.push(None);
            self.prerequisites.push(Vec::new());
            self.successors.push(Vec::new());
            self.in_degree.push(0);
        }
        (index, is_new)
    }

    #[inline]
    pub fn id(&self, index: JobIndex) -> &str {
        self.ids.resolve(index)
    }

    #[inline]
    pub fn index_of(&self, id: &str) -> Option<JobIndex> {
        self.ids.get(id)
    }

    /// The declared job, or `None` for an id known only from an edge.
    #[inline]
    pub fn job(&self, index: JobIndex) -> Option<&'w Job> {
        self.jobs[index as usize]
    }

    #[inline]
    pub fn prerequisites(&self, index: JobIndex) -> &[JobIndex] {
        &self.prerequisites[index as usize]
    }

    #[inline]
    pub fn successors(&self, index: JobIndex) -> &[JobIndex] {
        &self.successors[index as usize]
    }

    /// Initial in-degree of every interned id, indexed by [`JobIndex`].
    pub fn in_degrees(&self) -> &[usize] {
        &self.in_degree
    }

    pub fn declared(&self) -> &[JobIndex] {
        &self.declared
    }

    /// Number of interned ids, including edge-only ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
