//! Dense integer indices for job ids.
//!
//! Ids are numbered in first-seen order, so iterating indices replays the
//! order in which a workflow declared its jobs.

use rustc_hash::FxHashMap;

/// Interned job index (u32 for compact storage and fast hashing).
pub type JobIndex = u32;

/// Maps job id strings to dense indices and back.
#[derive(Debug, Clone, Default)]
pub struct JobIdInterner {
    to_index: FxHashMap<String, JobIndex>,
    ids: Vec<String>,
}

impl JobIdInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Intern an id. Returns the index and whether it was newly added.
    pub fn intern(&mut self, id: &str) -> (JobIndex, bool) {
        if let Some(&index) = self.to_index.get(id) {
            return (index, false);
        }
        let index = self.ids.len() as JobIndex;
        self.ids.push(id.to_string());
        self.to_index.insert(id.to_string(), index);
        (index, true)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<JobIndex> {
        self.to_index.get(id).copied()
    }

    /// Id for an index. Panics on an index this interner never produced.
    #[inline]
    pub fn resolve(&self, index: JobIndex) -> &str {
        &self.ids[index as usize]
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
