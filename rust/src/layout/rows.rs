//! Greedy row packing for timeline bars.

use rustc_hash::FxHashMap;

use crate::models::ScheduledJob;
use crate::sorting::cmp_f64;

/// One timeline row: the `[start, end)` intervals already placed in it.
#[derive(Debug, Default)]
struct Row {
    intervals: Vec<(f64, f64)>,
}

impl Row {
    fn fits(&self, start: f64, end: f64) -> bool {
        !self
            .intervals
            .iter()
            .any(|&(s, e)| start < e && s < end)
    }
}

/// Assign every job a row so that jobs sharing a row never overlap.
///
/// Jobs are placed longest first; equal durations keep input order. Each
/// job goes into the first row with room for it, so a short job can drop
/// back into row 0 once row 0 is free again even when higher rows are busy.
/// A duplicated id occupies space for each occurrence and maps to the row
/// of its last one.
pub fn assign_rows(jobs: &[ScheduledJob]) -> FxHashMap<String, usize> {
    let mut ordered: Vec<&ScheduledJob> = jobs.iter().collect();
    // Stable: equal durations keep their input order.
    ordered.sort_by(|a, b| cmp_f64(b.duration(), a.duration()));

    let mut rows: Vec<Row> = Vec::new();
    let mut result = FxHashMap::with_capacity_and_hasher(jobs.len(), Default::default());

    for job in ordered {
        let row = match rows.iter().position(|row| row.fits(job.start, job.end)) {
            Some(row) => row,
            None => {
                rows.push(Row::default());
                rows.len() - 1
            }
        };
        rows[row].intervals.push((job.start, job.end));
        result.insert(job.id.clone(), row);
    }

    result
}

/// Number of rows a row assignment uses.
pub fn row_count(rows: &FxHashMap<String, usize>) -> usize {
    rows.values().max().map_or(0, |&max| max + 1)
}
