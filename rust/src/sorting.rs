//! Ordering helpers for scheduled jobs.

use std::cmp::Ordering;

use crate::models::ScheduledJob;

/// Compare f64 values for sorting, treating incomparable values as equal.
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Chronological display order: by start, ties broken by id.
pub fn chronological(a: &ScheduledJob, b: &ScheduledJob) -> Ordering {
    cmp_f64(a.start, b.start).then_with(|| a.id.cmp(&b.id))
}

/// Sort jobs in place into chronological display order.
///
/// The scheduler emits jobs in visitation order; timelines list them by
/// start time instead.
pub fn sort_chronologically(jobs: &mut [ScheduledJob]) {
    jobs.sort_by(chronological);
}
