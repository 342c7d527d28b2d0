//! Timeline axis and bar layout for a scheduled workflow.

use rustc_hash::FxHashMap;

use crate::config::TimelineConfig;
use crate::models::ScheduledJob;
use crate::sorting::sort_chronologically;

use super::rows::{assign_rows, row_count};

/// Spans at or above this many seconds show hours on the axis.
pub const HOURS_THRESHOLD: f64 = 3600.0;

/// Upper bound on axis ticks, whatever intervals are configured.
pub const MAX_TICKS: usize = 1000;

/// Smallest configured interval that yields at most about
/// `target_tick_count` ticks over `span`, or the largest interval if none do.
pub fn nice_tick_interval(span: f64, config: &TimelineConfig) -> f64 {
    let rough = span / f64::from(config.target_tick_count.max(1));
    let usable = || config.nice_intervals.iter().copied().filter(|&i| i > 0.0);
    usable()
        .find(|&i| i >= rough)
        .or_else(|| usable().reduce(f64::max))
        // Nothing usable configured: the rough spacing itself.
        .unwrap_or(if rough > 0.0 { rough } else { 1.0 })
}

/// Tick positions from 0 to `span`.
///
/// Ticks are whole multiples of the nice interval. The span always gets a
/// tick: it replaces the last multiple when closer than half an interval,
/// otherwise it is appended. A non-finite span is treated as 0, and the
/// interval widens when it would produce more than [`MAX_TICKS`] ticks.
pub fn axis_ticks(span: f64, config: &TimelineConfig) -> Vec<f64> {
    let span = if span.is_finite() { span.max(0.0) } else { 0.0 };
    let interval = nice_tick_interval(span, config).max(span / MAX_TICKS as f64);
    let count = (span / interval).floor() as usize;
    let mut ticks: Vec<f64> = (0..=count).map(|i| i as f64 * interval).collect();

    if let Some(last) = ticks.last_mut() {
        if *last != span {
            if span - *last < interval / 2.0 {
                *last = span;
            } else {
                ticks.push(span);
            }
        }
    }
    ticks
}

/// Format seconds as `m:ss`, or `h:mm:ss` with `include_hours`.
///
/// Rounds to whole seconds; negative input formats as zero.
pub fn format_duration(seconds: f64, include_hours: bool) -> String {
    let total = seconds.max(0.0).round() as u64;
    let secs = total % 60;
    if include_hours {
        format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, secs)
    } else {
        format!("{}:{:02}", total / 60, secs)
    }
}

/// Hover label for a bar, e.g. `build (1:05)`.
pub fn job_label(job: &ScheduledJob) -> String {
    let duration = job.duration();
    format!(
        "{} ({})",
        job.id,
        format_duration(duration, duration >= HOURS_THRESHOLD)
    )
}

/// Everything a timeline renderer needs for one workflow.
#[derive(Clone, Debug)]
pub struct TimelineLayout {
    /// Jobs in chronological order.
    pub jobs: Vec<ScheduledJob>,
    pub rows: FxHashMap<String, usize>,
    pub row_count: usize,
    /// Latest end across all jobs.
    pub span: f64,
    pub ticks: Vec<f64>,
    pub include_hours: bool,
    /// Hover label per job, parallel to `jobs`.
    pub labels: Vec<String>,
}

impl TimelineLayout {
    pub fn build(mut jobs: Vec<ScheduledJob>, config: &TimelineConfig) -> Self {
        sort_chronologically(&mut jobs);
        let rows = assign_rows(&jobs);
        let span = jobs.iter().fold(0.0, |max: f64, job| max.max(job.end));

        Self {
            row_count: row_count(&rows),
            ticks: axis_ticks(span, config),
            include_hours: span >= HOURS_THRESHOLD,
            labels: jobs.iter().map(job_label).collect(),
            jobs,
            rows,
            span,
        }
    }

    /// Row of a job, or `None` for an id that was never laid out.
    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.rows.get(id).copied()
    }

    pub fn axis_labels(&self) -> Vec<String> {
        self.ticks
            .iter()
            .map(|&t| format_duration(t, self.include_hours))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_job(id: &str, start: f64, end: f64) -> ScheduledJob {
        ScheduledJob {
            id: id.to_string(),
            start,
            end,
            uses: None,
        }
    }

    #[test]
    fn test_nice_interval_picks_first_wide_enough() {
        let config = TimelineConfig::default();
        assert_eq!(nice_tick_interval(100.0, &config), 30.0);
        assert_eq!(nice_tick_interval(7.0, &config), 2.0);
        assert_eq!(nice_tick_interval(0.0, &config), 1.0);
    }

    #[test]
    fn test_nice_interval_falls_back_to_largest() {
        let config = TimelineConfig::default();
        assert_eq!(nice_tick_interval(10_000_000.0, &config), 86400.0);
    }

    #[test]
    fn test_nice_interval_without_candidates() {
        let config = TimelineConfig {
            target_tick_count: 4,
            nice_intervals: vec![],
        };
        assert_eq!(nice_tick_interval(100.0, &config), 25.0);
    }

    #[test]
    fn test_ticks_replace_close_last_tick() {
        let ticks = axis_ticks(100.0, &TimelineConfig::default());
        assert_eq!(ticks, vec![0.0, 30.0, 60.0, 100.0]);
    }

    #[test]
    fn test_ticks_append_far_span() {
        let ticks = axis_ticks(7.0, &TimelineConfig::default());
        assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 7.0]);
    }

    #[test]
    fn test_ticks_exact_multiple_and_zero() {
        assert_eq!(
            axis_ticks(60.0, &TimelineConfig::default()),
            vec![0.0, 15.0, 30.0, 45.0, 60.0]
        );
        assert_eq!(axis_ticks(0.0, &TimelineConfig::default()), vec![0.0]);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(65.0, false), "1:05");
        assert_eq!(format_duration(59.6, false), "1:00");
        assert_eq!(format_duration(3725.0, true), "1:02:05");
        assert_eq!(format_duration(3725.0, false), "62:05");
        assert_eq!(format_duration(-3.0, false), "0:00");
    }

    #[test]
    fn test_job_label() {
        assert_eq!(job_label(&make_job("build", 10.0, 75.0)), "build (1:05)");
        assert_eq!(job_label(&make_job("soak", 0.0, 7200.0)), "soak (2:00:00)");
    }

    #[test]
    fn test_layout_sorts_and_packs() {
        let jobs = vec![
            make_job("test", 10.0, 30.0),
            make_job("lint", 0.0, 5.0),
            make_job("build", 0.0, 10.0),
        ];
        let layout = TimelineLayout::build(jobs, &TimelineConfig::default());

        let ids: Vec<&str> = layout.jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["build", "lint", "test"]);
        assert_eq!(layout.row_of("test"), Some(0));
        assert_eq!(layout.row_of("build"), Some(0));
        assert_eq!(layout.row_of("lint"), Some(1));
        assert_eq!(
            layout.labels,
            vec!["build (0:10)", "lint (0:05)", "test (0:20)"]
        );
        assert_eq!(layout.row_count, 2);
        assert_eq!(layout.span, 30.0);
        assert!(!layout.include_hours);
        assert_eq!(layout.axis_labels().first().map(String::as_str), Some("0:00"));
        assert_eq!(layout.axis_labels().last().map(String::as_str), Some("0:30"));
    }

    #[test]
    fn test_layout_empty() {
        let layout = TimelineLayout::build(vec![], &TimelineConfig::default());
        assert_eq!(layout.row_count, 0);
        assert_eq!(layout.ticks, vec![0.0]);
        assert!(layout.labels.is_empty());
        assert_eq!(layout.row_of("anything"), None);
    }

    #[test]
    fn test_ticks_non_finite_span() {
        let config = TimelineConfig::default();
        assert_eq!(axis_ticks(f64::INFINITY, &config), vec![0.0]);
        assert_eq!(axis_ticks(f64::NAN, &config), vec![0.0]);
    }

    #[test]
    fn test_ticks_capped_for_tiny_interval() {
        let config = TimelineConfig {
            target_tick_count: 5,
            nice_intervals: vec![1e-9],
        };
        let ticks = axis_ticks(100.0, &config);
        assert!(ticks.len() <= MAX_TICKS + 2);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&100.0));
    }
}
