//! Configuration types for scheduling and timeline layout.

use pyo3::prelude::*;

/// Configuration for a scheduling request.
#[pyclass]
#[derive(Clone, Debug)]
pub struct ScheduleConfig {
    /// Verbosity level: 0=silent, 1=summary, 2=steps, 3=trace.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Reuse sub-workflow critical paths within one request.
    #[pyo3(get, set)]
    pub memoize: bool,
    /// Return an error when `uses` references loop back to a workflow being
    /// resolved. When false the looping reference resolves to 0.
    #[pyo3(get, set)]
    pub fail_on_workflow_cycle: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            memoize: true,
            fail_on_workflow_cycle: true,
        }
    }
}

impl ScheduleConfig {
    /// Config used by the infallible query functions.
    pub fn lenient() -> Self {
        Self {
            fail_on_workflow_cycle: false,
            ..Self::default()
        }
    }
}

#[pymethods]
impl ScheduleConfig {
    #[new]
    #[pyo3(signature = (verbosity=None, memoize=None, fail_on_workflow_cycle=None))]
    fn new(
        verbosity: Option<u8>,
        memoize: Option<bool>,
        fail_on_workflow_cycle: Option<bool>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            memoize: memoize.unwrap_or(defaults.memoize),
            fail_on_workflow_cycle: fail_on_workflow_cycle
                .unwrap_or(defaults.fail_on_workflow_cycle),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleConfig(verbosity={}, memoize={}, fail_on_workflow_cycle={})",
            self.verbosity, self.memoize, self.fail_on_workflow_cycle
        )
    }
}

/// Tick spacings offered to the timeline axis, in time units (seconds).
pub const DEFAULT_NICE_INTERVALS: [f64; 17] = [
    1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 900.0, 1800.0, 3600.0, 7200.0,
    14400.0, 28800.0, 86400.0,
];

/// Configuration for timeline axis layout.
#[pyclass]
#[derive(Clone, Debug)]
pub struct TimelineConfig {
    /// Approximate number of ticks wanted along the axis
    #[pyo3(get, set)]
    pub target_tick_count: u32,
    /// Candidate tick spacings, ascending
    #[pyo3(get, set)]
    pub nice_intervals: Vec<f64>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            target_tick_count: 5,
            nice_intervals: DEFAULT_NICE_INTERVALS.to_vec(),
        }
    }
}

#[pymethods]
impl TimelineConfig {
    #[new]
    #[pyo3(signature = (target_tick_count=None, nice_intervals=None))]
    fn new(target_tick_count: Option<u32>, nice_intervals: Option<Vec<f64>>) -> Self {
        let defaults = Self::default();
        Self {
            target_tick_count: target_tick_count.unwrap_or(defaults.target_tick_count),
            nice_intervals: nice_intervals.unwrap_or(defaults.nice_intervals),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "TimelineConfig(target_tick_count={}, nice_intervals={})",
            self.target_tick_count,
            self.nice_intervals.len()
        )
    }
}
