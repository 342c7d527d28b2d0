//! Timeline layout: row packing, axis ticks and labels.

mod rows;
mod timeline;

pub use rows::{assign_rows, row_count};
pub use timeline::{
    axis_ticks, format_duration, job_label, nice_tick_interval, TimelineLayout, HOURS_THRESHOLD,
    MAX_TICKS,
};
