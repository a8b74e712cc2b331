pub mod aggregation;
pub mod smoothing;

pub use aggregation::{commit_totals, contributors, week_axis, weekly_series};
pub use smoothing::{smooth_curve, CubicSpline, SMOOTH_SAMPLES};
