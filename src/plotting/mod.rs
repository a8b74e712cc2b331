pub mod chart;
pub mod styles;


pub use chart::{commit_axis_max, ChartRenderer};
pub use styles::{ChartStyle, ChartTheme};
