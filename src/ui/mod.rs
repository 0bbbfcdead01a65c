//! Dashboard rendering: top bar, filter side panel and the chart grid.

pub mod dashboard;
pub mod format;
pub mod panels;
