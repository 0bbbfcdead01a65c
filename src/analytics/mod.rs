//! Aggregation layer.
//!
//! Every function here is a pure fold over borrowed [`Transaction`] rows;
//! the caller decides which rows are visible (see [`crate::data::filter`])
//! and these functions never look at filter state themselves. Grouped
//! tables come back key-ascending, rankings value-descending.
//!
//! [`Transaction`]: crate::data::model::Transaction

pub mod breakdown;
pub mod distribution;
pub mod report;
pub mod series;
pub mod summary;
