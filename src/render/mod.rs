//! Presentation adapter for finished simulation series.
//!
//! The simulation core hands off three aligned sequences (timestamps,
//! battery %, temperature); this module is the sink that turns them into
//! exportable output. Nothing in `sim` depends on anything here.

pub mod report;

pub use report::SeriesReport;
