//! Dashboard panels. Every panel reads from the shared [`Session`] signal and
//! renders nothing until an upload succeeds.
//!
//! [`Session`]: crate::core::Session

mod bars;
mod charts;
mod filters;
mod overview;
mod summary;
mod table;
mod upload;

pub use bars::{Bar, BarList};
pub use charts::{efficiency_label, sla_status_label, BreakdownCharts};
pub use filters::FilterPanel;
pub use overview::OverviewCards;
pub use summary::StatisticalSummary;
pub use table::DetailTable;
pub use upload::UploadPanel;
