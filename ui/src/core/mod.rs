//! Upload-to-metrics pipeline. Nothing here depends on Dioxus.

pub mod breakdown;
pub mod coerce;
pub mod columns;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod ingest;
pub mod metrics;
pub mod normalize;
pub mod prepare;
pub mod session;
pub mod stats;
pub mod table;

pub use config::DashboardConfig;
pub use error::LoadError;
pub use filter::{FilterOptions, Selection, ViewFilter};
pub use metrics::TableMetrics;
pub use prepare::{prepare, PreparedTable};
pub use session::{Session, UploadInfo};
