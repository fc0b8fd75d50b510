//! `holdings-recon`: subscription coverage reconciliation engine.
//!
//! Pure engine crate: receives a pre-loaded client ledger and master catalog,
//! returns per-row and per-title coverage. No CLI or IO dependencies.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod matcher;
pub mod model;
pub mod resolve;
pub mod years;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{
    CatalogRow, ReconInput, ReconResult, ReconWarning, RowCoverage, SubscriptionEntry,
    TitleCoverage,
};
pub use years::{clamp_years, compress_to_ranges, YearSet, YearWindow};
