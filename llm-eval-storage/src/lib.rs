//! Durable result persistence: one JSON file per evaluation, organized by
//! run directory, plus CSV export, summary statistics and the score-total
//! recomputation bridge between manual scoring and reporting.

pub mod csv;
pub mod store;
pub mod summary;

pub use store::{ResultFilter, ResultStore};
pub use summary::RunSummary;
