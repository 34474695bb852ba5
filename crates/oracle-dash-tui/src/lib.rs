/*
[INPUT]:  Public API exports for the oracle-dash-tui crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod feed;
pub mod table;
pub mod tui;

// Re-export main types for convenience
pub use config::DashboardConfig;
pub use feed::{ConnectionState, PriceFeed};
pub use table::TableModel;
