//! Concrete adapter implementations for ports.

pub mod csv_export_adapter;
pub mod csv_series_adapter;
pub mod csv_universe_adapter;
pub mod file_config_adapter;
#[cfg(feature = "net")]
pub mod google_news_adapter;
pub mod layered_config_adapter;
pub mod table_report_adapter;
#[cfg(feature = "net")]
pub mod yahoo_adapter;
