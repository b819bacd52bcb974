//! Core domain types and logic.

pub mod error;
pub mod indicator;
pub mod indicator_set;
pub mod instrument;
pub mod news;
pub mod scan_config;
pub mod scanner;
pub mod scoring;
pub mod series;
