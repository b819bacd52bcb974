//! Port traits: the seams between the scan core and the outside world.

pub mod config_port;
pub mod news_port;
pub mod report_port;
pub mod series_port;
pub mod universe_port;
