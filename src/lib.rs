//! marketscan: momentum scanner for equities and crypto.
//!
//! Fetches recent price/volume history for every instrument of a universe,
//! derives a fixed indicator set (percentage changes, RSI, volume ratio,
//! upside to recent high), scores it with a pluggable policy and ranks the
//! result.
//!
//! Hexagonal layout: `domain` holds the pure logic, `ports` the traits it
//! talks through, and `adapters` the CSV, INI, terminal and (with the `net`
//! feature) HTTP implementations.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
