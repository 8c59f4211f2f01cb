//! `profit-trend` library crate.
//!
//! The binary (`profit-trend`) is a thin wrapper around this library so that
//! the aggregation and chart code is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod notify;
pub mod plot;
pub mod report;
pub mod trend;
pub mod tui;
