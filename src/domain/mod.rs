//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - unit identity and daily records (`OrgUnit`, `ProfitRecord`)
//! - per-unit outputs (`ProfitSeries`, `Stats`)
//! - rendering and run configuration (`ChartConfig`, `DateRange`, `ReportConfig`)

pub mod types;

pub use types::*;
