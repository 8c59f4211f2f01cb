//! Outbound notifications of report results.

use crate::error::AppError;
use crate::report::Summary;

pub mod slack;

pub use slack::*;

/// Somewhere a run's outcome can be posted.
pub trait Notifier {
    fn send_summary(&self, summary: &Summary, period_days: usize) -> Result<(), AppError>;
    fn send_error(&self, err: &AppError) -> Result<(), AppError>;
}
