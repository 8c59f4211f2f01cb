//! Slack incoming-webhook notifications.
//!
//! Message building is kept pure (`build_*`) so it can be tested without a
//! network; `SlackNotifier` only serialises and posts.

use std::time::Duration;

use chrono::Local;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::error::AppError;
use crate::notify::Notifier;
use crate::plot::fmt_day;
use crate::report::Summary;

const WEBHOOK_ENV: &str = "SLACK_HOOK";
const TIMEOUT: Duration = Duration::from_secs(10);
const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub color: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl Field {
    fn new(title: impl Into<String>, value: impl Into<String>, short: bool) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short,
        }
    }
}

pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| AppError::new(5, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    /// Notifier from `SLACK_HOOK` (`.env` is honoured). `None` when unset or empty.
    pub fn from_env() -> Result<Option<Self>, AppError> {
        dotenvy::dotenv().ok();
        match std::env::var(WEBHOOK_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()).map(Some),
            _ => Ok(None),
        }
    }

    fn send(&self, message: &SlackMessage) -> Result<(), AppError> {
        let resp = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .map_err(|e| AppError::new(5, format!("Slack request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                5,
                format!("Slack webhook returned status {}.", resp.status()),
            ));
        }
        Ok(())
    }
}

impl Notifier for SlackNotifier {
    fn send_summary(&self, summary: &Summary, period_days: usize) -> Result<(), AppError> {
        let message = build_summary_message(summary, period_days, &now_stamp());
        self.send(&message)
    }

    fn send_error(&self, err: &AppError) -> Result<(), AppError> {
        let message = build_error_message(err, &now_stamp());
        self.send(&message)
    }
}

/// Overall statistics, plus the top-N ranking when more than one unit reported.
pub fn build_summary_message(summary: &Summary, period_days: usize, timestamp: &str) -> SlackMessage {
    let overall = Attachment {
        color: "good".to_string(),
        title: "Overall".to_string(),
        text: None,
        fields: vec![
            Field::new("Total profit", format_currency(summary.total_profit), true),
            Field::new("Average profit", format_currency(summary.avg_profit), true),
            Field::new(
                "Max profit",
                format!("{} ({})", format_currency(summary.max_profit), fmt_day(summary.max_date)),
                true,
            ),
            Field::new(
                "Min profit",
                format!("{} ({})", format_currency(summary.min_profit), fmt_day(summary.min_date)),
                true,
            ),
            Field::new("Units", summary.unit_count.to_string(), true),
            Field::new("Run at", timestamp, true),
        ],
    };

    let mut attachments = vec![overall];
    if summary.unit_count > 1 && !summary.top.is_empty() {
        let fields = summary
            .top
            .iter()
            .enumerate()
            .map(|(i, unit)| {
                Field::new(
                    format!("{}.", i + 1),
                    format!("{}: {}", unit.name, format_currency(unit.total_profit)),
                    false,
                )
            })
            .collect();
        attachments.push(Attachment {
            color: "warning".to_string(),
            title: format!("Top {} units", summary.top.len()),
            text: None,
            fields,
        });
    }

    SlackMessage {
        text: format!("Profit trend analysis (last {period_days} days)"),
        attachments,
    }
}

pub fn build_error_message(err: &AppError, timestamp: &str) -> SlackMessage {
    SlackMessage {
        text: "Profit trend analysis failed".to_string(),
        attachments: vec![Attachment {
            color: "danger".to_string(),
            title: "Error details".to_string(),
            text: Some(err.message().to_string()),
            fields: vec![Field::new("Occurred at", timestamp, true)],
        }],
    }
}

/// Whole yen with thousands separators: `-¥1,234,567`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-¥{grouped}")
    } else {
        format!("¥{grouped}")
    }
}

fn now_stamp() -> String {
    Local::now().format(TIMESTAMP_FMT).to_string()
}
