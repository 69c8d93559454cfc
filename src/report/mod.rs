pub mod gemini;

use futures::future::BoxFuture;
use tracing::{error, info, instrument, warn};

use crate::error::SummarizerError;
use crate::model::attendance::{AttendanceRecord, local_datetime};
use crate::model::user::User;

pub const REPORT_NOT_CONFIGURED: &str =
    "API key is not configured. Please check your .env file.";
pub const REPORT_SERVICE_BUSY: &str = "The AI service is busy. Please try again later.";
pub const REPORT_EMPTY: &str = "Unable to generate a report right now.";

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Hosted language model turning a prompt into free text.
pub trait Summarizer: Send + Sync {
    /// False when no credential is available; no call is attempted then.
    fn is_configured(&self) -> bool;

    fn summarize<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, SummarizerError>>;
}

/// Opaque report text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report(String);

impl Report {
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Display lines, split on line breaks only.
    pub fn lines(&self) -> Vec<&str> {
        self.0.split('\n').collect()
    }
}

/// One line per record, newest first, at most `limit` records.
pub fn history_lines(records: &[AttendanceRecord], limit: usize) -> Vec<String> {
    let mut recent: Vec<&AttendanceRecord> = records.iter().collect();
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    recent.truncate(limit);

    recent
        .into_iter()
        .map(|r| {
            format!(
                "- {}: {} | Coordinates: {}, {}",
                local_datetime(r.timestamp).format("%H:%M:%S %d/%m/%Y"),
                r.kind.label(),
                r.coordinates.latitude,
                r.coordinates.longitude
            )
        })
        .collect()
}

pub fn build_prompt(user: &User, lines: &[String]) -> String {
    format!(
        "Role: you are the HR admin assistant of an attendance check-in system.\n\
         Task: write a short report for the manager about the attendance of employee {name}.\n\
         \n\
         Recent attendance data:\n\
         {history}\n\
         \n\
         Report requirements:\n\
         1. Summary: does this employee come to work regularly, within the {shift} shift?\n\
         2. Warnings: list any check-in later than 15 minutes after shift start or check-out earlier than 15 minutes before shift end.\n\
         3. Overall: one short, objective assessment for management.\n\
         \n\
         Style: concise, professional, bullet points, no large markdown headers.",
        name = user.name,
        shift = user.shift_window(),
        history = lines.join("\n"),
    )
}

pub struct ReportService<M: Summarizer> {
    summarizer: M,
    history_limit: usize,
}

impl<M: Summarizer> ReportService<M> {
    pub fn new(summarizer: M) -> Self {
        Self::with_limit(summarizer, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(summarizer: M, history_limit: usize) -> Self {
        Self {
            summarizer,
            history_limit,
        }
    }

    pub fn summarizer(&self) -> &M {
        &self.summarizer
    }

    /// Never fails: missing credential and service errors map to fixed messages.
    #[instrument(name = "generate_report", skip_all, fields(user = %user.id, records = records.len()))]
    pub async fn generate(&self, records: &[AttendanceRecord], user: &User) -> Report {
        if !self.summarizer.is_configured() {
            warn!("Summarization service not configured");
            return Report(REPORT_NOT_CONFIGURED.to_string());
        }

        let lines = history_lines(records, self.history_limit);
        let prompt = build_prompt(user, &lines);

        match self.summarizer.summarize(&prompt).await {
            Ok(text) if text.trim().is_empty() => Report(REPORT_EMPTY.to_string()),
            Ok(text) => {
                info!(chars = text.len(), "Attendance report generated");
                Report(text)
            }
            Err(e) => {
                error!(error = %e, "Summarization failed");
                Report(REPORT_SERVICE_BUSY.to_string())
            }
        }
    }
}
