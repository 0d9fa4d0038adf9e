use anyhow::Result;

pub mod console;
pub mod dispatch;
pub mod telegram;

pub use console::ConsoleSink;
pub use dispatch::{DeliveryResult, SinkDispatcher, SinkSelection};
pub use telegram::{TelegramCredentials, TelegramSink};

use chrono::NaiveDateTime;
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use wobs_core::{ReportStyle, Sink};

pub const DEFAULT_REPORT_PREFIX: &str = "weather_report";

/// Timestamp part of a report document name
pub const REPORT_NAME_FORMAT: &str = "%d.%m.%Y_%H.%M.%S";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("missing messaging credential `{0}`")]
    MissingCredential(&'static str),

    #[error("message rejected: {reason}. Status code: {status}")]
    Rejected { status: u16, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Appends markdown sections to one report document per run.
///
/// The document is named after the run start time and is created on first
/// delivery. Each call reopens it in append mode; there is no locking, so two
/// processes writing the same name interleave.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(dir: P, prefix: &str, started: NaiveDateTime) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_all(&dir)?;
        let path = dir.join(report_file_name(prefix, started));
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `<prefix>_<dd.mm.YYYY_HH.MM.SS>.md`
pub fn report_file_name(prefix: &str, started: NaiveDateTime) -> String {
    format!("{}_{}.md", prefix, started.format(REPORT_NAME_FORMAT))
}

#[async_trait::async_trait]
impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn style(&self) -> ReportStyle {
        ReportStyle::Markdown
    }

    async fn deliver(&mut self, report: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(SinkError::from)?;
        // Sections are built in memory first so a write never stops mid-field.
        let mut section = String::with_capacity(report.len() + 2);
        section.push_str(report);
        if !section.ends_with('\n') {
            section.push('\n');
        }
        section.push('\n');
        f.write_all(section.as_bytes()).map_err(SinkError::from)?;
        debug!(path = %self.path.display(), bytes = section.len(), "report section appended");
        Ok(())
    }
}
