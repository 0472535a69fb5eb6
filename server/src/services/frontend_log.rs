//! Front-end log receiver.
//!
//! Browsers forward diagnostic lines here. Every entry is emitted through
//! `tracing` under the `frontend` target; when a log file is configured it
//! is also appended as `[YYYY-MM-DD HH:MM:SS] entry` (UTC).

use std::path::Path;

use time::OffsetDateTime;
use time::macros::format_description;
use tokio::io::AsyncWriteExt;

/// One log line, newline-terminated.
#[must_use]
pub fn format_line(at: OffsetDateTime, entry: &str) -> String {
    let stamp = at
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .unwrap_or_default();
    format!("[{stamp}] {entry}\n")
}

/// Record `entry`, appending it to `path` when given.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or written.
pub async fn record(path: Option<&Path>, entry: &str) -> std::io::Result<()> {
    tracing::info!(target: "frontend", entry, "frontend log");
    let Some(path) = path else {
        return Ok(());
    };
    let now = OffsetDateTime::now_utc();
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format_line(now, entry).as_bytes()).await?;
    file.flush().await
}

#[cfg(test)]
#[path = "frontend_log_test.rs"]
mod tests;
