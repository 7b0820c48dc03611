// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Append-only failure log
//!
//! Each failed blob fetch adds one line of the form `<UTC timestamp> | <message>`.
//! The file is opened for every write so that it can be rotated or deleted externally.

use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

/// Sortable UTC timestamp, e.g. `2025-01-31 17:04:09Z`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

/// Failure log file
#[derive(Debug)]
pub struct ErrorLog {
    path: PathBuf,
    // Serializes appends from concurrent requests.
    write_lock: Mutex<()>,
}

impl ErrorLog {
    /// Create a log writing to `path`; nothing is touched on disk until the first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format a single log line, including the trailing newline
    pub fn format_entry(timestamp: DateTime<Utc>, message: &str) -> String {
        format!("{} | {}\n", timestamp.format(TIMESTAMP_FORMAT), message)
    }

    /// Append one line for `message`, creating the parent directory if needed
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory or file cannot be written
    pub async fn append(&self, message: &str) -> io::Result<()> {
        let entry = Self::format_entry(Utc::now(), message);

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn entry_format() {
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 5, 14, 7, 9).unwrap();

        assert_eq!(
            ErrorLog::format_entry(timestamp, "HTTP error: boom"),
            "2025-03-05 14:07:09Z | HTTP error: boom\n"
        );
    }

    #[tokio::test]
    async fn append_creates_directory_and_accumulates_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/logs/blob-error-log.txt");
        let log = ErrorLog::new(&path);

        log.append("first").await.unwrap();
        log.append("second").await.unwrap();

        let contents = fs::read_to_string(&path).await.unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" | first"));
        assert!(lines[1].ends_with(" | second"));
    }

    #[tokio::test]
    async fn append_into_existing_directory() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.txt"));

        log.append("only").await.unwrap();

        assert!(log.path().exists());
    }
}
