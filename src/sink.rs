//! Append-only record sinks for watched values.
//!
//! The sink is an explicit collaborator handed into the poll loop, never
//! process-global state. Records written before a failure stay written;
//! nothing is rolled back.

use crate::Result;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Record severity, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// One appended record: when, from where, how loud, what.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Local>,
    pub source: String,
    pub severity: Severity,
    pub message: String,
}

impl Record {
    /// Create a record stamped with the current local time.
    pub fn new(source: &str, severity: Severity, message: &str) -> Self {
        Self {
            timestamp: Local::now(),
            source: source.into(),
            severity,
            message: message.into(),
        }
    }

    /// One log line: `2026-08-06 14:03:59.124 - watch - INFO - 21°C`
    pub fn format_line(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.source,
            self.severity,
            self.message
        )
    }
}

/// Append-only target for records.
pub trait RecordSink: Send {
    fn record(&mut self, record: Record) -> Result<()>;
}

/// Appends one line per record to a file.
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    /// Open (or create) the file for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    /// The file being appended to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for FileSink {
    fn record(&mut self, record: Record) -> Result<()> {
        writeln!(self.file, "{}", record.format_line())?;
        Ok(())
    }
}

/// Collects records in memory. Test collaborator.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<Record>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded messages, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.message.as_str()).collect()
    }
}

impl RecordSink for MemorySink {
    fn record(&mut self, record: Record) -> Result<()> {
        self.records.push(record);
        Ok(())
    }
}

/// Forwards records to the diagnostic logger. Used when no log file is
/// configured.
#[derive(Debug, Default)]
pub struct LogSink;

impl RecordSink for LogSink {
    fn record(&mut self, record: Record) -> Result<()> {
        match record.severity {
            Severity::Debug => tracing::debug!("[{}] {}", record.source, record.message),
            Severity::Info => tracing::info!("[{}] {}", record.source, record.message),
            Severity::Warning => tracing::warn!("[{}] {}", record.source, record.message),
            Severity::Error => tracing::error!("[{}] {}", record.source, record.message),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let record = Record::new("temperature", Severity::Info, "20°C");
        let line = record.format_line();

        let pattern = regex::Regex::new(
            r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3} - temperature - INFO - 20°C$",
        )
        .unwrap();
        assert!(pattern.is_match(&line), "line: {}", line);
    }

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::Debug.to_string(), "DEBUG");
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.record(Record::new("watch", Severity::Info, "20°C")).unwrap();
        sink.record(Record::new("watch", Severity::Info, "21°C")).unwrap();
        sink.record(Record::new("watch", Severity::Info, "22°C")).unwrap();

        assert_eq!(sink.messages(), vec!["20°C", "21°C", "22°C"]);
    }

    #[test]
    fn test_file_sink_appends_across_opens() {
        let path = std::env::temp_dir().join(format!(
            "pagewatch-sink-test-{}.log",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        {
            let mut sink = FileSink::open(&path).unwrap();
            sink.record(Record::new("watch", Severity::Info, "first")).unwrap();
        }
        {
            let mut sink = FileSink::open(&path).unwrap();
            assert_eq!(sink.path(), path.as_path());
            sink.record(Record::new("watch", Severity::Warning, "second")).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("watch - INFO - first"));
        assert!(lines[1].ends_with("watch - WARNING - second"));

        let _ = std::fs::remove_file(&path);
    }
}
