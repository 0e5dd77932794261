// Pipeline Trace - Structured record of one generation run
// Kept in memory during a run; optionally appended to a JSONL file

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting or loading a trace
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Pipeline stage an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Compose,
    Modify,
    Validate,
    Fix,
    Humanize,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Compose => "compose",
            Stage::Modify => "modify",
            Stage::Validate => "validate",
            Stage::Fix => "fix",
            Stage::Humanize => "humanize",
        }
    }

    /// Overall run progress once this stage has finished
    pub fn progress(&self) -> f32 {
        match self {
            Stage::Compose => 0.2,
            Stage::Modify => 0.4,
            Stage::Validate => 0.6,
            Stage::Fix => 0.8,
            Stage::Humanize => 1.0,
        }
    }
}

/// One record of the run log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// RFC 3339 timestamp
    pub timestamp: String,

    pub stage: Stage,

    /// Run progress [0.0, 1.0]
    pub progress: f32,

    pub message: String,

    /// Stage details (beat counts, conflicts, fallbacks)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl TraceEntry {
    pub fn new(stage: Stage, progress: f32, message: impl Into<String>) -> Self {
        TraceEntry {
            timestamp: Utc::now().to_rfc3339(),
            stage,
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Serialize to JSON line (with newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

/// In-memory trace collected while a pipeline runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Trace::default()
    }

    /// Stage finished
    pub fn complete(&mut self, stage: Stage, message: impl Into<String>, data: serde_json::Value) {
        self.entries
            .push(TraceEntry::new(stage, stage.progress(), message).with_data(data));
    }

    /// Mid-stage event (a conflict, a fallback); keeps the previous progress value
    pub fn note(&mut self, stage: Stage, message: impl Into<String>, data: serde_json::Value) {
        let progress = self.entries.last().map(|e| e.progress).unwrap_or(0.0);
        self.entries
            .push(TraceEntry::new(stage, progress, message).with_data(data));
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn for_stage(&self, stage: Stage) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter().filter(move |e| e.stage == stage)
    }

    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}

/// Append-only JSONL trace file
#[derive(Debug, Clone)]
pub struct TraceWriter {
    file_path: PathBuf,
}

impl TraceWriter {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        TraceWriter {
            file_path: file_path.into(),
        }
    }

    /// Append entries, creating the file if needed
    pub fn append(&self, entries: &[TraceEntry]) -> Result<(), TraceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        for entry in entries {
            file.write_all(entry.to_json_line()?.as_bytes())?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Read trace entries from a JSONL file, skipping blank lines
pub fn read_trace_file(path: &Path) -> Result<Vec<TraceEntry>, TraceError> {
    let contents = std::fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(line)?);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_progress_clamping() {
        assert_eq!(TraceEntry::new(Stage::Fix, -0.5, "x").progress, 0.0);
        assert_eq!(TraceEntry::new(Stage::Fix, 1.5, "x").progress, 1.0);
    }

    #[test]
    fn test_trace_collects_in_order() {
        let mut trace = Trace::new();
        trace.complete(Stage::Compose, "Composed", serde_json::json!({ "beats": 12 }));
        trace.note(Stage::Validate, "Conflict", serde_json::json!({ "position": 1.0 }));
        trace.complete(Stage::Validate, "Validated", serde_json::json!({ "conflicts": 1 }));

        let entries = trace.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].progress, 0.2);
        // Notes inherit the last progress value
        assert_eq!(entries[1].progress, 0.2);
        assert_eq!(entries[2].progress, 0.6);
        assert_eq!(trace.for_stage(Stage::Validate).count(), 2);
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let entry = TraceEntry::new(Stage::Humanize, 1.0, "Done");
        let line = entry.to_json_line().unwrap();
        assert!(line.ends_with('\n'));
        assert!(line.contains("\"stage\":\"humanize\""));
        assert!(!line.contains("\"data\""));
    }

    #[test]
    fn test_writer_appends_and_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("run.jsonl");
        let writer = TraceWriter::new(&trace_path);

        let mut first = Trace::new();
        first.complete(Stage::Compose, "Composed", serde_json::json!({ "beats": 12 }));
        writer.append(first.entries()).unwrap();

        let second = vec![
            TraceEntry::new(Stage::Fix, 0.8, "Fixed"),
            TraceEntry::new(Stage::Humanize, 1.0, "Humanized"),
        ];
        writer.append(&second).unwrap();

        let entries = read_trace_file(&trace_path).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].stage, Stage::Compose);
        assert_eq!(entries[0].data.as_ref().unwrap()["beats"], 12);
        assert_eq!(entries[2].stage, Stage::Humanize);
    }

    #[test]
    fn test_read_missing_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_trace_file(&temp_dir.path().join("absent.jsonl"));
        assert!(matches!(result, Err(TraceError::IoError(_))));
    }
}
