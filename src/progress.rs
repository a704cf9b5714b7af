use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One line of `progress.jsonl`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub timestamp: DateTime<Utc>,
    pub target: String,
    pub event_type: EventType,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventType {
    ScanStarted,
    StageStarted { stage: String },
    StageCompleted { stage: String },
    StageSkipped { stage: String, reason: String },
    ToolFailed { tool: String },
    WafDetected { waf: String, rate_limit: u32 },
    DataFound { data_type: String, count: usize },
    ScanCompleted,
    ScanCancelled,
}

/// Append-only event log for one target run. Writes are best-effort.
#[derive(Clone)]
pub struct ProgressTracker {
    target: String,
    log_file: PathBuf,
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl ProgressTracker {
    pub fn new(target: String, log_file: PathBuf) -> Self {
        Self {
            target,
            log_file,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_event(&self, event_type: EventType, message: String) {
        let event = ProgressEvent {
            timestamp: Utc::now(),
            target: self.target.clone(),
            event_type,
            message,
        };

        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }

        self.save_to_file(&event);
    }

    fn save_to_file(&self, event: &ProgressEvent) {
        let Ok(json) = serde_json::to_string(event) else {
            return;
        };

        let written = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .and_then(|mut file| writeln!(file, "{}", json));

        if let Err(e) = written {
            tracing::debug!(path = %self.log_file.display(), error = %e, "progress event not persisted");
        }
    }

    pub fn scan_started(&self) {
        self.add_event(EventType::ScanStarted, format!("Starting recon on {}", self.target));
    }

    pub fn stage_started(&self, stage: &str) {
        self.add_event(
            EventType::StageStarted { stage: stage.to_string() },
            format!("{} started", stage),
        );
    }

    pub fn stage_completed(&self, stage: &str) {
        self.add_event(
            EventType::StageCompleted { stage: stage.to_string() },
            format!("{} completed", stage),
        );
    }

    pub fn stage_skipped(&self, stage: &str, reason: &str) {
        self.add_event(
            EventType::StageSkipped {
                stage: stage.to_string(),
                reason: reason.to_string(),
            },
            format!("{} skipped: {}", stage, reason),
        );
    }

    pub fn tool_failed(&self, tool: &str) {
        self.add_event(
            EventType::ToolFailed { tool: tool.to_string() },
            format!("{} exited with an error or could not start", tool),
        );
    }

    pub fn waf_detected(&self, waf: &str, rate_limit: u32) {
        self.add_event(
            EventType::WafDetected {
                waf: waf.to_string(),
                rate_limit,
            },
            format!("WAF detected: {}, rate limit lowered to {}", waf, rate_limit),
        );
    }

    pub fn data_found(&self, data_type: &str, count: usize) {
        self.add_event(
            EventType::DataFound {
                data_type: data_type.to_string(),
                count,
            },
            format!("Found {} {}", count, data_type),
        );
    }

    pub fn scan_completed(&self) {
        self.add_event(EventType::ScanCompleted, format!("Recon on {} completed", self.target));
    }

    pub fn scan_cancelled(&self) {
        self.add_event(EventType::ScanCancelled, format!("Recon on {} interrupted", self.target));
    }

    pub fn get_events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Read back a run's event log, skipping unparsable lines
    pub fn read_events_from_file(progress_file: &Path) -> Vec<ProgressEvent> {
        fs::read_to_string(progress_file)
            .map(|content| {
                content
                    .lines()
                    .filter_map(|line| serde_json::from_str::<ProgressEvent>(line).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_round_trip_through_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("progress.jsonl");
        let tracker = ProgressTracker::new("example.com".into(), log.clone());

        tracker.scan_started();
        tracker.data_found("subdomains", 3);
        tracker.stage_skipped("vulnerability", "no live hosts");

        let events = ProgressTracker::read_events_from_file(&log);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_type, EventType::ScanStarted);
        assert_eq!(
            events[1].event_type,
            EventType::DataFound { data_type: "subdomains".into(), count: 3 }
        );
        assert_eq!(tracker.get_events().len(), 3);
    }

    #[test]
    fn test_unwritable_log_is_ignored() {
        let tracker = ProgressTracker::new("t".into(), PathBuf::from("/nonexistent/dir/p.jsonl"));
        tracker.scan_started();
        assert_eq!(tracker.get_events().len(), 1);
    }
}
