use crate::waf::WafVerdict;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Aggregate result of one target run, consumed by the report and the notifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub target: String,
    pub timestamp: String,
    pub subdomain_count: usize,
    pub live_count: usize,
    pub vuln_count: usize,

    /// Verdict of the WAF probe, `None` when the probe never ran
    pub waf: Option<WafVerdict>,
    /// Nuclei rate limit actually used
    pub rate_limit: Option<u32>,
    pub vuln_stage_ran: bool,

    pub start_time: DateTime<Local>,
    pub end_time: Option<DateTime<Local>>,
    pub duration_seconds: f64,
}

impl ScanSummary {
    pub fn new(target: &str, timestamp: &str, start_time: DateTime<Local>) -> Self {
        Self {
            target: target.to_string(),
            timestamp: timestamp.to_string(),
            subdomain_count: 0,
            live_count: 0,
            vuln_count: 0,
            waf: None,
            rate_limit: None,
            vuln_stage_ran: false,
            start_time,
            end_time: None,
            duration_seconds: 0.0,
        }
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.subdomain_count, self.live_count, self.vuln_count)
    }

    /// Stamp the end time and compute the duration
    pub fn finalize(&mut self) {
        let end = Local::now();
        self.duration_seconds = (end - self.start_time).num_milliseconds() as f64 / 1000.0;
        self.end_time = Some(end);
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Totals across every target of one invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub not_started: usize,
    pub total_subdomains: usize,
    pub total_live: usize,
    pub total_vulns: usize,
}

impl BatchStats {
    pub fn record(&mut self, summary: &ScanSummary) {
        self.completed += 1;
        self.total_subdomains += summary.subdomain_count;
        self.total_live += summary.live_count;
        self.total_vulns += summary.vuln_count;
    }
}
