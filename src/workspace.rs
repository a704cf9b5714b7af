// workspace.rs - Per-target, per-timestamp output directory
// Stages never hand data to each other in memory: each one reads the file the
// previous stage wrote, through the paths on `WorkspacePaths`.

use crate::config::ScanConfig;
use crate::error::WorkspaceError;
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Canonical artifact locations inside one run directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    pub dir: PathBuf,
    pub raw_subdomains: PathBuf,
    pub subdomains: PathBuf,
    pub live_hosts: PathBuf,
    pub urls: PathBuf,
    pub vulns: PathBuf,
    pub report: PathBuf,
    pub summary: PathBuf,
    pub progress: PathBuf,
}

impl WorkspacePaths {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            raw_subdomains: dir.join("raw_subs.txt"),
            subdomains: dir.join("subdomains.txt"),
            live_hosts: dir.join("live_hosts.txt"),
            urls: dir.join("urls.txt"),
            vulns: dir.join("nuclei_vulns.txt"),
            report: dir.join("report.html"),
            summary: dir.join("summary.json"),
            progress: dir.join("progress.jsonl"),
            dir,
        }
    }
}

/// Create `{base}/{target}_{timestamp}`. When that directory already exists
/// (two runs in the same second) a `-2`, `-3`, ... suffix is appended, so two
/// runs never share a directory.
pub fn create(base_dir: &Path, target: &str, timestamp: &str) -> Result<WorkspacePaths, WorkspaceError> {
    fs::create_dir_all(base_dir).map_err(|source| WorkspaceError::CreateDir {
        path: base_dir.to_path_buf(),
        source,
    })?;

    let stem = format!("{}_{}", dir_safe(target), timestamp);
    let mut attempt = 1u32;
    loop {
        let name = if attempt == 1 {
            stem.clone()
        } else {
            format!("{}-{}", stem, attempt)
        };
        let dir = base_dir.join(name);

        match fs::create_dir(&dir) {
            Ok(()) => return Ok(WorkspacePaths::new(dir)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(source) => return Err(WorkspaceError::CreateDir { path: dir, source }),
        }
    }
}

/// Keep the directory inside `base_dir` even for targets like `http://host/path`
fn dir_safe(target: &str) -> String {
    target
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}

/// Execution state for one target
#[derive(Debug, Clone)]
pub struct RunContext {
    pub target: String,
    pub timestamp: String,
    pub started_at: DateTime<Local>,
    pub paths: WorkspacePaths,
    pub config: Arc<ScanConfig>,
}

impl RunContext {
    pub fn create(target: &str, config: Arc<ScanConfig>) -> Result<Self, WorkspaceError> {
        let started_at = Local::now();
        let timestamp = started_at.format(TIMESTAMP_FORMAT).to_string();
        let paths = create(&config.output_dir, target, &timestamp)?;

        Ok(Self {
            target: target.to_string(),
            timestamp,
            started_at,
            paths,
            config,
        })
    }
}
