// tools.rs - External tool invocation
// subfinder, assetfinder, httpx and nuclei run as child processes with discrete
// arguments (no shell). A failing tool never aborts the run: the outcome is
// reported as a `StageResult` and the pipeline reads whatever file state exists.

use crate::cancel::CancelToken;
use crate::config::ScanConfig;
use async_trait::async_trait;
use colored::*;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

pub const NUCLEI_SEVERITIES: &str = "critical,high,medium";

/// Where a tool's stdout goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Tool writes its own output file (`-o`); stdout is inherited or discarded
    Passthrough,
    /// Stdout replaces the file
    Truncate(PathBuf),
    /// Stdout is appended to the file
    Append(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Display name, also used in logs and events
    pub tool: &'static str,
    pub program: String,
    pub args: Vec<String>,
    pub capture: Capture,
    /// The file this invocation is expected to produce
    pub output: PathBuf,
}

impl ToolInvocation {
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Typed outcome of one tool run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    pub succeeded: bool,
    /// Set when the expected output file exists after the run
    pub output_path: Option<PathBuf>,
    pub cancelled: bool,
}

impl StageResult {
    pub fn finished(succeeded: bool, expected: &Path) -> Self {
        Self {
            succeeded,
            output_path: expected.exists().then(|| expected.to_path_buf()),
            cancelled: false,
        }
    }

    pub fn cancelled(expected: &Path) -> Self {
        Self {
            cancelled: true,
            ..Self::finished(false, expected)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// INVOCATION BUILDERS
// ═══════════════════════════════════════════════════════════════════════════

/// `subfinder -d <domain> -silent -t <threads>`, stdout replaces `raw`
pub fn subfinder(config: &ScanConfig, domain: &str, raw: &Path) -> ToolInvocation {
    ToolInvocation {
        tool: "subfinder",
        program: config.tools.subfinder.clone(),
        args: vec![
            "-d".to_string(),
            domain.to_string(),
            "-silent".to_string(),
            "-t".to_string(),
            config.threads.to_string(),
        ],
        capture: Capture::Truncate(raw.to_path_buf()),
        output: raw.to_path_buf(),
    }
}

/// `assetfinder --subs-only <domain>`, stdout appended to `raw`
pub fn assetfinder(config: &ScanConfig, domain: &str, raw: &Path) -> ToolInvocation {
    ToolInvocation {
        tool: "assetfinder",
        program: config.tools.assetfinder.clone(),
        args: vec!["--subs-only".to_string(), domain.to_string()],
        capture: Capture::Append(raw.to_path_buf()),
        output: raw.to_path_buf(),
    }
}

/// `httpx -l <hosts> -title -tech-detect -status-code -silent -threads <n> -o <out>`
pub fn httpx(config: &ScanConfig, hosts: &Path, out: &Path) -> ToolInvocation {
    ToolInvocation {
        tool: "httpx",
        program: config.tools.httpx.clone(),
        args: vec![
            "-l".to_string(),
            hosts.display().to_string(),
            "-title".to_string(),
            "-tech-detect".to_string(),
            "-status-code".to_string(),
            "-silent".to_string(),
            "-threads".to_string(),
            config.threads.to_string(),
            "-o".to_string(),
            out.display().to_string(),
        ],
        capture: Capture::Passthrough,
        output: out.to_path_buf(),
    }
}

/// `nuclei -l <urls> -t <templates> -severity critical,high,medium -rl <rate> -silent -o <out>`
pub fn nuclei(config: &ScanConfig, urls: &Path, out: &Path, rate: u32) -> ToolInvocation {
    ToolInvocation {
        tool: "nuclei",
        program: config.tools.nuclei.clone(),
        args: vec![
            "-l".to_string(),
            urls.display().to_string(),
            "-t".to_string(),
            config.templates_dir.display().to_string(),
            "-severity".to_string(),
            NUCLEI_SEVERITIES.to_string(),
            "-rl".to_string(),
            rate.to_string(),
            "-silent".to_string(),
            "-o".to_string(),
            out.display().to_string(),
        ],
        capture: Capture::Passthrough,
        output: out.to_path_buf(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RUNNERS
// ═══════════════════════════════════════════════════════════════════════════

#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, invocation: &ToolInvocation, cancel: &CancelToken) -> StageResult;
}

/// Runs tools as real child processes
pub struct ProcessRunner {
    verbose: bool,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(verbose: bool, timeout: Option<Duration>) -> Self {
        Self { verbose, timeout }
    }

    fn passthrough(&self) -> Stdio {
        if self.verbose {
            Stdio::inherit()
        } else {
            Stdio::null()
        }
    }

    fn stdout_for(&self, capture: &Capture) -> std::io::Result<Stdio> {
        let file = match capture {
            Capture::Passthrough => return Ok(self.passthrough()),
            Capture::Truncate(path) => OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?,
            Capture::Append(path) => OpenOptions::new().create(true).append(true).open(path)?,
        };
        Ok(Stdio::from(file))
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &ToolInvocation, cancel: &CancelToken) -> StageResult {
        let expected = invocation.output.as_path();
        tracing::debug!(tool = invocation.tool, cmd = %invocation.command_line(), "running tool");

        let stdout = match self.stdout_for(&invocation.capture) {
            Ok(stdio) => stdio,
            Err(e) => {
                tracing::warn!(tool = invocation.tool, error = %e, "cannot open tool output file");
                return StageResult::finished(false, expected);
            }
        };

        let mut child = match Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(self.passthrough())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!(tool = invocation.tool, error = %e, "failed to start tool");
                return StageResult::finished(false, expected);
            }
        };

        let deadline = async {
            match self.timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };

        let exit = tokio::select! {
            status = child.wait() => Exit::Done(status),
            _ = cancel.cancelled() => Exit::Cancelled,
            _ = deadline => Exit::TimedOut,
        };

        match exit {
            Exit::Done(Ok(status)) => {
                tracing::debug!(tool = invocation.tool, %status, "tool exited");
                StageResult::finished(status.success(), expected)
            }
            Exit::Done(Err(e)) => {
                tracing::debug!(tool = invocation.tool, error = %e, "failed to wait for tool");
                StageResult::finished(false, expected)
            }
            Exit::Cancelled => {
                let _ = child.kill().await;
                tracing::debug!(tool = invocation.tool, "tool killed on cancel");
                StageResult::cancelled(expected)
            }
            Exit::TimedOut => {
                let _ = child.kill().await;
                tracing::debug!(tool = invocation.tool, timeout = ?self.timeout, "tool timed out");
                StageResult::finished(false, expected)
            }
        }
    }
}

enum Exit {
    Done(std::io::Result<std::process::ExitStatus>),
    Cancelled,
    TimedOut,
}

// ═══════════════════════════════════════════════════════════════════════════
// TOOL INVENTORY
// ═══════════════════════════════════════════════════════════════════════════

/// Resolve a binary on PATH
pub async fn check_tool_installed(binary: &str) -> (bool, Option<String>) {
    match Command::new("which").arg(binary).output().await {
        Ok(output) if output.status.success() => {
            let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
            (true, Some(path))
        }
        _ => (false, None),
    }
}

/// Print which configured tools are available. Returns the number missing.
pub async fn check_tools_status(config: &ScanConfig) -> usize {
    println!("{}", "═══════════════════════════════════════════════════════════════".cyan().bold());
    println!("{}", "  TOOL STATUS".cyan().bold());
    println!("{}", "═══════════════════════════════════════════════════════════════".cyan().bold());

    let mut missing = 0;
    for (name, binary) in config.tools.all() {
        match check_tool_installed(binary).await {
            (true, path) => {
                let path = path.unwrap_or_default();
                println!("{}", format!("  ✅ {:<12} {}", name, path).green());
            }
            (false, _) => {
                missing += 1;
                println!("{}", format!("  ❌ {:<12} not found ({})", name, binary).red());
            }
        }
    }

    if missing > 0 {
        println!("\n{}", format!("[!] {} tool(s) missing, affected stages will report zero results", missing).yellow());
    }
    missing
}
