// config.rs - Resolved scan configuration
// Built once from the CLI and shared read-only by every target run.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIR: &str = "ApexResults";
pub const DEFAULT_THREADS: usize = 40;
pub const DEFAULT_RATE_LIMIT: u32 = 150;
pub const DEFAULT_TEMPLATES_DIR: &str = "nuclei-templates";

/// Tracing filter when RUST_LOG is unset. Tool failures log at debug, so they
/// only reach stderr with --verbose.
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "apexrecon=debug"
    } else {
        "warn"
    }
}

/// Where the target list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelection {
    Single(String),
    List(PathBuf),
}

/// Executable names for the external tools
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub subfinder: String,
    pub assetfinder: String,
    pub httpx: String,
    pub nuclei: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            subfinder: "subfinder".to_string(),
            assetfinder: "assetfinder".to_string(),
            httpx: "httpx".to_string(),
            nuclei: "nuclei".to_string(),
        }
    }
}

impl ToolPaths {
    /// (display name, binary) pairs, in pipeline order
    pub fn all(&self) -> [(&'static str, &str); 4] {
        [
            ("subfinder", self.subfinder.as_str()),
            ("assetfinder", self.assetfinder.as_str()),
            ("httpx", self.httpx.as_str()),
            ("nuclei", self.nuclei.as_str()),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub selection: TargetSelection,
    pub output_dir: PathBuf,
    pub webhook: Option<String>,
    pub verbose: bool,
    /// Concurrency hint forwarded to subfinder and httpx
    pub threads: usize,
    /// Nuclei rate limit when no WAF is detected
    pub rate_limit: u32,
    pub skip_subdomains: bool,
    pub skip_vulns: bool,
    pub templates_dir: PathBuf,
    /// Number of targets processed at once
    pub concurrency: usize,
    /// None means tools may run forever
    pub tool_timeout: Option<Duration>,
    pub tools: ToolPaths,
}

impl ScanConfig {
    /// Defaults for a single target, used by tests and library callers
    pub fn for_target(target: &str) -> Self {
        Self {
            selection: TargetSelection::Single(target.to_string()),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            webhook: None,
            verbose: false,
            threads: DEFAULT_THREADS,
            rate_limit: DEFAULT_RATE_LIMIT,
            skip_subdomains: false,
            skip_vulns: false,
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            concurrency: 1,
            tool_timeout: None,
            tools: ToolPaths::default(),
        }
    }
}
