use crate::config::{
    ScanConfig, TargetSelection, ToolPaths, DEFAULT_OUTPUT_DIR, DEFAULT_RATE_LIMIT, DEFAULT_TEMPLATES_DIR,
    DEFAULT_THREADS,
};
use crate::error::ConfigError;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// ApexRecon - automated recon pipeline
#[derive(Parser, Debug, Clone)]
#[command(
    name = "apexrecon",
    version,
    about = "Subdomain discovery, liveness probing and WAF-aware vulnerability scanning",
    long_about = r#"
ApexRecon chains three external tools per target:

  📡 subfinder + assetfinder   subdomain discovery (merged, deduplicated)
  🟢 httpx                     liveness probing with title/tech/status
  🔥 nuclei                    critical/high/medium templates

Before nuclei runs, the target root is probed for a WAF (Cloudflare, Akamai,
Sucuri). If one is found, the nuclei rate limit drops to 50 req/s.

EXAMPLES:

  apexrecon -t example.com
  apexrecon -l domains.txt --webhook "https://discord.com/api/webhooks/..."
  apexrecon -t 203.0.113.5 --no-subs
  apexrecon --check-tools

OUTPUT:

  {output}/{target}_{timestamp}/
  ├── raw_subs.txt        # raw enumerator output
  ├── subdomains.txt      # unique subdomains
  ├── live_hosts.txt      # httpx results
  ├── urls.txt            # URLs handed to nuclei
  ├── nuclei_vulns.txt    # findings
  ├── summary.json        # counts, WAF verdict, rate used
  ├── progress.jsonl      # stage events
  └── report.html
"#
)]
#[command(group(ArgGroup::new("selection").args(["target", "list"]).multiple(false)))]
pub struct Args {
    /// Target domain (e.g., example.com)
    #[arg(short, long, value_name = "DOMAIN", help_heading = "Target Options")]
    pub target: Option<String>,

    /// File with one target per line; blank lines are ignored
    #[arg(short, long, value_name = "FILE", help_heading = "Target Options")]
    pub list: Option<PathBuf>,

    /// Base directory for run workspaces
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR, value_name = "DIR", help_heading = "Output")]
    pub output: PathBuf,

    /// Discord-compatible webhook for scan results
    #[arg(short, long, value_name = "URL", help_heading = "Notifications")]
    pub webhook: Option<String>,

    /// Show external tool output and debug logs
    #[arg(short, long, help_heading = "Output")]
    pub verbose: bool,

    /// Threads passed to subfinder and httpx
    #[arg(long, default_value_t = DEFAULT_THREADS, value_name = "NUM", help_heading = "Performance")]
    pub threads: usize,

    /// Nuclei rate limit when no WAF is detected
    #[arg(long, default_value_t = DEFAULT_RATE_LIMIT, value_name = "RPS", help_heading = "Performance")]
    pub rate_limit: u32,

    /// Targets processed at the same time (1 = sequential, in list order)
    #[arg(long, default_value_t = 1, value_name = "NUM", help_heading = "Performance")]
    pub concurrency: usize,

    /// Kill a tool after this many seconds (0 = no limit)
    #[arg(long, default_value_t = 0, value_name = "SECONDS", help_heading = "Performance")]
    pub tool_timeout: u64,

    /// Skip subdomain discovery and scan the target as a single host
    #[arg(long, help_heading = "Stages")]
    pub no_subs: bool,

    /// Skip the vulnerability scan
    #[arg(long, help_heading = "Stages")]
    pub no_vuln: bool,

    /// Nuclei templates directory
    #[arg(long, default_value = DEFAULT_TEMPLATES_DIR, value_name = "DIR", help_heading = "Stages")]
    pub templates: PathBuf,

    /// Report which external tools are installed and exit
    #[arg(long, help_heading = "Tool Management")]
    pub check_tools: bool,

    #[arg(long, default_value = "subfinder", value_name = "BIN", help_heading = "Tool Management")]
    pub subfinder_bin: String,

    #[arg(long, default_value = "assetfinder", value_name = "BIN", help_heading = "Tool Management")]
    pub assetfinder_bin: String,

    #[arg(long, default_value = "httpx", value_name = "BIN", help_heading = "Tool Management")]
    pub httpx_bin: String,

    #[arg(long, default_value = "nuclei", value_name = "BIN", help_heading = "Tool Management")]
    pub nuclei_bin: String,
}

impl Args {
    pub fn tool_paths(&self) -> ToolPaths {
        ToolPaths {
            subfinder: self.subfinder_bin.clone(),
            assetfinder: self.assetfinder_bin.clone(),
            httpx: self.httpx_bin.clone(),
            nuclei: self.nuclei_bin.clone(),
        }
    }

    /// Validate and resolve the run configuration
    pub fn into_config(self) -> Result<ScanConfig, ConfigError> {
        let selection = match (self.target.clone(), self.list.clone()) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingTargets),
            (None, None) => return Err(ConfigError::MissingTarget),
            // Passed through as given; only an empty argument counts as missing.
            (Some(target), None) if target.is_empty() => return Err(ConfigError::MissingTarget),
            (Some(target), None) => TargetSelection::Single(target),
            (None, Some(list)) => TargetSelection::List(list),
        };

        at_least_one("--threads", self.threads as u64)?;
        at_least_one("--rate-limit", self.rate_limit as u64)?;
        at_least_one("--concurrency", self.concurrency as u64)?;

        Ok(ScanConfig {
            selection,
            tools: self.tool_paths(),
            output_dir: self.output,
            webhook: self.webhook.filter(|w| !w.trim().is_empty()),
            verbose: self.verbose,
            threads: self.threads,
            rate_limit: self.rate_limit,
            skip_subdomains: self.no_subs,
            skip_vulns: self.no_vuln,
            templates_dir: self.templates,
            concurrency: self.concurrency,
            tool_timeout: (self.tool_timeout > 0).then(|| Duration::from_secs(self.tool_timeout)),
        })
    }
}

fn at_least_one(flag: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            flag,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}
