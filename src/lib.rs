// lib.rs - ApexRecon
// Recon orchestration: subdomain discovery, liveness probing and WAF-aware
// vulnerability scanning through external tools, one workspace per target run.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod discord_notifier;
pub mod error;
pub mod metrics;
pub mod output;
pub mod parallel_executor;
pub mod pipeline;
pub mod progress;
pub mod rate;
pub mod report_generator;
pub mod targets;
pub mod tools;
pub mod waf;
pub mod workspace;

pub use cancel::CancelToken;
pub use config::ScanConfig;
pub use metrics::ScanSummary;
pub use pipeline::{Pipeline, TargetOutcome};
pub use waf::WafVerdict;
