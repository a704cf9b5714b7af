// main.rs - ApexRecon entry point
// Exit codes: 0 after every target was attempted, 2 on configuration errors,
// 130 when interrupted.

use anyhow::Result;
use apexrecon::cli::Args;
use apexrecon::config::default_log_filter;
use apexrecon::discord_notifier::DiscordNotifier;
use apexrecon::output::{ConsoleSink, OutputSink, SharedSink};
use apexrecon::parallel_executor::{print_batch_summary, TargetExecutor};
use apexrecon::tools::{check_tools_status, ProcessRunner};
use apexrecon::waf::HttpWafProber;
use apexrecon::{targets, CancelToken, Pipeline};
use clap::Parser;
use colored::*;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const EXIT_CONFIG: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    print_banner();

    if args.check_tools {
        let mut config = apexrecon::ScanConfig::for_target("");
        config.tools = args.tool_paths();
        check_tools_status(&config).await;
        return Ok(ExitCode::SUCCESS);
    }

    let sink: SharedSink = Arc::new(ConsoleSink::new(!args.verbose));

    // Configuration errors are the only fatal ones, and they happen before any workspace exists.
    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            sink.error(&e.to_string());
            return Ok(ExitCode::from(EXIT_CONFIG));
        }
    };
    let target_list = match targets::load_targets(&config.selection) {
        Ok(list) => list,
        Err(e) => {
            sink.error(&e.to_string());
            return Ok(ExitCode::from(EXIT_CONFIG));
        }
    };
    if target_list.is_empty() {
        sink.warn("Target list is empty, nothing to do");
        return Ok(ExitCode::SUCCESS);
    }

    let config = Arc::new(config);
    let cancel = CancelToken::new();
    cancel.cancel_on_ctrl_c();

    let pipeline = Pipeline::new(
        Arc::clone(&config),
        Arc::new(ProcessRunner::new(config.verbose, config.tool_timeout)),
        Arc::new(HttpWafProber::new()),
        Arc::new(DiscordNotifier::new(config.webhook.clone())),
        Arc::clone(&sink),
    );
    let executor = TargetExecutor::new(Arc::new(pipeline), config.concurrency);

    let (_outcomes, stats) = executor.run_all(&target_list, &cancel).await;
    if target_list.len() > 1 || stats.failed > 0 {
        print_batch_summary(&stats);
    }

    if cancel.is_cancelled() {
        sink.error("Aborted!");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }
    Ok(ExitCode::SUCCESS)
}

/// RUST_LOG wins; otherwise --verbose selects debug and the default is warn
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_banner() {
    println!("{}", "═══════════════════════════════════════════════════════════════".cyan().bold());
    println!("{}", "  🚀 ApexRecon - Automated Intelligent Recon".green().bold());
    println!("{}", "  subfinder | assetfinder | httpx | nuclei".white());
    println!("{}", "═══════════════════════════════════════════════════════════════\n".cyan().bold());
}
