// pipeline.rs - Stage pipeline for one target
// discovery -> liveness -> vulnerability, each stage reading the file the
// previous one wrote. Tool failures degrade to zero counts; only cancellation
// stops a target early.

use crate::cancel::CancelToken;
use crate::config::ScanConfig;
use crate::discord_notifier::{self, Notify};
use crate::metrics::ScanSummary;
use crate::output::SharedSink;
use crate::progress::ProgressTracker;
use crate::rate::select_rate;
use crate::report_generator;
use crate::tools::{self, StageResult, ToolRunner};
use crate::waf::{WafProbe, WafVerdict};
use crate::workspace::{RunContext, WorkspacePaths};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Liveness,
    Vulnerability,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discovery => "subdomain discovery",
            Stage::Liveness => "liveness probing",
            Stage::Vulnerability => "vulnerability scan",
        };
        f.write_str(name)
    }
}

/// How a target run ended
#[derive(Debug, Clone, PartialEq)]
pub enum TargetOutcome {
    Completed(ScanSummary),
    /// Interrupted; artifacts written so far stay on disk and no report is emitted
    Cancelled,
    /// The workspace could not be created
    Failed(String),
}

/// Marker for an interrupted stage
struct Interrupted;

pub struct Pipeline {
    config: Arc<ScanConfig>,
    runner: Arc<dyn ToolRunner>,
    waf: Arc<dyn WafProbe>,
    notifier: Arc<dyn Notify>,
    sink: SharedSink,
}

impl Pipeline {
    pub fn new(
        config: Arc<ScanConfig>,
        runner: Arc<dyn ToolRunner>,
        waf: Arc<dyn WafProbe>,
        notifier: Arc<dyn Notify>,
        sink: SharedSink,
    ) -> Self {
        Self {
            config,
            runner,
            waf,
            notifier,
            sink,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    /// Run every stage for one target and emit its report
    pub async fn run_target(&self, target: &str, cancel: &CancelToken) -> TargetOutcome {
        if cancel.is_cancelled() {
            return TargetOutcome::Cancelled;
        }

        let ctx = match RunContext::create(target, Arc::clone(&self.config)) {
            Ok(ctx) => ctx,
            Err(e) => {
                self.sink.error(&format!("{}: {}", target, e));
                return TargetOutcome::Failed(e.to_string());
            }
        };

        let progress = ProgressTracker::new(target.to_string(), ctx.paths.progress.clone());
        progress.scan_started();

        self.sink.banner(&format!("🎯 TARGET: {}", target));
        self.sink.info(&format!("Output: {}", ctx.paths.dir.display()));
        self.sink.info(&format!("Time: {}", ctx.timestamp));

        match self.run_stages(&ctx, &progress, cancel).await {
            Ok(mut summary) => {
                summary.finalize();
                report_generator::emit(&summary, &ctx.paths, self.sink.as_ref());
                progress.scan_completed();
                TargetOutcome::Completed(summary)
            }
            Err(Interrupted) => {
                progress.scan_cancelled();
                self.sink.error(&format!("Aborted {} (partial results in {})", target, ctx.paths.dir.display()));
                TargetOutcome::Cancelled
            }
        }
    }

    async fn run_stages(
        &self,
        ctx: &RunContext,
        progress: &ProgressTracker,
        cancel: &CancelToken,
    ) -> Result<ScanSummary, Interrupted> {
        let mut summary = ScanSummary::new(&ctx.target, &ctx.timestamp, ctx.started_at);
        let paths = &ctx.paths;

        // ═══════════════════════════════════════════════════════════════════
        // STAGE 1: SUBDOMAIN DISCOVERY
        // ═══════════════════════════════════════════════════════════════════
        let subdomains = self.discover(ctx, progress, cancel).await?;
        summary.subdomain_count = subdomains.len();
        progress.data_found("subdomains", subdomains.len());

        if subdomains.is_empty() {
            self.sink.error("No subdomains found, skipping remaining stages");
            progress.stage_skipped(&Stage::Liveness.to_string(), "no subdomains");
            progress.stage_skipped(&Stage::Vulnerability.to_string(), "no subdomains");
            return Ok(summary);
        }
        self.sink.success(&format!("Found {} unique subdomains", subdomains.len()));
        check_cancel(cancel)?;

        // ═══════════════════════════════════════════════════════════════════
        // STAGE 2: LIVENESS PROBING
        // ═══════════════════════════════════════════════════════════════════
        summary.live_count = self.probe_live_hosts(paths, progress, cancel).await?;
        self.sink.success(&format!("Found {} live hosts", summary.live_count));
        check_cancel(cancel)?;

        // ═══════════════════════════════════════════════════════════════════
        // STAGE 3: VULNERABILITY SCAN
        // ═══════════════════════════════════════════════════════════════════
        let vuln_stage = Stage::Vulnerability.to_string();
        if self.config.skip_vulns {
            self.sink.info("Vulnerability scan disabled (--no-vuln)");
            progress.stage_skipped(&vuln_stage, "disabled");
            return Ok(summary);
        }
        if summary.live_count == 0 {
            self.sink.warn("No live hosts, skipping vulnerability scan");
            progress.stage_skipped(&vuln_stage, "no live hosts");
            return Ok(summary);
        }

        let verdict = self.check_waf(&ctx.target, cancel).await?;
        let rate = select_rate(verdict, self.config.rate_limit);
        summary.waf = Some(verdict);
        summary.rate_limit = Some(rate);
        if verdict.is_detected() {
            progress.waf_detected(&verdict.to_string(), rate);
        }
        check_cancel(cancel)?;

        let vuln_count = self.scan_vulnerabilities(paths, rate, progress, cancel).await?;
        summary.vuln_count = vuln_count;
        summary.vuln_stage_ran = true;

        if vuln_count > 0 {
            self.sink.error(&format!("🚨 DANGER: Found {} vulnerabilities! Check the report!", vuln_count));
        } else {
            self.sink.success("No critical/high/medium vulnerabilities found");
        }
        self.notifier
            .notify(&discord_notifier::scan_result_message(&ctx.target, vuln_count))
            .await;

        Ok(summary)
    }

    /// Run both enumerators into the raw file, then dedupe into `subdomains.txt`
    async fn discover(
        &self,
        ctx: &RunContext,
        progress: &ProgressTracker,
        cancel: &CancelToken,
    ) -> Result<BTreeSet<String>, Interrupted> {
        let stage = Stage::Discovery.to_string();
        let paths = &ctx.paths;

        let subdomains = if self.config.skip_subdomains {
            self.sink.info("Subdomain discovery disabled (--no-subs), scanning the target only");
            progress.stage_skipped(&stage, "disabled");
            BTreeSet::from([ctx.target.clone()])
        } else {
            self.sink.banner("STAGE 1: SUBDOMAIN DISCOVERY");
            progress.stage_started(&stage);

            let spinner = self.sink.spinner("Harvesting subdomains...");
            let raw = &paths.raw_subdomains;
            let invocations = [
                tools::subfinder(&self.config, &ctx.target, raw),
                tools::assetfinder(&self.config, &ctx.target, raw),
            ];
            for invocation in &invocations {
                let result = self.runner.run(invocation, cancel).await;
                self.record_tool(invocation.tool, &result, progress);
                if result.cancelled {
                    spinner.finish_and_clear();
                    return Err(Interrupted);
                }
            }
            spinner.finish_and_clear();

            progress.stage_completed(&stage);
            read_unique_lines(raw)
        };

        if let Err(e) = write_lines(&paths.subdomains, subdomains.iter()) {
            tracing::warn!(path = %paths.subdomains.display(), error = %e, "failed to persist subdomains");
            self.sink.warn(&format!("Could not write {}: {}", paths.subdomains.display(), e));
        }

        Ok(subdomains)
    }

    async fn probe_live_hosts(
        &self,
        paths: &WorkspacePaths,
        progress: &ProgressTracker,
        cancel: &CancelToken,
    ) -> Result<usize, Interrupted> {
        let stage = Stage::Liveness.to_string();
        self.sink.banner("STAGE 2: LIVENESS PROBING");
        progress.stage_started(&stage);

        let spinner = self.sink.spinner("Probing live hosts (httpx)...");
        let invocation = tools::httpx(&self.config, &paths.subdomains, &paths.live_hosts);
        let result = self.runner.run(&invocation, cancel).await;
        spinner.finish_and_clear();

        self.record_tool(invocation.tool, &result, progress);
        if result.cancelled {
            return Err(Interrupted);
        }

        let live = result.output_path.as_deref().map(count_lines).unwrap_or(0);
        progress.stage_completed(&stage);
        progress.data_found("live hosts", live);
        Ok(live)
    }

    /// Probe for a WAF, raced against cancellation
    async fn check_waf(&self, target: &str, cancel: &CancelToken) -> Result<WafVerdict, Interrupted> {
        self.sink.info("Checking for WAF (Web Application Firewall)...");

        let verdict = tokio::select! {
            verdict = self.waf.probe(target) => verdict,
            _ = cancel.cancelled() => return Err(Interrupted),
        };

        if verdict.is_detected() {
            self.sink.error(&format!("WAF DETECTED: {}", verdict));
            self.sink.warn(&format!(
                "Nuclei rate limit lowered from {} to {} to avoid bans",
                self.config.rate_limit,
                select_rate(verdict, self.config.rate_limit)
            ));
        } else {
            self.sink.success("No obvious WAF detected, going full speed");
        }
        Ok(verdict)
    }

    async fn scan_vulnerabilities(
        &self,
        paths: &WorkspacePaths,
        rate: u32,
        progress: &ProgressTracker,
        cancel: &CancelToken,
    ) -> Result<usize, Interrupted> {
        let stage = Stage::Vulnerability.to_string();
        self.sink.banner("STAGE 3: VULNERABILITY SCAN");
        progress.stage_started(&stage);

        match extract_urls(&paths.live_hosts, &paths.urls) {
            Ok(n) => tracing::debug!(urls = n, "wrote nuclei target list"),
            Err(e) => {
                tracing::warn!(error = %e, "failed to build URL list");
                self.sink.warn(&format!("Could not build URL list: {}", e));
            }
        }

        self.sink.info(&format!("Starting nuclei at {} req/s (this is the heavy part)...", rate));
        let spinner = self.sink.spinner("Firing nuclei engine...");
        let invocation = tools::nuclei(&self.config, &paths.urls, &paths.vulns, rate);
        let result = self.runner.run(&invocation, cancel).await;
        spinner.finish_and_clear();

        self.record_tool(invocation.tool, &result, progress);
        if result.cancelled {
            return Err(Interrupted);
        }

        let vulns = result.output_path.as_deref().map(count_lines).unwrap_or(0);
        progress.stage_completed(&stage);
        progress.data_found("vulnerabilities", vulns);
        Ok(vulns)
    }

    fn record_tool(&self, tool: &str, result: &StageResult, progress: &ProgressTracker) {
        if !result.succeeded && !result.cancelled {
            progress.tool_failed(tool);
            if self.config.verbose {
                self.sink.warn(&format!("{} failed (command not found or error)", tool));
            }
        }
    }
}

fn check_cancel(cancel: &CancelToken) -> Result<(), Interrupted> {
    if cancel.is_cancelled() {
        Err(Interrupted)
    } else {
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FILE HAND-OFF HELPERS
// ═══════════════════════════════════════════════════════════════════════════

/// Number of non-blank lines; a missing file counts as zero
pub fn count_lines(path: &Path) -> usize {
    if !path.exists() {
        return 0;
    }

    match read_lossy(path) {
        Ok(content) => content.lines().filter(|l| !l.trim().is_empty()).count(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read artifact");
            0
        }
    }
}

/// Set of trimmed, non-blank lines; a missing file yields an empty set
pub fn read_unique_lines(path: &Path) -> BTreeSet<String> {
    if !path.exists() {
        return BTreeSet::new();
    }

    read_lossy(path)
        .unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tool output is not guaranteed UTF-8 (page titles, banner noise); invalid bytes become U+FFFD
fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_lines<'a>(path: &Path, lines: impl Iterator<Item = &'a String>) -> std::io::Result<()> {
    let mut content = lines.map(String::as_str).collect::<Vec<_>>().join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(path, content)
}

/// Copy the first whitespace-delimited token of every live-host line into the URL list
pub fn extract_urls(live_hosts: &Path, urls: &Path) -> std::io::Result<usize> {
    let content = if live_hosts.exists() {
        read_lossy(live_hosts)?
    } else {
        String::new()
    };

    let list: Vec<String> = content
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect();

    write_lines(urls, list.iter())?;
    Ok(list.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::testing::MemorySink;
    use crate::progress::EventType;
    use crate::tools::{Capture, ToolInvocation};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Stands in for the external tools: writes canned output per tool name
    #[derive(Default)]
    struct FakeRunner {
        outputs: HashMap<&'static str, String>,
        calls: Mutex<Vec<ToolInvocation>>,
        /// Trip this token when the named tool runs
        cancel_on: Option<(&'static str, CancelToken)>,
    }

    impl FakeRunner {
        fn with(mut self, tool: &'static str, output: &str) -> Self {
            self.outputs.insert(tool, output.to_string());
            self
        }

        fn called(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().iter().map(|c| c.tool).collect()
        }

        fn invocation(&self, tool: &str) -> Option<ToolInvocation> {
            self.calls.lock().unwrap().iter().find(|c| c.tool == tool).cloned()
        }
    }

    #[async_trait]
    impl ToolRunner for FakeRunner {
        async fn run(&self, inv: &ToolInvocation, cancel: &CancelToken) -> StageResult {
            self.calls.lock().unwrap().push(inv.clone());

            if let Some((tool, token)) = &self.cancel_on {
                if *tool == inv.tool {
                    token.cancel();
                    return StageResult::cancelled(&inv.output);
                }
            }
            if cancel.is_cancelled() {
                return StageResult::cancelled(&inv.output);
            }

            let Some(out) = self.outputs.get(inv.tool) else {
                // Behaves like an unreachable binary: no output file
                return StageResult::finished(false, &inv.output);
            };
            match &inv.capture {
                Capture::Append(path) => {
                    let mut existing = fs::read_to_string(path).unwrap_or_default();
                    existing.push_str(out);
                    fs::write(path, existing).unwrap();
                }
                Capture::Truncate(path) => fs::write(path, out).unwrap(),
                Capture::Passthrough => fs::write(&inv.output, out).unwrap(),
            }
            StageResult::finished(true, &inv.output)
        }
    }

    struct FixedWaf(WafVerdict, Mutex<usize>);

    impl FixedWaf {
        fn new(v: WafVerdict) -> Self {
            Self(v, Mutex::new(0))
        }
        fn probes(&self) -> usize {
            *self.1.lock().unwrap()
        }
    }

    #[async_trait]
    impl WafProbe for FixedWaf {
        async fn probe(&self, _target: &str) -> WafVerdict {
            *self.1.lock().unwrap() += 1;
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<String>>);

    impl RecordingNotifier {
        fn sent(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notify for RecordingNotifier {
        async fn notify(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        runner: Arc<FakeRunner>,
        waf: Arc<FixedWaf>,
        notifier: Arc<RecordingNotifier>,
        sink: Arc<MemorySink>,
        pipeline: Pipeline,
    }

    fn harness(target: &str, runner: FakeRunner, waf: WafVerdict, tweak: impl FnOnce(&mut ScanConfig)) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ScanConfig::for_target(target);
        config.output_dir = dir.path().to_path_buf();
        tweak(&mut config);

        let runner = Arc::new(runner);
        let waf = Arc::new(FixedWaf::new(waf));
        let notifier = Arc::new(RecordingNotifier::default());
        let sink = Arc::new(MemorySink::default());
        let pipeline = Pipeline::new(
            Arc::new(config),
            runner.clone(),
            waf.clone(),
            notifier.clone(),
            sink.clone(),
        );

        Harness {
            _dir: dir,
            runner,
            waf,
            notifier,
            sink,
            pipeline,
        }
    }

    fn completed(outcome: TargetOutcome) -> ScanSummary {
        match outcome {
            TargetOutcome::Completed(s) => s,
            other => panic!("expected completed run, got {:?}", other),
        }
    }

    fn run_dir(summary_dir: &Path) -> std::path::PathBuf {
        fs::read_dir(summary_dir)
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path()
    }

    #[tokio::test]
    async fn test_merged_sources_deduplicate_to_clean_scan() {
        let runner = FakeRunner::default()
            .with("subfinder", "a.example.com\nb.example.com\n")
            .with("assetfinder", "a.example.com\n")
            .with(
                "httpx",
                "https://a.example.com [200] [Home] [nginx]\nhttps://b.example.com [301] [Moved]\n",
            )
            .with("nuclei", "");
        let h = harness("example.com", runner, WafVerdict::None, |_| {});

        let summary = completed(h.pipeline.run_target("example.com", &CancelToken::new()).await);

        assert_eq!(summary.counts(), (2, 2, 0));
        assert!(summary.vuln_stage_ran);
        assert_eq!(summary.rate_limit, Some(150));
        assert_eq!(
            h.notifier.sent(),
            vec!["✅ **ApexRecon:** Scan finished on example.com. Clean (so far).".to_string()]
        );

        let dir = run_dir(&h.pipeline.config().output_dir);
        let subs = fs::read_to_string(dir.join("subdomains.txt")).unwrap();
        let lines: Vec<&str> = subs.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(&"a.example.com") && lines.contains(&"b.example.com"));

        let urls = fs::read_to_string(dir.join("urls.txt")).unwrap();
        assert_eq!(urls, "https://a.example.com\nhttps://b.example.com\n");
        assert!(dir.join("report.html").exists());
        assert!(dir.join("summary.json").exists());
    }

    #[tokio::test]
    async fn test_no_subs_with_unreachable_prober() {
        // httpx has no canned output: behaves like a missing binary
        let h = harness("203.0.113.5", FakeRunner::default(), WafVerdict::None, |c| {
            c.skip_subdomains = true;
        });

        let summary = completed(h.pipeline.run_target("203.0.113.5", &CancelToken::new()).await);

        assert_eq!(summary.counts(), (1, 0, 0));
        assert!(!summary.vuln_stage_ran);
        assert_eq!(h.runner.called(), vec!["httpx"]);
        assert!(h.notifier.sent().is_empty());
        assert_eq!(h.waf.probes(), 0);

        let dir = run_dir(&h.pipeline.config().output_dir);
        assert_eq!(fs::read_to_string(dir.join("subdomains.txt")).unwrap(), "203.0.113.5\n");
        assert!(dir.join("report.html").exists());
    }

    #[tokio::test]
    async fn test_empty_discovery_skips_downstream_stages() {
        let runner = FakeRunner::default().with("subfinder", "\n\n").with("assetfinder", "");
        let h = harness("example.com", runner, WafVerdict::None, |_| {});

        let summary = completed(h.pipeline.run_target("example.com", &CancelToken::new()).await);

        assert_eq!(summary.counts(), (0, 0, 0));
        assert_eq!(h.runner.called(), vec!["subfinder", "assetfinder"]);
        assert!(h.notifier.sent().is_empty());
        assert!(h.sink.contains("error", "No subdomains found"));
    }

    #[tokio::test]
    async fn test_no_vuln_flag_skips_scan_probe_and_notification() {
        let runner = FakeRunner::default()
            .with("subfinder", "a.example.com\n")
            .with("assetfinder", "")
            .with("httpx", "https://a.example.com [200]\n")
            .with("nuclei", "finding\n");
        let h = harness("example.com", runner, WafVerdict::Cloudflare, |c| c.skip_vulns = true);

        let summary = completed(h.pipeline.run_target("example.com", &CancelToken::new()).await);

        assert_eq!(summary.counts(), (1, 1, 0));
        assert!(!h.runner.called().contains(&"nuclei"));
        assert_eq!(h.waf.probes(), 0);
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_waf_lowers_rate_and_alerts_on_findings() {
        let runner = FakeRunner::default()
            .with("subfinder", "a.example.com\n")
            .with("assetfinder", "")
            .with("httpx", "https://a.example.com [200]\n")
            .with("nuclei", "[cve-1] [http] [high] https://a.example.com\n[xss] [http] [medium] https://a.example.com/q\n");
        let h = harness("example.com", runner, WafVerdict::Cloudflare, |c| c.rate_limit = 999);

        let summary = completed(h.pipeline.run_target("example.com", &CancelToken::new()).await);

        assert_eq!(summary.vuln_count, 2);
        assert_eq!(summary.waf, Some(WafVerdict::Cloudflare));
        assert_eq!(summary.rate_limit, Some(50));

        let nuclei = h.runner.invocation("nuclei").unwrap();
        let rl = nuclei.args.iter().position(|a| a == "-rl").unwrap();
        assert_eq!(nuclei.args[rl + 1], "50");

        assert!(h.sink.contains("error", "WAF DETECTED: Cloudflare"));
        assert_eq!(
            h.notifier.sent(),
            vec!["🚨 **ApexRecon Alert:** Found 2 vulnerabilities on example.com!".to_string()]
        );
    }

    #[tokio::test]
    async fn test_cancel_mid_target_leaves_partial_artifacts() {
        let cancel = CancelToken::new();
        let runner = FakeRunner {
            cancel_on: Some(("httpx", cancel.clone())),
            ..FakeRunner::default()
        }
        .with("subfinder", "a.example.com\n")
        .with("assetfinder", "");
        let h = harness("example.com", runner, WafVerdict::None, |_| {});

        let outcome = h.pipeline.run_target("example.com", &cancel).await;

        assert_eq!(outcome, TargetOutcome::Cancelled);
        let dir = run_dir(&h.pipeline.config().output_dir);
        assert!(dir.join("subdomains.txt").exists());
        assert!(!dir.join("report.html").exists());

        let events = ProgressTracker::read_events_from_file(&dir.join("progress.jsonl"));
        assert_eq!(events.last().map(|e| e.event_type.clone()), Some(EventType::ScanCancelled));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_creates_nothing() {
        let h = harness("example.com", FakeRunner::default(), WafVerdict::None, |_| {});
        let cancel = CancelToken::new();
        cancel.cancel();

        assert_eq!(h.pipeline.run_target("example.com", &cancel).await, TargetOutcome::Cancelled);
        assert!(h.runner.called().is_empty());
        assert_eq!(fs::read_dir(&h.pipeline.config().output_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_extract_urls_takes_first_token() {
        let dir = tempfile::tempdir().unwrap();
        let live = dir.path().join("live.txt");
        let urls = dir.path().join("urls.txt");
        fs::write(&live, "http://x.io [200] [Title with spaces]\n\n  https://y.io\t[403]\n").unwrap();

        assert_eq!(extract_urls(&live, &urls).unwrap(), 2);
        assert_eq!(fs::read_to_string(&urls).unwrap(), "http://x.io\nhttps://y.io\n");
    }

    #[test]
    fn test_count_lines_missing_file_is_zero() {
        assert_eq!(count_lines(Path::new("/nonexistent/apexrecon.txt")), 0);
    }

    #[test]
    fn test_latin1_title_keeps_live_hosts() {
        let dir = tempfile::tempdir().unwrap();
        let live = dir.path().join("live_hosts.txt");
        let urls = dir.path().join("urls.txt");
        fs::write(
            &live,
            b"https://a.example.com [200] [Caf\xe9]\nhttps://b.example.com [200] [Home]\n",
        )
        .unwrap();

        assert_eq!(count_lines(&live), 2);
        assert_eq!(extract_urls(&live, &urls).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(&urls).unwrap(),
            "https://a.example.com\nhttps://b.example.com\n"
        );
    }

    #[test]
    fn test_invalid_utf8_line_keeps_other_subdomains() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw_subs.txt");
        fs::write(&raw, b"a.example.com\nb.example.com\nx\xff\n").unwrap();

        let subs = read_unique_lines(&raw);
        assert_eq!(subs.len(), 3);
        assert!(subs.contains("a.example.com"));
        assert!(subs.contains("b.example.com"));
    }
}
