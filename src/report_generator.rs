// report_generator.rs - Static HTML report and JSON summary for one run

use crate::metrics::ScanSummary;
use crate::output::OutputSink;
use crate::workspace::WorkspacePaths;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Write `report.html` and `summary.json`. Never fails the run: errors are
/// reported through the sink and logged.
pub fn emit(summary: &ScanSummary, paths: &WorkspacePaths, sink: &dyn OutputSink) {
    if let Err(e) = summary.save_to_file(&paths.summary) {
        tracing::warn!(path = %paths.summary.display(), error = %e, "failed to write summary.json");
    }

    match write_html_report(summary, &paths.report) {
        Ok(path) => sink.success(&format!("HTML report generated: {}", path.display())),
        Err(e) => {
            tracing::warn!(error = %e, "report write failed");
            sink.warn(&format!("Failed to generate HTML report: {:#}", e));
        }
    }
}

pub fn write_html_report(summary: &ScanSummary, html_path: &Path) -> Result<PathBuf> {
    fs::write(html_path, generate_html_content(summary))
        .with_context(|| format!("failed to write {}", html_path.display()))?;
    Ok(html_path.to_path_buf())
}

/// Render the report page. Artifact links are relative to the run directory.
pub fn generate_html_content(summary: &ScanSummary) -> String {
    let target = escape_html(&summary.target);

    let waf_line = match summary.waf {
        Some(waf) if waf.is_detected() => format!(
            r#"<p class="stat warn">🛡️ WAF: {} (rate limited to {}/s)</p>"#,
            waf,
            summary.rate_limit.unwrap_or_default()
        ),
        Some(_) => format!(
            r#"<p class="stat">🛡️ WAF: none detected (rate {}/s)</p>"#,
            summary.rate_limit.unwrap_or_default()
        ),
        None => r#"<p class="stat dim">🛡️ WAF: not checked</p>"#.to_string(),
    };

    let vuln_note = if summary.vuln_stage_ran {
        String::new()
    } else {
        r#"<p class="dim">Vulnerability scan did not run for this target.</p>"#.to_string()
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>ApexRecon - {target}</title>
    <style>
        body {{ font-family: Arial, sans-serif; background: #111; color: #fff; padding: 20px; }}
        .card {{ background: #222; padding: 20px; margin: 10px; border-radius: 8px; border-left: 5px solid #00ff41; }}
        h1 {{ color: #00ff41; }}
        a {{ color: #00bfff; }}
        .stat {{ font-size: 20px; }}
        .warn {{ color: #ffaa00; }}
        .dim {{ color: #888; }}
    </style>
</head>
<body>
    <h1>🚀 ApexRecon Report: {target}</h1>
    <p>Date: {timestamp}</p>
    <div class="card">
        <h3>Stats</h3>
        <p class="stat">🌐 Subdomains: {subs}</p>
        <p class="stat">🟢 Live Hosts: {live}</p>
        <p class="stat">🔥 Vulnerabilities: {vulns}</p>
        {waf_line}
        {vuln_note}
    </div>
    <div class="card">
        <h3>Files</h3>
        <p>📂 <a href="live_hosts.txt">Live Hosts List</a></p>
        <p>📂 <a href="nuclei_vulns.txt">Vulnerabilities List</a></p>
        <p>📂 <a href="summary.json">Summary (JSON)</a></p>
    </div>
</body>
</html>
"#,
        target = target,
        timestamp = escape_html(&summary.timestamp),
        subs = summary.subdomain_count,
        live = summary.live_count,
        vulns = summary.vuln_count,
        waf_line = waf_line,
        vuln_note = vuln_note,
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
