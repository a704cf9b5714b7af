// Rebuild report.html for an existing run workspace
use apexrecon::metrics::ScanSummary;
use apexrecon::pipeline::count_lines;
use apexrecon::report_generator::write_html_report;
use apexrecon::workspace::WorkspacePaths;
use chrono::Local;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: regen_report <workspace_directory>");
        eprintln!("Example: regen_report ApexResults/example.com_2026-01-01_10-00-00");
        std::process::exit(1);
    }

    let scan_dir = Path::new(&args[1]);

    if !scan_dir.is_dir() {
        eprintln!("Error: Directory not found: {}", scan_dir.display());
        std::process::exit(1);
    }

    let paths = WorkspacePaths::new(scan_dir.to_path_buf());
    let summary = match ScanSummary::load_from_file(&paths.summary) {
        Ok(summary) => summary,
        Err(_) => summary_from_artifacts(&paths),
    };

    println!("Regenerating report for: {}", summary.target);
    println!("Workspace: {}", scan_dir.display());

    match write_html_report(&summary, &paths.report) {
        Ok(path) => {
            println!("Report generated successfully!");
            println!("Output: {}", path.display());
        }
        Err(e) => {
            eprintln!("Error generating report: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Fallback when summary.json is missing: recount the artifact files and
/// recover target/timestamp from the `{target}_{timestamp}` directory name.
fn summary_from_artifacts(paths: &WorkspacePaths) -> ScanSummary {
    let dir_name = paths
        .dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    // Timestamps look like 2026-01-01_10-00-00, the target may itself contain '_'
    let (target, timestamp) = match dir_name.match_indices('_').rev().nth(1) {
        Some((idx, _)) => (&dir_name[..idx], &dir_name[idx + 1..]),
        None => (dir_name, ""),
    };

    let mut summary = ScanSummary::new(target, timestamp, Local::now());
    summary.subdomain_count = count_lines(&paths.subdomains);
    summary.live_count = count_lines(&paths.live_hosts);
    summary.vuln_count = count_lines(&paths.vulns);
    summary.vuln_stage_ran = paths.vulns.exists();
    summary
}
