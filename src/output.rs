// output.rs - User-facing output sink
// Every component writes status lines through an injected `OutputSink` instead of
// printing directly, so tests and library users can swap in a silent sink.

use colored::*;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

pub type SharedSink = Arc<dyn OutputSink>;

pub trait OutputSink: Send + Sync {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
    fn success(&self, msg: &str);

    /// Section header for a stage or a target
    fn banner(&self, title: &str);

    /// Start a spinner for a long-running step. The default is a hidden bar.
    fn spinner(&self, _msg: &str) -> ProgressBar {
        ProgressBar::hidden()
    }
}

/// Colored terminal output
pub struct ConsoleSink {
    /// Spinners are suppressed when tool output is passed through, they would interleave.
    spinners: bool,
    /// Every spinner is drawn through one `MultiProgress` so concurrent targets get separate rows.
    multi: MultiProgress,
}

impl ConsoleSink {
    pub fn new(spinners: bool) -> Self {
        Self::with_multi(spinners, MultiProgress::new())
    }

    pub fn with_multi(spinners: bool, multi: MultiProgress) -> Self {
        Self { spinners, multi }
    }
}

impl OutputSink for ConsoleSink {
    fn info(&self, msg: &str) {
        println!("{}", format!("[*] {}", msg).cyan());
    }

    fn warn(&self, msg: &str) {
        println!("{}", format!("[!] {}", msg).yellow());
    }

    fn error(&self, msg: &str) {
        eprintln!("{}", format!("[-] {}", msg).red().bold());
    }

    fn success(&self, msg: &str) {
        println!("{}", format!("[+] {}", msg).green());
    }

    fn banner(&self, title: &str) {
        println!("\n{}", "═══════════════════════════════════════════════════════════════".yellow().bold());
        println!("{}", format!("  {}", title).yellow().bold());
        println!("{}", "═══════════════════════════════════════════════════════════════".yellow().bold());
    }

    fn spinner(&self, msg: &str) -> ProgressBar {
        if !self.spinners {
            return ProgressBar::hidden();
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Discards everything
pub struct SilentSink;

impl OutputSink for SilentSink {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
    fn success(&self, _msg: &str) {}
    fn banner(&self, _title: &str) {}
}
