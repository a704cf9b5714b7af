// parallel_executor.rs - Run the pipeline over every target
// A semaphore bounds how many targets run at once. With one worker, targets
// run strictly in list order. A tripped cancel token stops queued targets
// from starting.

use crate::cancel::CancelToken;
use crate::metrics::BatchStats;
use crate::pipeline::{Pipeline, TargetOutcome};
use colored::*;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

pub struct TargetExecutor {
    pipeline: Arc<Pipeline>,
    semaphore: Arc<Semaphore>,
    workers: usize,
}

impl TargetExecutor {
    pub fn new(pipeline: Arc<Pipeline>, workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            pipeline,
            semaphore: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    /// Process targets and collect outcomes, in input order
    pub async fn run_all(&self, targets: &[String], cancel: &CancelToken) -> (Vec<TargetOutcome>, BatchStats) {
        let total = targets.len();
        let sink = self.pipeline.sink();
        if total > 1 {
            sink.info(&format!("Processing {} targets with {} worker(s)", total, self.workers));
        }

        let mut handles: Vec<JoinHandle<TargetOutcome>> = Vec::with_capacity(total);

        for (idx, target) in targets.iter().enumerate() {
            let permit = tokio::select! {
                permit = Arc::clone(&self.semaphore).acquire_owned() => permit,
                _ = cancel.cancelled() => break,
            };
            let Ok(permit) = permit else {
                break;
            };
            // Both branches may be ready at once; never start work after a cancel.
            if cancel.is_cancelled() {
                break;
            }

            if total > 1 {
                sink.info(&format!("Target [{}/{}]: {}", idx + 1, total, target));
            }

            let pipeline = Arc::clone(&self.pipeline);
            let cancel = cancel.clone();
            let target = target.clone();
            handles.push(tokio::spawn(async move {
                let _permit = permit;
                pipeline.run_target(&target, &cancel).await
            }));
        }

        let mut stats = BatchStats {
            total,
            not_started: total - handles.len(),
            ..BatchStats::default()
        };
        let mut outcomes = Vec::with_capacity(handles.len());

        for handle in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(error = %e, "target task panicked");
                    TargetOutcome::Failed(e.to_string())
                }
            };

            match &outcome {
                TargetOutcome::Completed(summary) => stats.record(summary),
                TargetOutcome::Cancelled => stats.cancelled += 1,
                TargetOutcome::Failed(_) => stats.failed += 1,
            }
            outcomes.push(outcome);
        }

        (outcomes, stats)
    }
}

/// Print the end-of-run totals
pub fn print_batch_summary(stats: &BatchStats) {
    println!("\n{}", "═══════════════════════════════════════════════════════════════".yellow().bold());
    println!("{}", "📊 SCAN SUMMARY".yellow().bold());
    println!("{}", "═══════════════════════════════════════════════════════════════".yellow().bold());
    println!("{}", format!("Total targets:     {}", stats.total).white());
    println!("{}", format!("✅ Completed:       {}", stats.completed).green());
    if stats.failed > 0 {
        println!("{}", format!("❌ Failed:          {}", stats.failed).red());
    }
    if stats.cancelled + stats.not_started > 0 {
        println!("{}", format!("⛔ Interrupted:     {} (+{} not started)", stats.cancelled, stats.not_started).red());
    }
    println!("{}", format!("🌐 Subdomains:      {}", stats.total_subdomains).cyan());
    println!("{}", format!("🟢 Live hosts:      {}", stats.total_live).cyan());
    println!("{}", format!("🔥 Vulnerabilities: {}", stats.total_vulns).red().bold());
    println!("{}", "═══════════════════════════════════════════════════════════════\n".yellow().bold());
}
