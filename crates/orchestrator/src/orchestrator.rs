// crates/orchestrator/src/orchestrator.rs
//! Orchestrator - per-target fan-out and ordered result collection

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use favscan_common::{FingerprintResult, Prober};
use favscan_target_resolver::TargetResolver;

use crate::progress::ProgressTracker;

/// Default worker count: the machine's available parallelism.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Fingerprints top-level targets concurrently, one worker per target at a time.
///
/// Addresses inside one target are probed sequentially, so the number of
/// in-flight probes never exceeds the worker count.
pub struct Orchestrator {
    prober: Arc<dyn Prober>,
    resolver: Arc<TargetResolver>,
    concurrency: usize,
}

impl Orchestrator {
    pub fn new(prober: Arc<dyn Prober>, resolver: TargetResolver) -> Self {
        Self {
            prober,
            resolver: Arc::new(resolver),
            concurrency: default_concurrency(),
        }
    }

    /// Cap on concurrently fingerprinted targets (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Resolve one target and probe its addresses in enumeration order.
    pub async fn fingerprint(&self, target: &str) -> FingerprintResult {
        fingerprint_target(&*self.prober, &self.resolver, target, None).await
    }

    /// Fingerprint every target; the output is positionally aligned with `targets`.
    #[instrument(skip(self, targets), fields(job = %Uuid::new_v4(), target_count = targets.len()))]
    pub async fn fingerprint_all(&self, targets: Vec<String>) -> Vec<FingerprintResult> {
        let count = targets.len();
        if count == 0 {
            return Vec::new();
        }

        info!(
            "Starting fingerprint job with {} target(s) using {}",
            count,
            self.prober.name()
        );
        let progress = Arc::new(ProgressTracker::new());
        progress.set_total(count).await;

        // Shared queue pattern: workers pop (index, target) until it is drained.
        let queue: Arc<Mutex<VecDeque<(usize, String)>>> =
            Arc::new(Mutex::new(targets.into_iter().enumerate().collect()));
        // One slot per input position, so completion order does not matter.
        let slots: Arc<Mutex<Vec<FingerprintResult>>> =
            Arc::new(Mutex::new(vec![Vec::new(); count]));

        let workers_count = self.concurrency.min(count);
        let mut workers = Vec::with_capacity(workers_count);
        for _ in 0..workers_count {
            let queue = queue.clone();
            let slots = slots.clone();
            let prober = self.prober.clone();
            let resolver = self.resolver.clone();
            let progress = progress.clone();

            let worker = tokio::spawn(async move {
                loop {
                    let next = {
                        let mut q = queue.lock().await;
                        q.pop_front()
                    };

                    let (index, target) = match next {
                        Some(item) => item,
                        None => break,
                    };

                    let result =
                        fingerprint_target(&*prober, &resolver, &target, Some(&progress)).await;
                    slots.lock().await[index] = result;
                }
            });
            workers.push(worker);
        }

        for w in workers {
            if let Err(e) = w.await {
                // Slots the worker never filled stay empty.
                warn!("Fingerprint worker failed: {}", e);
            }
        }

        progress.print_summary().await;

        let mut slots = slots.lock().await;
        std::mem::take(&mut *slots)
    }
}

async fn fingerprint_target(
    prober: &dyn Prober,
    resolver: &TargetResolver,
    target: &str,
    progress: Option<&ProgressTracker>,
) -> FingerprintResult {
    let addresses = resolver.resolve(target).await;
    if addresses.is_empty() {
        info!(%target, "No addresses to probe");
    }

    let results = prober.probe_sequence(&addresses).await;
    if let Some(progress) = progress {
        progress.record_target(addresses.len(), results.len()).await;
    }
    results
}
