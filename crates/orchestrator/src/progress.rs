//! Progress tracking

use tokio::sync::Mutex;
use tracing::info;

pub struct ProgressTracker {
    total: Mutex<usize>,
    completed: Mutex<usize>,
    probed: Mutex<usize>,
    identified: Mutex<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub completed: usize,
    pub probed: usize,
    pub identified: usize,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            total: Mutex::new(0),
            completed: Mutex::new(0),
            probed: Mutex::new(0),
            identified: Mutex::new(0),
        }
    }

    pub async fn set_total(&self, total: usize) {
        *self.total.lock().await = total;
    }

    /// Record a finished target: how many addresses it probed and how many matched.
    pub async fn record_target(&self, probed: usize, identified: usize) {
        *self.completed.lock().await += 1;
        *self.probed.lock().await += probed;
        *self.identified.lock().await += identified;
    }

    pub async fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            total: *self.total.lock().await,
            completed: *self.completed.lock().await,
            probed: *self.probed.lock().await,
            identified: *self.identified.lock().await,
        }
    }

    pub async fn print_summary(&self) {
        let s = self.snapshot().await;

        info!("Fingerprint Summary:");
        info!("  Targets: {}/{}", s.completed, s.total);
        info!("  Addresses probed: {}", s.probed);
        info!("  Devices identified: {}", s.identified);
        if s.probed > 0 {
            info!("  Hit rate: {:.1}%", (s.identified as f64 / s.probed as f64) * 100.0);
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
