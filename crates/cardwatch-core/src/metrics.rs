//! Process-wide audit counters.
//!
//! Checkers, the organizer and the deploy planner bump these as they go;
//! the CLI reports them once per command through [`Metrics::flush`].

use std::sync::atomic::{AtomicU64, Ordering};

pub static METRICS: Metrics = Metrics::new();

/// Relaxed atomic counters. Values only ever grow.
pub struct Metrics {
    cards_scanned: AtomicU64,
    violations_emitted: AtomicU64,
    violations_dropped: AtomicU64,
    malformed_commit_links: AtomicU64,
    deploy_candidates: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            cards_scanned: AtomicU64::new(0),
            violations_emitted: AtomicU64::new(0),
            violations_dropped: AtomicU64::new(0),
            malformed_commit_links: AtomicU64::new(0),
            deploy_candidates: AtomicU64::new(0),
        }
    }

    pub fn add_cards_scanned(&self, n: u64) {
        self.cards_scanned.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "cards_scanned", n = n, "counter incremented");
    }

    pub fn add_violations_emitted(&self, n: u64) {
        self.violations_emitted.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "violations_emitted", n = n, "counter incremented");
    }

    pub fn add_violations_dropped(&self, n: u64) {
        self.violations_dropped.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "violations_dropped", n = n, "counter incremented");
    }

    pub fn inc_malformed_commit_links(&self) {
        self.malformed_commit_links.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "malformed_commit_links", "counter incremented");
    }

    pub fn inc_deploy_candidates(&self) {
        self.deploy_candidates.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "deploy_candidates", "counter incremented");
    }

    /// Log every counter in one event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            cards_scanned = self.cards_scanned(),
            violations_emitted = self.violations_emitted(),
            violations_dropped = self.violations_dropped(),
            malformed_commit_links = self.malformed_commit_links(),
            deploy_candidates = self.deploy_candidates(),
        );
    }

    pub fn cards_scanned(&self) -> u64 {
        self.cards_scanned.load(Ordering::Relaxed)
    }

    pub fn violations_emitted(&self) -> u64 {
        self.violations_emitted.load(Ordering::Relaxed)
    }

    pub fn violations_dropped(&self) -> u64 {
        self.violations_dropped.load(Ordering::Relaxed)
    }

    pub fn malformed_commit_links(&self) -> u64 {
        self.malformed_commit_links.load(Ordering::Relaxed)
    }

    pub fn deploy_candidates(&self) -> u64 {
        self.deploy_candidates.load(Ordering::Relaxed)
    }
}
