//! Lookup metrics for translators.
//!
//! Counts how often keys resolve from the dictionary versus falling back to
//! the `|key|` sentinel or verbatim text. Useful for spotting untranslated
//! strings in a running application.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared lookup counters. Attach one instance to many translators with
/// [`Translator::with_metrics`](crate::i18n::Translator::with_metrics) or
/// [`TranslatorFactory::set_metrics`](crate::i18n::TranslatorFactory::set_metrics).
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Keys found in the dictionary
    hits: AtomicUsize,

    /// Missing keys that looked namespaced (rendered as `|key|`)
    namespaced_misses: AtomicUsize,

    /// Missing keys used verbatim as the message
    verbatim_fallbacks: AtomicUsize,

    /// Positional formatting failures
    format_failures: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_namespaced_miss(&self) {
        self.namespaced_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verbatim_fallback(&self) {
        self.verbatim_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_format_failure(&self) {
        self.format_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn namespaced_misses(&self) -> usize {
        self.namespaced_misses.load(Ordering::Relaxed)
    }

    pub fn verbatim_fallbacks(&self) -> usize {
        self.verbatim_fallbacks.load(Ordering::Relaxed)
    }

    pub fn format_failures(&self) -> usize {
        self.format_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.hits();
        let namespaced_misses = self.namespaced_misses();
        let verbatim_fallbacks = self.verbatim_fallbacks();
        let lookups = hits + namespaced_misses + verbatim_fallbacks;
        let hit_rate = if lookups > 0 {
            (hits as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            hits,
            namespaced_misses,
            verbatim_fallbacks,
            format_failures: self.format_failures(),
            hit_rate,
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.namespaced_misses.store(0, Ordering::Relaxed);
        self.verbatim_fallbacks.store(0, Ordering::Relaxed);
        self.format_failures.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of [`LookupMetrics`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub hits: usize,
    pub namespaced_misses: usize,
    pub verbatim_fallbacks: usize,
    pub format_failures: usize,

    /// Dictionary hits as a percentage (0-100) of all lookups
    pub hit_rate: f64,
}
