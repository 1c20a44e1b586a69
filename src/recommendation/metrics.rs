//! Recommendation Metrics and Performance Monitoring
//!
//! Per-request statistics and timing for the matching scan. Everything here is
//! emitted through `tracing`; none of it is part of the returned data.

use serde::Serialize;
use std::time::Instant;

use super::engine::{MatchMode, MatchSource};

/// Scans slower than this are logged at warn level
pub const SLOW_SCAN_THRESHOLD_MS: u64 = 500;

/// Statistics for a single recommendation request
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationStats {
    pub request_id: String,
    pub timestamp: i64,
    pub mode: MatchMode,
    pub source: MatchSource,
    /// Recipes scanned
    pub candidates: usize,
    /// Recipes that passed the mode's filter (before the `top_n` cap)
    pub matched: usize,
    pub returned: usize,
    pub duration_ms: u64,
}

impl RecommendationStats {
    pub fn new(mode: MatchMode, candidates: usize) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            mode,
            source: MatchSource::None,
            candidates,
            matched: 0,
            returned: 0,
            duration_ms: 0,
        }
    }

    /// Emit a structured summary event
    pub fn log(&self) {
        tracing::info!(
            request_id = %self.request_id,
            mode = %self.mode,
            source = %self.source,
            candidates = self.candidates,
            matched = self.matched,
            returned = self.returned,
            duration_ms = self.duration_ms,
            "recommendation completed"
        );
    }
}

/// Performance timer for tracking operation duration
pub struct PerformanceTimer {
    start: Instant,
    label: &'static str,
}

impl PerformanceTimer {
    pub fn new(label: &'static str) -> Self {
        Self {
            start: Instant::now(),
            label,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn log_if_slow(&self, threshold_ms: u64) {
        let elapsed = self.elapsed_ms();
        if elapsed > threshold_ms {
            tracing::warn!(
                "⚠️ Slow operation: {} took {}ms (threshold: {}ms)",
                self.label,
                elapsed,
                threshold_ms
            );
        }
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        tracing::debug!("⏱️ {} completed in {}ms", self.label, self.elapsed_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_empty() {
        let stats = RecommendationStats::new(MatchMode::Partial, 42);
        assert_eq!(stats.candidates, 42);
        assert_eq!(stats.matched, 0);
        assert_eq!(stats.returned, 0);
        assert_eq!(stats.source, MatchSource::None);
        assert!(!stats.request_id.is_empty());
    }

    #[test]
    fn test_stats_serialize_lowercase_enums() {
        let mut stats = RecommendationStats::new(MatchMode::Exact, 3);
        stats.source = MatchSource::Substitution;
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["mode"], "exact");
        assert_eq!(json["source"], "substitution");
    }

    #[test]
    fn test_timer_elapsed_is_monotonic() {
        let timer = PerformanceTimer::new("test");
        let first = timer.elapsed_ms();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(timer.elapsed_ms() >= first);
    }
}
