//! # Pipeline Stages
//!
//! Tracks how far one request has progressed. Observability only; every
//! request walks the full chain independently and nothing persists
//! between requests.

use serde::{Deserialize, Serialize};

/// Stage of the aggregation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Per-platform queries formulated
    QueryBuilt,
    /// Scrapers and AI generators launched
    Dispatched,
    /// All task outcomes gathered
    Collected,
    /// Near-identical titles removed
    Deduplicated,
    /// Empty result set checked (fallback generator may have run)
    FallbackCheck,
    /// Compatibility scores assigned
    Scored,
    /// AI creative-build slots reserved
    SlotReserved,
    /// Final list sorted and capped
    Ranked,
    /// Envelope assembled
    Delivered,
}

/// The per-request stage tracker
#[derive(Debug, Clone)]
pub struct StageTracker {
    stage: PipelineStage,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self {
            stage: PipelineStage::QueryBuilt,
        }
    }
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> PipelineStage {
        self.stage
    }

    /// Advance to the next stage. Delivered is terminal.
    pub fn advance(&mut self) {
        self.stage = match self.stage {
            PipelineStage::QueryBuilt => PipelineStage::Dispatched,
            PipelineStage::Dispatched => PipelineStage::Collected,
            PipelineStage::Collected => PipelineStage::Deduplicated,
            PipelineStage::Deduplicated => PipelineStage::FallbackCheck,
            PipelineStage::FallbackCheck => PipelineStage::Scored,
            PipelineStage::Scored => PipelineStage::SlotReserved,
            PipelineStage::SlotReserved => PipelineStage::Ranked,
            PipelineStage::Ranked => PipelineStage::Delivered,
            PipelineStage::Delivered => PipelineStage::Delivered,
        };
        tracing::debug!(stage = ?self.stage, "pipeline stage");
    }

    pub fn is_delivered(&self) -> bool {
        self.stage == PipelineStage::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_walk() {
        let mut tracker = StageTracker::new();
        assert_eq!(tracker.current(), PipelineStage::QueryBuilt);

        tracker.advance();
        assert_eq!(tracker.current(), PipelineStage::Dispatched);

        for _ in 0..7 {
            tracker.advance();
        }
        assert!(tracker.is_delivered());

        // Terminal stage holds
        tracker.advance();
        assert_eq!(tracker.current(), PipelineStage::Delivered);
    }
}
