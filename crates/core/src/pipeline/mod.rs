//! # Aggregation Pipeline
//!
//! The core state machine: formulate queries, fan out to every scraper
//! and AI generator concurrently, collect whatever survived, deduplicate,
//! classify, score, reserve slots for AI creative builds, rank, deliver.
//!
//! ```text
//! QueryBuilt -> Dispatched -> Collected -> Deduplicated -> FallbackCheck
//!            -> Scored -> SlotReserved -> Ranked -> Delivered
//! ```

pub mod dedup;
pub mod orchestrator;
pub mod queries;
pub mod score;
pub mod stage;

pub use dedup::{dedupe_by_title, title_similarity, SIMILARITY_THRESHOLD};
pub use orchestrator::Pipeline;
pub use queries::{formulate, QueryPlan};
pub use score::{classify_type, normalize_difficulty, score_candidate};
pub use stage::{PipelineStage, StageTracker};
