//! # Revive Core
//!
//! The "Engine" of the DeviceRevive system - turns a broken-device
//! description into ranked second-life project recommendations plus a
//! trade-in valuation.
//!
//! ## Architecture
//!
//! - `search/` - isolated search-provider adapter (bounded worker pool)
//! - `scrape/` - the six source scrapers (YouTube, Reddit, GitHub, ...)
//! - `ai/` - LLM generators (creative builds, fallback ideas, valuation, vision)
//! - `pipeline/` - query formulation, fan-out orchestration, dedup, scoring
//! - `schemas` - request/response and recommendation types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use revive_core::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::new(search, chat, PipelineConfig::default());
//! let response = pipeline.run(&ctx).await;
//! ```

pub mod ai;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod schemas;
pub mod scrape;
pub mod search;
