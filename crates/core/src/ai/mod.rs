//! # AI Generators
//!
//! One LLM call each, all failure-tolerant: a generator that cannot reach
//! the provider or cannot parse the reply returns an empty result (or
//! `None`), logs why, and the request carries on without it.
//!
//! - `creative` - spec-aware "Second Life Hardware Architect" build ideas
//! - `fallback` - generic project ideas when scraping finds nothing
//! - `valuation` - the Eco-Exchange trade-in valuation engine
//! - `vision` - optional image-based condition analysis

pub mod client;
pub mod creative;
pub mod fallback;
pub mod json;
pub mod prompts;
pub mod valuation;
pub mod vision;

pub use client::{ChatClient, ChatRequest};
