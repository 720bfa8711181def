//! Fixed LLM instruction templates bundled at compile time.
//!
//! Each generator pairs one of these system instructions with a
//! request-specific user prompt.

/// Second Life Hardware Architect - spec-aware creative build ideas
pub const CREATIVE_ARCHITECT: &str = include_str!("defaults/creative_architect.md");

/// Generic upcycling brainstorm - used only when scraping finds nothing
pub const FALLBACK_IDEAS: &str = include_str!("defaults/fallback_ideas.md");

/// Eco-Exchange Valuation Engine - condition grade, estimates, offers
pub const ECO_VALUATION: &str = include_str!("defaults/eco_valuation.md");

/// Image-based condition analysis
pub const VISION_CONDITION: &str = include_str!("defaults/vision_condition.md");

/// All templates with their slugs
pub fn all_templates() -> Vec<(&'static str, &'static str)> {
    vec![
        ("creative_architect", CREATIVE_ARCHITECT),
        ("fallback_ideas", FALLBACK_IDEAS),
        ("eco_valuation", ECO_VALUATION),
        ("vision_condition", VISION_CONDITION),
    ]
}
