//! # Classification & Scoring
//!
//! Resolves each candidate's project type, normalizes its difficulty, and
//! computes the 0-100 compatibility score. The condition-aware part of
//! the scorer is a declarative rule table: for every broken-component
//! flag, text matching the workaround language is boosted and text that
//! assumes the broken capability still works is penalized.

use crate::schemas::{Difficulty, DeviceContext, Mode, ProjectCandidate, ProjectType};

/// Starting score before any adjustment
const BASE_SCORE: i32 = 65;

/// One condition-aware scoring rule. Each delta applies at most once per
/// candidate, when any of its terms appears in the candidate text.
struct ConditionRule {
    flag: &'static str,
    boost_terms: &'static [&'static str],
    boost: i32,
    penalty_terms: &'static [&'static str],
    penalty: i32,
}

const CONDITION_RULES: &[ConditionRule] = &[
    ConditionRule {
        flag: "Screen Broken",
        boost_terms: &["headless", "no screen", "server"],
        boost: 12,
        penalty_terms: &["display", "screen", "mirror"],
        penalty: -10,
    },
    ConditionRule {
        flag: "Bad Battery",
        boost_terms: &["wall", "plugged", "usb power"],
        boost: 8,
        penalty_terms: &["portable", "battery powered"],
        penalty: -8,
    },
    ConditionRule {
        flag: "Touch Broken",
        boost_terms: &["adb", "headless", "sensor", "ssh"],
        boost: 10,
        penalty_terms: &["touchscreen", "touch interface"],
        penalty: -10,
    },
    ConditionRule {
        flag: "Camera Dead",
        boost_terms: &[],
        boost: 0,
        penalty_terms: &["camera", "security cam", "webcam"],
        penalty: -15,
    },
    ConditionRule {
        flag: "Speaker Broken",
        boost_terms: &[],
        boost: 0,
        penalty_terms: &["audio", "speaker", "music"],
        penalty: -10,
    },
];

const HARDWARE_KEYWORDS: &[&str] = &[
    "teardown",
    "harvest",
    "disassembly",
    "component",
    "extract",
    "motor",
    "battery",
    "camera module",
    "display panel",
    "pcb",
    "solder",
    "desolder",
    "ifixit",
];

const CREATIVE_KEYWORDS: &[&str] = &[
    "convert into",
    "transform into",
    "build into",
    "make into",
    "secondary display",
    "external monitor",
    "portable monitor",
    "diy perks",
    "conversion",
    "custom build",
    "repurpose into",
    "turned into",
    "made from",
    "built from",
    "transform",
];

fn candidate_text(candidate: &ProjectCandidate) -> String {
    format!("{} {}", candidate.title, candidate.description).to_lowercase()
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

/// Compatibility score for scraped candidates. AI creative builds carry
/// their own feasibility rating and never go through this.
pub fn score_candidate(candidate: &ProjectCandidate, ctx: &DeviceContext) -> u8 {
    let text = candidate_text(candidate);
    let mut score = BASE_SCORE;

    // The project talks about this exact device
    if text.contains(&ctx.device.to_lowercase()) {
        score += 10;
    }

    // Step-by-step richness
    if candidate.steps.len() >= 3 {
        score += 8;
    } else if !candidate.steps.is_empty() {
        score += 4;
    }

    if !candidate.required_parts.is_empty() {
        score += 3;
    }

    // Condition-aware adjustments
    for rule in CONDITION_RULES {
        if !ctx.has_condition(rule.flag) {
            continue;
        }
        if contains_any(&text, rule.boost_terms) {
            score += rule.boost;
        }
        if contains_any(&text, rule.penalty_terms) {
            score += rule.penalty;
        }
    }

    // Platform bonus: repos tend to have actionable code; video tutorials
    // with steps are very useful
    if candidate.platform == "GitHub" {
        score += 3;
    }
    if candidate.platform == "YouTube" && !candidate.steps.is_empty() {
        score += 5;
    }

    score.clamp(0, 100) as u8
}

/// Resolve Software vs Hardware Harvest vs Creative Build by keyword.
/// Only used when the candidate has no explicit type; the harvest
/// category needs harvest mode to be active.
pub fn classify_type(candidate: &ProjectCandidate, mode: Mode) -> ProjectType {
    let text = candidate_text(candidate);

    if mode == Mode::TeardownHarvest && contains_any(&text, HARDWARE_KEYWORDS) {
        return ProjectType::HardwareHarvest;
    }
    if contains_any(&text, CREATIVE_KEYWORDS) {
        return ProjectType::CreativeBuild;
    }
    ProjectType::Software
}

/// Collapse free-text difficulty into the three-level scale
pub fn normalize_difficulty(raw: &str) -> Difficulty {
    let raw = raw.trim().to_lowercase();
    if raw.contains("beginner") || raw.contains("easy") {
        return Difficulty::Beginner;
    }
    if raw.contains("expert") || raw.contains("hard") || raw.contains("advanced") {
        return Difficulty::Expert;
    }
    Difficulty::Intermediate
}
