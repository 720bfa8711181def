//! # Schemas
//!
//! Request/response types mirroring the external TypeScript schema
//! (camelCase on the wire) plus the internal candidate form that scraped
//! and AI-generated projects pass through before scoring.

use serde::{Deserialize, Serialize};

// === Request side ===

/// Operating mode requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Mode {
    /// Software repurposing and creative reuse
    #[default]
    Standard,
    /// Teardown and component harvesting
    #[serde(rename = "Teardown/Harvest")]
    TeardownHarvest,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Standard => "Standard",
            Mode::TeardownHarvest => "Teardown/Harvest",
        }
    }
}

// Unknown mode strings degrade to Standard instead of rejecting the request.
impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "Teardown/Harvest" => Mode::TeardownHarvest,
            _ => Mode::Standard,
        })
    }
}

/// Main scrape request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub device_name: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_device_type")]
    pub device_type: String,
    #[serde(default, rename = "ramGB")]
    pub ram_gb: u32,
    #[serde(default, rename = "storageGB")]
    pub storage_gb: u32,
    #[serde(default)]
    pub condition_notes: String,
}

fn default_device_type() -> String {
    "Smartphone".to_string()
}

/// Standalone valuation request (landing page; no scrape pipeline)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoValuationRequest {
    pub device_name: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub additional_notes: String,
    #[serde(default = "default_device_type")]
    pub device_type: String,
    #[serde(default, rename = "ramGB")]
    pub ram_gb: u32,
    #[serde(default, rename = "storageGB")]
    pub storage_gb: u32,
    /// Base64-encoded device images for AI vision analysis
    #[serde(default)]
    pub images: Vec<String>,
}

/// Everything the pipeline knows about the device. Read-only for the
/// lifetime of one request.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    pub device: String,
    pub conditions: Vec<String>,
    pub mode: Mode,
    pub device_type: String,
    pub ram_gb: u32,
    pub storage_gb: u32,
    pub condition_notes: String,
}

impl DeviceContext {
    pub fn has_condition(&self, flag: &str) -> bool {
        self.conditions.iter().any(|c| c == flag)
    }

    /// One-line summary for the response envelope
    pub fn summary(&self) -> String {
        let conditions = if self.conditions.is_empty() {
            "no reported issues".to_string()
        } else {
            self.conditions.join(", ")
        };
        format!(
            "{} with {} — Mode: {}",
            self.device,
            conditions,
            self.mode.label()
        )
    }
}

impl From<ScrapeRequest> for DeviceContext {
    fn from(req: ScrapeRequest) -> Self {
        Self {
            device: req.device_name,
            conditions: req.conditions,
            mode: req.mode,
            device_type: req.device_type,
            ram_gb: req.ram_gb,
            storage_gb: req.storage_gb,
            condition_notes: req.condition_notes,
        }
    }
}

// === Intermediate candidate form ===

/// Project category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    Software,
    #[serde(rename = "Hardware Harvest")]
    HardwareHarvest,
    #[serde(rename = "Creative Build")]
    CreativeBuild,
}

impl ProjectType {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::Software => "Software",
            ProjectType::HardwareHarvest => "Hardware Harvest",
            ProjectType::CreativeBuild => "Creative Build",
        }
    }

    /// Parse the wire label; anything else is "not an explicit type" and
    /// falls through to keyword classification.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Software" => Some(ProjectType::Software),
            "Hardware Harvest" => Some(ProjectType::HardwareHarvest),
            "Creative Build" => Some(ProjectType::CreativeBuild),
            _ => None,
        }
    }
}

/// Normalized difficulty rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

/// A project idea before classification and scoring.
///
/// External JSON (search hits, LLM replies) is mapped into this type at
/// the source boundary; records with an empty title are dropped there.
#[derive(Debug, Clone, Default)]
pub struct ProjectCandidate {
    pub title: String,
    pub description: String,
    /// Empty for AI-generated ideas
    pub source_url: String,
    pub steps: Vec<String>,
    pub required_parts: Vec<String>,
    /// Free text; normalized during scoring
    pub difficulty: String,
    /// Provenance label ("YouTube", "Reddit", ..., "AI Generated")
    pub platform: String,
    /// Explicit category, when the source already knows it
    pub project_type: Option<ProjectType>,
    pub reasoning: Option<String>,
    /// 1-10 rating, AI creative builds only
    pub feasibility_score: Option<f64>,
}

impl ProjectCandidate {
    /// AI creative builds carry their own feasibility-based score and skip
    /// the generic condition scorer.
    pub fn is_ai_creative(&self) -> bool {
        self.platform == "AI Generated" && self.project_type == Some(ProjectType::CreativeBuild)
    }
}

// === Response side ===

/// One step of a recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepByStepInstruction {
    pub step_number: u32,
    pub description: String,
}

/// A scored, ranked project idea in the response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecommendation {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub description: String,
    pub difficulty: Difficulty,
    pub compatibility_score: u8,
    pub reasoning: String,
    pub required_parts: Vec<String>,
    pub source_url: String,
    pub steps: Vec<StepByStepInstruction>,
    pub platform: String,
}

/// One line of the pipeline's activity narration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtLogEntry {
    /// Epoch milliseconds
    pub timestamp: i64,
    pub message: String,
}

impl ThoughtLogEntry {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp_millis(),
            message: message.into(),
        }
    }
}

/// A single retail partner trade-in offer
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TradeInOffer {
    pub partner: String,
    pub offer_type: String,
    pub headline: String,
    pub monetary_value_cap: String,
    pub coupon_url: String,
    pub reasoning: String,
}

/// Device valuation headline figures
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSummary {
    pub device_name: String,
    /// A-F
    pub condition_grade: String,
    pub estimated_resale_usd: f64,
    #[serde(default)]
    pub estimated_resale_inr: f64,
    pub estimated_scrap_cash_usd: f64,
    #[serde(default)]
    pub estimated_scrap_cash_inr: f64,
    pub eco_message: String,
}

/// Valuation plus partner offers. Regenerated per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EcoValuation {
    pub valuation_summary: ValuationSummary,
    pub trade_in_offers: Vec<TradeInOffer>,
}

/// The full response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub thoughts: Vec<ThoughtLogEntry>,
    pub recommendations: Vec<ProjectRecommendation>,
    pub search_queries: Vec<String>,
    pub device_summary: String,
    #[serde(default)]
    pub disassembly_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eco_valuation: Option<EcoValuation>,
}

/// Generate an opaque 8-hex-char recommendation id (not cryptographic)
pub fn short_id() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos() as u64;
    let salt = RandomState::new().build_hasher().finish();
    format!("{:08x}", (nanos ^ salt) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: ScrapeRequest =
            serde_json::from_str(r#"{"deviceName": "Old Android Phone"}"#).unwrap();
        assert_eq!(req.device_name, "Old Android Phone");
        assert_eq!(req.mode, Mode::Standard);
        assert_eq!(req.device_type, "Smartphone");
        assert!(req.conditions.is_empty());
        assert_eq!(req.ram_gb, 0);
    }

    #[test]
    fn test_mode_parsing() {
        let req: ScrapeRequest =
            serde_json::from_str(r#"{"deviceName": "x", "mode": "Teardown/Harvest"}"#).unwrap();
        assert_eq!(req.mode, Mode::TeardownHarvest);

        // Unknown modes fall back to Standard
        let req: ScrapeRequest =
            serde_json::from_str(r#"{"deviceName": "x", "mode": "Whatever"}"#).unwrap();
        assert_eq!(req.mode, Mode::Standard);
    }

    #[test]
    fn test_device_summary() {
        let ctx = DeviceContext {
            device: "Pixel 4".to_string(),
            conditions: vec!["Screen Broken".to_string(), "Bad Battery".to_string()],
            mode: Mode::Standard,
            device_type: "Smartphone".to_string(),
            ram_gb: 6,
            storage_gb: 64,
            condition_notes: String::new(),
        };
        let summary = ctx.summary();
        assert!(summary.contains("Pixel 4"));
        assert!(summary.contains("Screen Broken, Bad Battery"));
        assert!(summary.contains("Standard"));
    }

    #[test]
    fn test_project_type_labels() {
        assert_eq!(ProjectType::parse("Hardware Harvest"), Some(ProjectType::HardwareHarvest));
        assert_eq!(ProjectType::parse("nonsense"), None);
        assert_eq!(ProjectType::CreativeBuild.label(), "Creative Build");
    }

    #[test]
    fn test_recommendation_wire_format() {
        let rec = ProjectRecommendation {
            id: short_id(),
            title: "Headless Home Server".to_string(),
            project_type: ProjectType::Software,
            description: String::new(),
            difficulty: Difficulty::Intermediate,
            compatibility_score: 87,
            reasoning: String::new(),
            required_parts: vec![],
            source_url: String::new(),
            steps: vec![StepByStepInstruction {
                step_number: 1,
                description: "Install a minimal Linux".to_string(),
            }],
            platform: "GitHub".to_string(),
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"compatibilityScore\":87"));
        assert!(json.contains("\"type\":\"Software\""));
        assert!(json.contains("\"stepNumber\":1"));
        assert!(json.contains("\"sourceUrl\""));
    }

    #[test]
    fn test_short_id_shape() {
        let id = short_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ai_creative_detection() {
        let candidate = ProjectCandidate {
            title: "Desk Lamp From Backlight".to_string(),
            platform: "AI Generated".to_string(),
            project_type: Some(ProjectType::CreativeBuild),
            ..Default::default()
        };
        assert!(candidate.is_ai_creative());

        let candidate = ProjectCandidate {
            platform: "AI Generated".to_string(),
            project_type: Some(ProjectType::Software),
            ..Default::default()
        };
        assert!(!candidate.is_ai_creative());
    }
}
