//! # Vision Condition Analysis
//!
//! Optional: up to 3 device photos are run through the vision model to
//! extract a condition report. The report only ever adds free-text signal
//! to the valuation prompt; any failure here degrades to "no visual
//! signal" without blocking the valuation.

use serde::Deserialize;
use serde_json::{json, Value};

use super::client::{ChatClient, ChatRequest};
use super::json::strip_code_fences;
use super::prompts;

/// Token-limit guard; extra images are silently ignored
const MAX_IMAGES: usize = 3;

/// What the vision model saw
#[derive(Debug, Clone, Deserialize)]
pub struct VisionReport {
    #[serde(default)]
    pub visual_condition_summary: String,
    #[serde(default)]
    pub detected_issues: Vec<String>,
    #[serde(default)]
    pub cosmetic_grade: String,
    #[serde(default)]
    pub confidence: String,
}

impl VisionReport {
    /// Fold the report into free text for the valuation prompt
    pub fn as_notes(&self) -> String {
        let mut notes = format!("Visual inspection: {}", self.visual_condition_summary);
        if !self.detected_issues.is_empty() {
            notes.push_str(&format!(" Detected issues: {}.", self.detected_issues.join(", ")));
        }
        if !self.cosmetic_grade.is_empty() {
            notes.push_str(&format!(" Cosmetic grade: {}.", self.cosmetic_grade));
        }
        notes
    }
}

/// Analyze base64-encoded device images. `None` when there are no images,
/// the provider is unreachable, or the reply cannot be parsed.
pub async fn analyze_device_images(
    chat: &ChatClient,
    images_base64: &[String],
    device_name: &str,
) -> Option<VisionReport> {
    if images_base64.is_empty() {
        return None;
    }

    let reply = match chat
        .complete(ChatRequest {
            model: chat.vision_model(),
            system: prompts::VISION_CONDITION,
            user: build_content_parts(images_base64, device_name),
            temperature: 0.3,
            max_tokens: 1024,
        })
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Vision analysis failed: {:#}", e);
            return None;
        }
    };

    let report: VisionReport = match serde_json::from_str(strip_code_fences(&reply)) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("Vision reply was not valid JSON: {}", e);
            return None;
        }
    };

    tracing::info!(
        "Vision analysis: grade={}, issues={}, confidence={}",
        report.cosmetic_grade,
        report.detected_issues.len(),
        report.confidence,
    );
    Some(report)
}

/// Build the multimodal user content: one text part plus the image parts
fn build_content_parts(images_base64: &[String], device_name: &str) -> Value {
    let mut parts: Vec<Value> = Vec::new();

    let intro = if device_name.is_empty() {
        "Analyze this device's physical condition from the image(s).".to_string()
    } else {
        format!(
            "This is a {}. Analyze its physical condition from the image(s).",
            device_name
        )
    };
    parts.push(json!({"type": "text", "text": intro}));

    for image in images_base64.iter().take(MAX_IMAGES) {
        // Accept raw base64 or full data URLs
        let data = image.rsplit_once(',').map_or(image.as_str(), |(prefix, rest)| {
            if prefix.starts_with("data:") {
                rest
            } else {
                image.as_str()
            }
        });
        parts.push(json!({
            "type": "image_url",
            "image_url": {"url": format!("data:image/jpeg;base64,{}", data)},
        }));
    }

    Value::Array(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_parts_cap_and_prefix_strip() {
        let images = vec![
            "AAAA".to_string(),
            "data:image/png;base64,BBBB".to_string(),
            "CCCC".to_string(),
            "DDDD".to_string(),
        ];
        let parts = build_content_parts(&images, "Pixel 4");
        let parts = parts.as_array().unwrap();

        // 1 text part + 3 image parts (cap applied)
        assert_eq!(parts.len(), 4);
        assert!(parts[0]["text"].as_str().unwrap().contains("Pixel 4"));
        assert_eq!(
            parts[2]["image_url"]["url"].as_str().unwrap(),
            "data:image/jpeg;base64,BBBB"
        );
    }

    #[test]
    fn test_report_as_notes() {
        let report = VisionReport {
            visual_condition_summary: "Cracked glass, intact frame.".to_string(),
            detected_issues: vec!["cracked screen".to_string(), "scuffed corner".to_string()],
            cosmetic_grade: "Poor".to_string(),
            confidence: "High".to_string(),
        };
        let notes = report.as_notes();
        assert!(notes.contains("Cracked glass"));
        assert!(notes.contains("cracked screen, scuffed corner"));
        assert!(notes.contains("Poor"));
    }

    #[test]
    fn test_report_parses_with_defaults() {
        let report: VisionReport = serde_json::from_str(r#"{"cosmetic_grade": "Fair"}"#).unwrap();
        assert_eq!(report.cosmetic_grade, "Fair");
        assert!(report.detected_issues.is_empty());
    }
}
