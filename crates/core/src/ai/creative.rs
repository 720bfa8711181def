//! # Creative Builds Generator
//!
//! The "Second Life Hardware Architect": spec-aware project ideas built
//! from the device type, the broken-component flags and the remaining
//! RAM/storage. Always attempted in parallel with scraping; its output
//! carries a 1-10 feasibility rating that later replaces the generic
//! compatibility scorer.

use serde_json::Value;

use super::client::{ChatClient, ChatRequest};
use super::json::{coerce_project_array, str_field, str_list, strip_code_fences};
use super::prompts;
use crate::schemas::{DeviceContext, ProjectCandidate, ProjectType};

/// Component names a condition flag maps onto
const BROKEN_MAP: [(&str, &str); 6] = [
    ("Screen Broken", "Screen"),
    ("Touch Broken", "Touch Digitizer"),
    ("Bad Battery", "Battery"),
    ("Camera Dead", "Camera"),
    ("Speaker Broken", "Speaker"),
    ("No Charging Port", "Charging Port"),
];

/// Everything a device of this class could have, sorted for stable prompts
const ALL_COMPONENTS: [&str; 11] = [
    "Accelerometer",
    "Battery",
    "Bluetooth",
    "Camera",
    "Charging Port",
    "GPS",
    "Gyroscope",
    "Screen",
    "Speaker",
    "Touch Digitizer",
    "WiFi",
];

/// Generate 4-6 spec-aware creative build ideas. Empty list on failure.
pub async fn generate_creative_builds(
    chat: &ChatClient,
    ctx: &DeviceContext,
) -> Vec<ProjectCandidate> {
    let reply = match chat
        .complete(ChatRequest {
            model: chat.model(),
            system: prompts::CREATIVE_ARCHITECT,
            user: Value::String(build_user_prompt(ctx)),
            temperature: 0.7,
            max_tokens: 4096,
        })
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Creative AI generation failed: {:#}", e);
            return Vec::new();
        }
    };

    let ideas = normalize_reply(&reply);
    tracing::info!("Creative AI generated {} project ideas", ideas.len());
    ideas
}

/// Work out which components still function given the condition flags
pub(crate) fn working_components(conditions: &[String]) -> Vec<&'static str> {
    let broken: Vec<&str> = BROKEN_MAP
        .iter()
        .filter(|(flag, _)| conditions.iter().any(|c| c == flag))
        .map(|(_, part)| *part)
        .collect();
    ALL_COMPONENTS
        .iter()
        .copied()
        .filter(|part| !broken.contains(part))
        .collect()
}

fn build_user_prompt(ctx: &DeviceContext) -> String {
    let cond_text = if ctx.conditions.is_empty() {
        "All components working".to_string()
    } else {
        ctx.conditions.join(", ")
    };
    let ram = if ctx.ram_gb > 0 {
        format!("{}GB", ctx.ram_gb)
    } else {
        "Unknown".to_string()
    };
    let storage = if ctx.storage_gb > 0 {
        format!("{}GB", ctx.storage_gb)
    } else {
        "Unknown".to_string()
    };

    format!(
        "Device: {device}\n\
         Device Type: {device_type}\n\
         RAM: {ram}\n\
         Storage: {storage}\n\
         Broken Components: {cond}\n\
         Working Components: {working}\n\n\
         Generate creative second-life project ideas for this {device_class}. \
         Remember: {cond} — all projects must work AROUND these limitations. \
         Only use the working components listed above.\n\
         Respond with a JSON array of project objects only.",
        device = ctx.device,
        device_type = ctx.device_type,
        ram = ram,
        storage = storage,
        cond = cond_text,
        working = working_components(&ctx.conditions).join(", "),
        device_class = ctx.device_type.to_lowercase(),
    )
}

/// Map the architect's reply into candidate records tagged AI Generated /
/// Creative Build and carrying the feasibility rating.
pub(crate) fn normalize_reply(reply: &str) -> Vec<ProjectCandidate> {
    let text = strip_code_fences(reply);
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Creative AI reply was not valid JSON: {}", e);
            return Vec::new();
        }
    };

    coerce_project_array(value)
        .into_iter()
        .filter_map(|p| {
            let title = str_field(&p, "title");
            if title.is_empty() {
                return None;
            }

            // Missing rating defaults to 7; a non-numeric one stays unset
            // and the scorer falls back to its neutral value.
            let feasibility_score = match p.get("feasibility_score") {
                None => Some(7.0),
                Some(v) => v.as_f64(),
            };

            let mut required_parts = str_list(&p, "required_software");
            let hw_fix = str_field(&p, "hardware_fix_needed");
            if !hw_fix.is_empty() && !hw_fix.eq_ignore_ascii_case("none") {
                required_parts.push(format!("Hardware: {}", hw_fix));
            }

            let reasoning = format!(
                "{} (Feasibility: {}/10) — AI-generated recommendation tailored to your device's specs and condition.",
                str_field(&p, "use_case"),
                feasibility_display(p.get("feasibility_score")),
            );

            Some(ProjectCandidate {
                title,
                description: str_field(&p, "description"),
                source_url: String::new(),
                steps: str_list(&p, "steps"),
                required_parts,
                difficulty: p
                    .get("difficulty")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Intermediate")
                    .to_string(),
                platform: "AI Generated".to_string(),
                project_type: Some(ProjectType::CreativeBuild),
                reasoning: Some(reasoning),
                feasibility_score,
            })
        })
        .collect()
}

fn feasibility_display(raw: Option<&Value>) -> String {
    match raw {
        None => "7".to_string(),
        Some(Value::Number(n)) => {
            let f = n.as_f64().unwrap_or(7.0);
            if f.fract() == 0.0 {
                format!("{}", f as i64)
            } else {
                format!("{}", f)
            }
        }
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::Mode;

    fn ctx(conditions: &[&str]) -> DeviceContext {
        DeviceContext {
            device: "Galaxy S9".to_string(),
            conditions: conditions.iter().map(|s| s.to_string()).collect(),
            mode: Mode::Standard,
            device_type: "Smartphone".to_string(),
            ram_gb: 4,
            storage_gb: 64,
            condition_notes: String::new(),
        }
    }

    #[test]
    fn test_working_components_excludes_broken() {
        let working = working_components(&ctx(&["Screen Broken", "Bad Battery"]).conditions);
        assert!(!working.contains(&"Screen"));
        assert!(!working.contains(&"Battery"));
        assert!(working.contains(&"WiFi"));
        assert!(working.contains(&"Camera"));
    }

    #[test]
    fn test_user_prompt_lists_specs() {
        let prompt = build_user_prompt(&ctx(&["Screen Broken"]));
        assert!(prompt.contains("RAM: 4GB"));
        assert!(prompt.contains("Storage: 64GB"));
        assert!(prompt.contains("Broken Components: Screen Broken"));
        assert!(prompt.contains("Working Components:"));
    }

    #[test]
    fn test_normalize_carries_feasibility() {
        let reply = r#"[{
            "title": "Headless Media Server",
            "difficulty": "Intermediate",
            "feasibility_score": 9,
            "use_case": "Stream music around the house",
            "description": "Run a tiny media server over WiFi.",
            "required_software": ["Termux", "Navidrome"],
            "hardware_fix_needed": "None",
            "steps": ["Install Termux", "Install Navidrome", "Point clients at it"]
        }]"#;
        let ideas = normalize_reply(reply);
        assert_eq!(ideas.len(), 1);
        let idea = &ideas[0];
        assert!(idea.is_ai_creative());
        assert_eq!(idea.feasibility_score, Some(9.0));
        assert_eq!(idea.required_parts, vec!["Termux", "Navidrome"]);
        assert!(idea.reasoning.as_deref().unwrap().contains("Feasibility: 9/10"));
    }

    #[test]
    fn test_normalize_hardware_fix_appended() {
        let reply = r#"[{
            "title": "Wall Dashboard",
            "feasibility_score": 8,
            "required_software": ["DAKboard"],
            "hardware_fix_needed": "Replace charging cable"
        }]"#;
        let ideas = normalize_reply(reply);
        assert_eq!(
            ideas[0].required_parts,
            vec!["DAKboard", "Hardware: Replace charging cable"]
        );
    }

    #[test]
    fn test_normalize_feasibility_defaults() {
        let ideas = normalize_reply(r#"[{"title": "A"}, {"title": "B", "feasibility_score": "high"}]"#);
        assert_eq!(ideas[0].feasibility_score, Some(7.0));
        assert_eq!(ideas[1].feasibility_score, None);
    }
}
