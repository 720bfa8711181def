//! # Fallback Generator
//!
//! When every scraper comes back empty, this generator brainstorms
//! project ideas with step-by-step instructions so the user never sees an
//! empty result set just because the web search had a bad day.

use serde_json::Value;

use super::client::{ChatClient, ChatRequest};
use super::json::{coerce_project_array, str_field, str_list, strip_code_fences};
use super::prompts;
use crate::schemas::{DeviceContext, Mode, ProjectCandidate, ProjectType};

/// Generate 5-8 generic project ideas. Returns an empty list on any
/// provider or parse failure.
pub async fn generate_fallback_ideas(
    chat: &ChatClient,
    ctx: &DeviceContext,
) -> Vec<ProjectCandidate> {
    let reply = match chat
        .complete(ChatRequest {
            model: chat.model(),
            system: prompts::FALLBACK_IDEAS,
            user: Value::String(build_user_prompt(ctx)),
            temperature: 0.7,
            max_tokens: 4096,
        })
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("AI fallback generation failed: {:#}", e);
            return Vec::new();
        }
    };

    let ideas = normalize_reply(&reply);
    tracing::info!("AI fallback generated {} recommendations", ideas.len());
    ideas
}

fn build_user_prompt(ctx: &DeviceContext) -> String {
    let cond_text = if ctx.conditions.is_empty() {
        "no reported issues".to_string()
    } else {
        ctx.conditions.join(", ")
    };
    let notes_text = if ctx.condition_notes.is_empty() {
        String::new()
    } else {
        format!("\nUser's description of condition: {}\n", ctx.condition_notes)
    };
    let focus = match ctx.mode {
        Mode::TeardownHarvest => "Focus on teardown and component harvesting projects.",
        Mode::Standard => "Focus on software repurposing and creative reuse projects.",
    };

    format!(
        "Device: {device}\n\
         Conditions: {cond}\n\
         {notes}\
         Mode: {mode}\n\n\
         Generate creative second-life project ideas for this device. \
         Remember the device has these broken/damaged parts: {cond}. \
         All projects must work AROUND these limitations.\n\
         {focus}\n\
         Respond with a JSON array of project objects only.",
        device = ctx.device,
        cond = cond_text,
        notes = notes_text,
        mode = ctx.mode.label(),
        focus = focus,
    )
}

/// Map the reply JSON into candidate records. Entries without a title are
/// skipped silently.
pub(crate) fn normalize_reply(reply: &str) -> Vec<ProjectCandidate> {
    let text = strip_code_fences(reply);
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("AI fallback reply was not valid JSON: {}", e);
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

            // A missing type defaults to Software; an unrecognized label is
            // left unset so keyword classification decides later.
            let project_type = match p.get("type").and_then(|v| v.as_str()) {
                None => Some(ProjectType::Software),
                Some(label) => ProjectType::parse(label),
            };

            let reasoning = match str_field(&p, "reasoning") {
                s if s.is_empty() => {
                    "AI-generated recommendation based on device specs.".to_string()
                }
                s => s,
            };

            Some(ProjectCandidate {
                title,
                description: str_field(&p, "description"),
                source_url: String::new(),
                steps: str_list(&p, "steps"),
                required_parts: str_list(&p, "required_parts"),
                difficulty: p
                    .get("difficulty")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Intermediate")
                    .to_string(),
                platform: "AI Generated".to_string(),
                project_type,
                reasoning: Some(reasoning),
                feasibility_score: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_skips_untitled() {
        let reply = r#"[
            {"title": "Pi-hole Server", "type": "Software", "steps": ["a", "b"]},
            {"description": "no title here"},
            {"title": "Parts Harvest", "type": "Hardware Harvest"}
        ]"#;
        let ideas = normalize_reply(reply);
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].platform, "AI Generated");
        assert_eq!(ideas[0].project_type, Some(ProjectType::Software));
        assert_eq!(ideas[1].project_type, Some(ProjectType::HardwareHarvest));
    }

    #[test]
    fn test_normalize_type_defaults() {
        // Missing type -> Software; junk type -> unset (classified later)
        let ideas = normalize_reply(r#"[{"title": "A"}, {"title": "B", "type": "Gadget"}]"#);
        assert_eq!(ideas[0].project_type, Some(ProjectType::Software));
        assert_eq!(ideas[1].project_type, None);
    }

    #[test]
    fn test_normalize_fenced_object_reply() {
        let reply = "```json\n{\"projects\": [{\"title\": \"Photo Frame\"}]}\n```";
        let ideas = normalize_reply(reply);
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].difficulty, "Intermediate");
        assert!(ideas[0].source_url.is_empty());
    }

    #[test]
    fn test_normalize_garbage_reply() {
        assert!(normalize_reply("I could not produce JSON, sorry!").is_empty());
    }

    #[test]
    fn test_user_prompt_mentions_conditions_and_mode() {
        let ctx = DeviceContext {
            device: "Old Laptop".to_string(),
            conditions: vec!["Screen Broken".to_string()],
            mode: Mode::TeardownHarvest,
            device_type: "Laptop".to_string(),
            ram_gb: 4,
            storage_gb: 128,
            condition_notes: "hinge cracked".to_string(),
        };
        let prompt = build_user_prompt(&ctx);
        assert!(prompt.contains("Screen Broken"));
        assert!(prompt.contains("teardown and component harvesting"));
        assert!(prompt.contains("hinge cracked"));
    }
}
