//! # Query Formulator
//!
//! Pure function mapping the device context into per-platform search
//! queries. Each condition flag biases the queries toward projects that
//! survive that broken component (a dead screen pushes toward headless
//! builds, a dead battery toward wall-powered ones). Emits one thought
//! per decision for the UI narration; nothing here does I/O.

use crate::schemas::{DeviceContext, Mode, ThoughtLogEntry};

/// Per-platform query lists plus the formulation narration
#[derive(Debug, Default, Clone)]
pub struct QueryPlan {
    pub youtube: Vec<String>,
    pub reddit: Vec<String>,
    pub github: Vec<String>,
    pub instructables: Vec<String>,
    pub general: Vec<String>,
    pub creative: Vec<String>,
    pub thoughts: Vec<ThoughtLogEntry>,
}

impl QueryPlan {
    /// Queries assigned to a scraper's platform label. Unknown labels get
    /// the general list.
    pub fn for_platform(&self, platform: &str) -> &[String] {
        match platform {
            "YouTube" => &self.youtube,
            "Reddit" => &self.reddit,
            "GitHub" => &self.github,
            "Instructables" => &self.instructables,
            "Creative" => &self.creative,
            _ => &self.general,
        }
    }

    /// All queries in fixed platform order, for the response envelope
    pub fn flatten(&self) -> Vec<String> {
        [
            &self.youtube,
            &self.reddit,
            &self.github,
            &self.instructables,
            &self.general,
            &self.creative,
        ]
        .iter()
        .flat_map(|qs| qs.iter().cloned())
        .collect()
    }

    pub fn total(&self) -> usize {
        self.youtube.len()
            + self.reddit.len()
            + self.github.len()
            + self.instructables.len()
            + self.general.len()
            + self.creative.len()
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Build the per-platform query lists for this device
pub fn formulate(ctx: &DeviceContext) -> QueryPlan {
    let mut plan = QueryPlan::default();
    let device = ctx.device.as_str();

    plan.thoughts
        .push(ThoughtLogEntry::now(format!("Analyzing {} specs...", device)));

    // Condition-specific queries

    if ctx.has_condition("Screen Broken") {
        plan.thoughts.push(ThoughtLogEntry::now(
            "Detected 'Broken Screen'. Filtering out Smart Mirrors...",
        ));
        plan.youtube
            .push(format!("{} headless project no screen needed tutorial", device));
        plan.reddit
            .push(format!("{} headless server project broken screen", device));
        plan.github.push("headless android server project".to_string());
        plan.general
            .push(format!("{} headless android projects server -screen", device));
    }

    if ctx.has_condition("Bad Battery") {
        plan.thoughts.push(ThoughtLogEntry::now(
            "Battery is dead. Searching for wall-powered / always-plugged projects...",
        ));
        plan.youtube
            .push(format!("{} wall powered always plugged project tutorial", device));
        plan.reddit
            .push("old phone no battery wall power server project".to_string());
        plan.general
            .push(format!("{} wall powered project always plugged in server", device));
    }

    if ctx.has_condition("Touch Broken") {
        plan.thoughts.push(ThoughtLogEntry::now(
            "Touch digitizer broken. Looking for ADB-controlled or sensor-only projects...",
        ));
        plan.youtube
            .push(format!("{} broken touch ADB control project", device));
        plan.reddit
            .push("android phone broken touch ADB project automation".to_string());
        plan.general
            .push(format!("{} no touch sensor station automation", device));
    }

    if ctx.has_condition("Camera Dead") {
        plan.thoughts.push(ThoughtLogEntry::now(
            "Camera module dead. Excluding security-cam projects, keeping audio/server...",
        ));
        plan.reddit
            .push("old android phone project no camera needed server".to_string());
        plan.general
            .push("old android phone project no camera needed".to_string());
    }

    if ctx.has_condition("Speaker Broken") {
        plan.thoughts.push(ThoughtLogEntry::now(
            "Speaker broken. Focusing on silent/display-only projects...",
        ));
        plan.general
            .push("old android phone silent display dashboard project".to_string());
    }

    if ctx.has_condition("No Charging Port") {
        plan.thoughts.push(ThoughtLogEntry::now(
            "Charging port broken. Looking for wireless-charging setups or parts harvest...",
        ));
        plan.youtube
            .push(format!("{} wireless charging mod project", device));
        plan.general
            .push(format!("{} wireless charging mod DIY", device));
    }

    // Creative Build queries (DIY Perks style)

    plan.creative
        .push(format!("DIY Perks style {} creative project build conversion", device));
    plan.creative
        .push(format!("broken {} convert into unique project DIY build", device));
    if ctx.has_condition("Screen Broken") {
        plan.creative
            .push("broken laptop screen portable external monitor build DIY".to_string());
    } else if ctx.has_condition("Bad Battery") {
        plan.creative
            .push(format!("{} no battery wall powered creative station build", device));
    } else {
        plan.creative
            .push(format!("old {} creative conversion mod project unique", device));
    }

    // Default queries if nothing condition-specific landed on the core platforms

    if plan.youtube.is_empty()
        && plan.reddit.is_empty()
        && plan.github.is_empty()
        && plan.instructables.is_empty()
        && plan.general.is_empty()
    {
        plan.youtube
            .push(format!("{} repurpose upcycle project tutorial 2024", device));
        plan.reddit
            .push(format!("{} second life repurpose DIY project", device));
        plan.github.push(format!("{} repurpose project", device));
        plan.general
            .push(format!("{} repurpose upcycle project ideas 2024", device));
    }

    // Condition notes - user free-text description

    let notes = ctx.condition_notes.trim();
    if !notes.is_empty() {
        let shown = truncate_chars(notes, 80);
        let ellipsis = if notes.chars().count() > 80 { "..." } else { "" };
        plan.thoughts.push(ThoughtLogEntry::now(format!(
            "User described condition: \"{}{}\". Adding targeted queries...",
            shown, ellipsis
        )));
        let short = truncate_chars(notes, 60);
        plan.general
            .push(format!("{} {} repurpose project", device, short));
        plan.youtube
            .push(format!("{} {} DIY fix reuse tutorial", device, short));
        plan.general
            .push(format!("{} second life DIY project github", device));
    }

    // Harvest / teardown mode

    if ctx.mode == Mode::TeardownHarvest {
        plan.thoughts.push(ThoughtLogEntry::now(format!(
            "Harvest mode enabled. Searching for {} teardown & component pinouts...",
            device
        )));
        plan.youtube
            .push(format!("{} teardown disassembly tutorial", device));
        plan.reddit
            .push(format!("{} teardown parts harvest reuse", device));
        plan.github
            .push("smartphone component harvesting arduino".to_string());
        plan.instructables
            .push(format!("{} teardown parts harvest", device));
        plan.instructables
            .push(format!("{} ifixit teardown components reuse", device));
        plan.general
            .push(format!("{} teardown parts list pinout", device));
    }

    plan.thoughts.push(ThoughtLogEntry::now(format!(
        "Formulated {} search queries across 6 platforms. Initiating web search...",
        plan.total()
    )));

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(conditions: &[&str], mode: Mode, notes: &str) -> DeviceContext {
        DeviceContext {
            device: "Old Android Phone".to_string(),
            conditions: conditions.iter().map(|s| s.to_string()).collect(),
            mode,
            device_type: "Smartphone".to_string(),
            ram_gb: 0,
            storage_gb: 0,
            condition_notes: notes.to_string(),
        }
    }

    #[test]
    fn test_broken_screen_and_battery_queries() {
        let plan = formulate(&ctx(&["Screen Broken", "Bad Battery"], Mode::Standard, ""));
        let all = plan.flatten();
        assert!(all.iter().any(|q| q.contains("headless")));
        assert!(all.iter().any(|q| q.contains("wall powered")));
    }

    #[test]
    fn test_no_conditions_injects_default_queries() {
        let plan = formulate(&ctx(&[], Mode::Standard, ""));
        assert!(!plan.youtube.is_empty());
        assert!(!plan.reddit.is_empty());
        assert!(!plan.github.is_empty());
        assert!(!plan.general.is_empty());
        assert!(plan.general.iter().any(|q| q.contains("repurpose upcycle")));
        // The creative seed is always present
        assert!(plan.creative.len() >= 3);
    }

    #[test]
    fn test_harvest_mode_adds_teardown_queries() {
        let plan = formulate(&ctx(&[], Mode::TeardownHarvest, ""));
        assert_eq!(plan.instructables.len(), 2);
        assert!(plan.instructables[0].contains("teardown"));
        assert!(plan.general.iter().any(|q| q.contains("pinout")));
    }

    #[test]
    fn test_condition_notes_add_targeted_queries() {
        let plan = formulate(&ctx(&[], Mode::Standard, "water damage on the charging board"));
        assert!(plan
            .general
            .iter()
            .any(|q| q.contains("water damage on the charging board")));
        assert!(plan
            .thoughts
            .iter()
            .any(|t| t.message.contains("User described condition")));
    }

    #[test]
    fn test_deterministic_for_fixed_input() {
        let a = formulate(&ctx(&["Screen Broken"], Mode::Standard, ""));
        let b = formulate(&ctx(&["Screen Broken"], Mode::Standard, ""));
        assert_eq!(a.flatten(), b.flatten());
    }

    #[test]
    fn test_flatten_counts_everything() {
        let plan = formulate(&ctx(&["Screen Broken"], Mode::TeardownHarvest, ""));
        assert_eq!(plan.flatten().len(), plan.total());
    }

    #[test]
    fn test_platform_lookup_falls_back_to_general() {
        let plan = formulate(&ctx(&["Screen Broken"], Mode::Standard, ""));
        assert_eq!(plan.for_platform("Web"), &plan.general[..]);
        assert_eq!(plan.for_platform("Something Else"), &plan.general[..]);
        assert_eq!(plan.for_platform("YouTube"), &plan.youtube[..]);
    }
}
