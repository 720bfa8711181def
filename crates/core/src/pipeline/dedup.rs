//! # Deduplication
//!
//! Pairwise title-similarity filter over the full candidate set. Order
//! matters: the first-seen title wins, and that order is the fixed source
//! order, so results are deterministic for fixed inputs.

use crate::schemas::ProjectCandidate;

/// Titles more similar than this are considered the same project
pub const SIMILARITY_THRESHOLD: f64 = 0.75;

/// Case-insensitive similarity ratio in [0, 1]
pub fn title_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Drop candidates whose title is too similar to an already-kept one.
/// Candidates without a title are dropped outright.
pub fn dedupe_by_title(
    candidates: Vec<ProjectCandidate>,
    threshold: f64,
) -> Vec<ProjectCandidate> {
    let mut deduped: Vec<ProjectCandidate> = Vec::new();
    let mut seen_titles: Vec<String> = Vec::new();

    for candidate in candidates {
        if candidate.title.is_empty() {
            continue;
        }
        let is_dupe = seen_titles
            .iter()
            .any(|seen| title_similarity(&candidate.title, seen) > threshold);
        if !is_dupe {
            seen_titles.push(candidate.title.clone());
            deduped.push(candidate);
        }
    }

    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, platform: &str) -> ProjectCandidate {
        ProjectCandidate {
            title: title.to_string(),
            platform: platform.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_near_identical_titles_keep_first() {
        let candidates = vec![
            candidate("Turn Old Phone Into Security Camera", "YouTube"),
            candidate("Turn Old Phone into a Security Camera", "Reddit"),
        ];
        let deduped = dedupe_by_title(candidates, SIMILARITY_THRESHOLD);
        assert_eq!(deduped.len(), 1);
        // First-seen wins
        assert_eq!(deduped[0].platform, "YouTube");
    }

    #[test]
    fn test_distinct_titles_both_kept() {
        let a = "Turn Old Phone Into Security Camera";
        let b = "Build a Weather Station With ESP32";
        assert!(title_similarity(a, b) <= SIMILARITY_THRESHOLD);

        let deduped = dedupe_by_title(
            vec![candidate(a, "YouTube"), candidate(b, "Web")],
            SIMILARITY_THRESHOLD,
        );
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let candidates = vec![
            candidate("Headless Home Server", "GitHub"),
            candidate("Headless Home Server Setup", "Reddit"),
            candidate("Digital Photo Frame", "Web"),
            candidate("Pi-hole DNS Blocker", "GitHub"),
        ];
        let once = dedupe_by_title(candidates, SIMILARITY_THRESHOLD);
        let titles_once: Vec<String> = once.iter().map(|c| c.title.clone()).collect();
        let twice = dedupe_by_title(once, SIMILARITY_THRESHOLD);
        let titles_twice: Vec<String> = twice.iter().map(|c| c.title.clone()).collect();
        assert_eq!(titles_once, titles_twice);
    }

    #[test]
    fn test_untitled_candidates_dropped() {
        let deduped = dedupe_by_title(
            vec![candidate("", "Web"), candidate("Real Project", "Web")],
            SIMILARITY_THRESHOLD,
        );
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].title, "Real Project");
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        assert_eq!(title_similarity("PHONE SERVER", "phone server"), 1.0);
    }
}
