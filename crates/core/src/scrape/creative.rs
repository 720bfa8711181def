//! Creative Builds scraper - unique DIY conversion projects.
//!
//! Searches for projects that transform a broken/old device into
//! something entirely new: external monitors from laptop screens, home
//! servers from old phones, custom Bluetooth speakers. Results are tagged
//! Creative Build and re-attributed to the platform their URL points at.

use async_trait::async_trait;

use super::{ScrapeHaul, Scraper};
use crate::schemas::{ProjectType, ThoughtLogEntry};
use crate::search::{hits_to_candidates, SearchAdapter};

/// Creative queries are broader, so this scraper takes one more than the
/// other sources
const MAX_CREATIVE_QUERIES: usize = 4;

pub struct CreativeScraper {
    pub max_results: usize,
}

impl Default for CreativeScraper {
    fn default() -> Self {
        Self { max_results: 5 }
    }
}

/// Re-attribute a hit to the platform its URL points at
fn detect_platform(url: &str) -> Option<&'static str> {
    let url = url.to_lowercase();
    if url.contains("youtube.com") || url.contains("youtu.be") {
        Some("YouTube")
    } else if url.contains("reddit.com") {
        Some("Reddit")
    } else if url.contains("instructables.com") {
        Some("Instructables")
    } else if url.contains("hackaday") {
        Some("Hackaday")
    } else if url.contains("ifixit.com") {
        Some("iFixit")
    } else {
        None
    }
}

#[async_trait]
impl Scraper for CreativeScraper {
    fn platform(&self) -> &'static str {
        "Creative"
    }

    async fn scrape(
        &self,
        search: &SearchAdapter,
        queries: &[String],
        _device: &str,
        _conditions: &[String],
    ) -> ScrapeHaul {
        let mut haul = ScrapeHaul::default();

        for query in queries.iter().take(MAX_CREATIVE_QUERIES) {
            haul.thoughts
                .push(ThoughtLogEntry::now(format!("[Creative Builds] Searching: {}", query)));
            let hits = search.search(query, self.max_results, None, None).await;
            let mut found = hits_to_candidates(hits, "Web");

            for candidate in &mut found {
                candidate.project_type = Some(ProjectType::CreativeBuild);
                if let Some(platform) = detect_platform(&candidate.source_url) {
                    candidate.platform = platform.to_string();
                }
            }

            haul.thoughts.push(ThoughtLogEntry::now(format!(
                "[Creative Builds] Found {} results",
                found.len()
            )));
            haul.candidates.extend(found);
        }

        haul
    }
}
