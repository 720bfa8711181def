//! Maker-tutorial scraper - Instructables, Hackaday and iFixit in one pass.

use async_trait::async_trait;

use super::{ScrapeHaul, Scraper, MAX_QUERIES_PER_SOURCE};
use crate::schemas::ThoughtLogEntry;
use crate::search::{hits_to_candidates, SearchAdapter};

const MAKER_SITES: [&str; 3] = ["instructables.com", "hackaday.com", "ifixit.com"];

pub struct MakerScraper {
    /// Results per site per query; three sites are searched, so this stays
    /// smaller than the single-domain scrapers' cap
    pub per_site_results: usize,
}

impl Default for MakerScraper {
    fn default() -> Self {
        Self { per_site_results: 3 }
    }
}

#[async_trait]
impl Scraper for MakerScraper {
    fn platform(&self) -> &'static str {
        "Instructables"
    }

    async fn scrape(
        &self,
        search: &SearchAdapter,
        queries: &[String],
        _device: &str,
        _conditions: &[String],
    ) -> ScrapeHaul {
        let mut haul = ScrapeHaul::default();

        for query in queries.iter().take(MAX_QUERIES_PER_SOURCE) {
            haul.thoughts
                .push(ThoughtLogEntry::now(format!("[Maker Sites] Searching: {}", query)));
            for site in MAKER_SITES {
                let hits = search.search(query, self.per_site_results, Some(site), None).await;
                haul.candidates
                    .extend(hits_to_candidates(hits, self.platform()));
            }
            haul.thoughts.push(ThoughtLogEntry::now(format!(
                "[Maker Sites] Found {} results",
                haul.candidates.len()
            )));
        }

        haul
    }
}
