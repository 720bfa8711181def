//! General web scraper - unrestricted search for everything the
//! domain-specific scrapers miss.

use async_trait::async_trait;

use super::{ScrapeHaul, Scraper, MAX_QUERIES_PER_SOURCE};
use crate::schemas::ThoughtLogEntry;
use crate::search::{hits_to_candidates, SearchAdapter};

pub struct GeneralScraper {
    pub max_results: usize,
}

impl Default for GeneralScraper {
    fn default() -> Self {
        Self { max_results: 5 }
    }
}

#[async_trait]
impl Scraper for GeneralScraper {
    fn platform(&self) -> &'static str {
        "Web"
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
                .push(ThoughtLogEntry::now(format!("[Web] Searching: {}", query)));
            let hits = search.search(query, self.max_results, None, None).await;
            let found = hits_to_candidates(hits, self.platform());
            haul.thoughts
                .push(ThoughtLogEntry::now(format!("[Web] Found {} results", found.len())));
            haul.candidates.extend(found);
        }

        haul
    }
}
