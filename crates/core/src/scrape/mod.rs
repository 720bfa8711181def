//! # Source Scrapers
//!
//! Six scrapers share one contract: take the queries assigned to their
//! platform, run them through the search adapter, and return candidate
//! records plus a narration of what happened. Each scraper bounds its own
//! external calls (first 3-4 queries only) and keeps per-query failures
//! local.

use async_trait::async_trait;

use crate::schemas::{ProjectCandidate, ThoughtLogEntry};
use crate::search::{hits_to_candidates, SearchAdapter};

pub mod creative;
pub mod general;
pub mod github;
pub mod maker;
pub mod reddit;
pub mod youtube;

pub use creative::CreativeScraper;
pub use general::GeneralScraper;
pub use github::GitHubScraper;
pub use maker::MakerScraper;
pub use reddit::RedditScraper;
pub use youtube::YouTubeScraper;

/// Most scrapers take at most this many of their assigned queries
pub(crate) const MAX_QUERIES_PER_SOURCE: usize = 3;

/// What one scraper brings back
#[derive(Debug, Default)]
pub struct ScrapeHaul {
    pub candidates: Vec<ProjectCandidate>,
    pub thoughts: Vec<ThoughtLogEntry>,
}

/// Shared scraper contract
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Provenance label stamped on every candidate
    fn platform(&self) -> &'static str;

    async fn scrape(
        &self,
        search: &SearchAdapter,
        queries: &[String],
        device: &str,
        conditions: &[String],
    ) -> ScrapeHaul;
}

/// Common loop for the single-domain scrapers (YouTube, Reddit, GitHub):
/// restrict each search to the domain, then post-filter returned URLs
/// against it as well.
pub(crate) async fn scrape_single_domain(
    search: &SearchAdapter,
    queries: &[String],
    platform: &'static str,
    domain: &str,
    max_results: usize,
) -> ScrapeHaul {
    let mut haul = ScrapeHaul::default();

    for query in queries.iter().take(MAX_QUERIES_PER_SOURCE) {
        haul.thoughts
            .push(ThoughtLogEntry::now(format!("[{}] Searching: {}", platform, query)));
        let hits = search.search(query, max_results, Some(domain), None).await;
        let found: Vec<ProjectCandidate> = hits_to_candidates(hits, platform)
            .into_iter()
            .filter(|c| c.source_url.contains(domain))
            .collect();
        haul.thoughts
            .push(ThoughtLogEntry::now(format!("[{}] Found {} results", platform, found.len())));
        haul.candidates.extend(found);
    }

    haul
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchConfig;
    use std::time::Duration;

    fn offline_adapter() -> SearchAdapter {
        SearchAdapter::new(SearchConfig {
            endpoints: vec!["http://127.0.0.1:9/search".to_string()],
            max_concurrent: 2,
            default_timeout: Duration::from_secs(1),
        })
    }

    #[tokio::test]
    async fn test_query_cap_and_narration() {
        let adapter = offline_adapter();
        let queries: Vec<String> = (0..6).map(|i| format!("query {}", i)).collect();
        let scraper = YouTubeScraper::default();

        let haul = scraper.scrape(&adapter, &queries, "Old Phone", &[]).await;

        // First 3 queries only, one Searching + one Found line each
        let searching: Vec<_> = haul
            .thoughts
            .iter()
            .filter(|t| t.message.contains("Searching:"))
            .collect();
        assert_eq!(searching.len(), 3);
        assert!(searching[0].message.starts_with("[YouTube]"));
        assert!(haul.candidates.is_empty());
    }

    #[test]
    fn test_platform_labels() {
        assert_eq!(YouTubeScraper::default().platform(), "YouTube");
        assert_eq!(RedditScraper::default().platform(), "Reddit");
        assert_eq!(GitHubScraper::default().platform(), "GitHub");
        assert_eq!(MakerScraper::default().platform(), "Instructables");
        assert_eq!(GeneralScraper::default().platform(), "Web");
        assert_eq!(CreativeScraper::default().platform(), "Creative");
    }
}
