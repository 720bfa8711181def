//! YouTube scraper - video tutorials for second-life builds.

use async_trait::async_trait;

use super::{scrape_single_domain, ScrapeHaul, Scraper};
use crate::search::SearchAdapter;

pub struct YouTubeScraper {
    pub max_results: usize,
}

impl Default for YouTubeScraper {
    fn default() -> Self {
        Self { max_results: 5 }
    }
}

#[async_trait]
impl Scraper for YouTubeScraper {
    fn platform(&self) -> &'static str {
        "YouTube"
    }

    async fn scrape(
        &self,
        search: &SearchAdapter,
        queries: &[String],
        _device: &str,
        _conditions: &[String],
    ) -> ScrapeHaul {
        scrape_single_domain(search, queries, self.platform(), "youtube.com", self.max_results)
            .await
    }
}
