//! Reddit scraper - community threads about device repurposing.

use async_trait::async_trait;

use super::{scrape_single_domain, ScrapeHaul, Scraper};
use crate::search::SearchAdapter;

pub struct RedditScraper {
    pub max_results: usize,
}

impl Default for RedditScraper {
    fn default() -> Self {
        Self { max_results: 5 }
    }
}

#[async_trait]
impl Scraper for RedditScraper {
    fn platform(&self) -> &'static str {
        "Reddit"
    }

    async fn scrape(
        &self,
        search: &SearchAdapter,
        queries: &[String],
        _device: &str,
        _conditions: &[String],
    ) -> ScrapeHaul {
        scrape_single_domain(search, queries, self.platform(), "reddit.com", self.max_results)
            .await
    }
}
