//! GitHub scraper - repos with actionable code for repurposed devices.

use async_trait::async_trait;

use super::{scrape_single_domain, ScrapeHaul, Scraper};
use crate::search::SearchAdapter;

pub struct GitHubScraper {
    pub max_results: usize,
}

impl Default for GitHubScraper {
    fn default() -> Self {
        Self { max_results: 5 }
    }
}

#[async_trait]
impl Scraper for GitHubScraper {
    fn platform(&self) -> &'static str {
        "GitHub"
    }

    async fn scrape(
        &self,
        search: &SearchAdapter,
        queries: &[String],
        _device: &str,
        _conditions: &[String],
    ) -> ScrapeHaul {
        scrape_single_domain(search, queries, self.platform(), "github.com", self.max_results)
            .await
    }
}
