//! # Search Adapter
//!
//! Wraps the SearXNG-format web-search provider behind a bounded worker
//! pool. The provider client is a blocking HTTP client that must never run
//! on the async runtime's worker threads, so every call goes through
//! `spawn_blocking` with a hard wall-clock cap. Failures and timeouts
//! surface to callers as an empty hit list, never as an error.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::schemas::ProjectCandidate;

/// One raw search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Search provider settings
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Endpoints tried in order; first one that answers wins
    pub endpoints: Vec<String>,
    /// Size of the worker pool backing all scrapers
    pub max_concurrent: usize,
    /// Per-call cap when the caller does not pass one
    pub default_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoints: public_endpoints(),
            max_concurrent: 8,
            default_timeout: Duration::from_secs(30),
        }
    }
}

impl SearchConfig {
    /// Load from environment. `SEARXNG_URL` takes priority over the public
    /// instances.
    pub fn from_env() -> Self {
        let mut endpoints: Vec<String> = Vec::new();
        if let Ok(custom_url) = std::env::var("SEARXNG_URL") {
            endpoints.push(format!("{}/search", custom_url.trim_end_matches('/')));
        }
        endpoints.extend(public_endpoints());
        Self {
            endpoints,
            ..Self::default()
        }
    }
}

/// Public SearXNG instances (subset of reliable ones)
/// Full list: https://searx.space/
fn public_endpoints() -> Vec<String> {
    vec![
        "https://searx.be/search".to_string(),
        "https://search.sapti.me/search".to_string(),
        "https://searx.tiekoetter.com/search".to_string(),
    ]
}

/// The shared search resource handle. Created once at service start and
/// passed to every scraper; owns the only concurrency-limited pool in the
/// pipeline.
pub struct SearchAdapter {
    config: SearchConfig,
    permits: Arc<Semaphore>,
}

impl SearchAdapter {
    pub fn new(config: SearchConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Self { config, permits }
    }

    pub fn from_env() -> Self {
        Self::new(SearchConfig::from_env())
    }

    /// Run one text search. `site` restricts results to a domain via the
    /// provider's `site:` operator. Returns an empty list on provider
    /// error or timeout; the caller observes "no results", not a failure.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        site: Option<&str>,
        timeout: Option<Duration>,
    ) -> Vec<SearchHit> {
        let search_query = build_query(query, site);
        let timeout = timeout.unwrap_or(self.config.default_timeout);
        tracing::info!("search starting: {}", search_query);

        let permit = match self.permits.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return Vec::new(),
        };

        let endpoints = self.config.endpoints.clone();
        let query_owned = search_query.clone();
        let worker = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            blocking_search(&endpoints, &query_owned, max_results, timeout)
        });

        match tokio::time::timeout(timeout, worker).await {
            Ok(Ok(hits)) => {
                tracing::info!("search got {} results for: {}", hits.len(), search_query);
                hits
            }
            Ok(Err(e)) => {
                tracing::warn!("search worker failed for '{}': {}", search_query, e);
                Vec::new()
            }
            Err(_) => {
                tracing::warn!("search timed out for '{}'", search_query);
                Vec::new()
            }
        }
    }
}

fn build_query(query: &str, site: Option<&str>) -> String {
    match site {
        Some(site) => format!("site:{} {}", site, query),
        None => query.to_string(),
    }
}

/// The actual provider call. Blocking; runs on the worker pool only.
fn blocking_search(
    endpoints: &[String],
    query: &str,
    max_results: usize,
    timeout: Duration,
) -> Vec<SearchHit> {
    let client = match reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent("revive-agent/1.0")
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("failed to build search client: {}", e);
            return Vec::new();
        }
    };

    for endpoint in endpoints {
        let url = format!("{}?q={}&format=json", endpoint, urlencoding::encode(query));
        let response = match client.get(&url).send() {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("search endpoint {} unreachable: {}", endpoint, e);
                continue;
            }
        };
        let json: serde_json::Value = match response.json() {
            Ok(json) => json,
            Err(e) => {
                tracing::debug!("search endpoint {} returned non-JSON: {}", endpoint, e);
                continue;
            }
        };
        if let Some(results) = json.get("results").and_then(|r| r.as_array()) {
            return results
                .iter()
                .take(max_results)
                .map(|r| SearchHit {
                    title: str_at(r, "title"),
                    url: str_at(r, "url"),
                    snippet: str_at(r, "content"),
                })
                .collect();
        }
    }

    Vec::new()
}

fn str_at(value: &serde_json::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Convert raw hits into candidate records tagged with a platform label.
/// Hits without a title or URL are dropped here, before deduplication ever
/// sees them.
pub fn hits_to_candidates(hits: Vec<SearchHit>, platform: &str) -> Vec<ProjectCandidate> {
    hits.into_iter()
        .filter(|hit| !hit.title.is_empty() && !hit.url.is_empty())
        .map(|hit| ProjectCandidate {
            title: hit.title,
            description: hit.snippet,
            source_url: hit.url,
            difficulty: "Intermediate".to_string(),
            platform: platform.to_string(),
            ..Default::default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_with_site() {
        assert_eq!(
            build_query("old phone server project", Some("reddit.com")),
            "site:reddit.com old phone server project"
        );
        assert_eq!(build_query("old phone server project", None), "old phone server project");
    }

    #[test]
    fn test_hits_to_candidates_drops_incomplete() {
        let hits = vec![
            SearchHit {
                title: "Turn a phone into a server".to_string(),
                snippet: "guide".to_string(),
                url: "https://example.com/a".to_string(),
            },
            SearchHit {
                title: String::new(),
                snippet: "no title".to_string(),
                url: "https://example.com/b".to_string(),
            },
            SearchHit {
                title: "No URL".to_string(),
                snippet: String::new(),
                url: String::new(),
            },
        ];
        let candidates = hits_to_candidates(hits, "Web");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].platform, "Web");
        assert_eq!(candidates[0].difficulty, "Intermediate");
        assert!(candidates[0].steps.is_empty());
    }

    #[test]
    fn test_config_endpoints_non_empty() {
        let config = SearchConfig::default();
        assert!(!config.endpoints.is_empty());
        assert!(config.max_concurrent >= 1);
    }

    #[tokio::test]
    async fn test_search_unreachable_endpoint_returns_empty() {
        // A port nothing listens on: the adapter must swallow the failure
        let adapter = SearchAdapter::new(SearchConfig {
            endpoints: vec!["http://127.0.0.1:9/search".to_string()],
            max_concurrent: 2,
            default_timeout: Duration::from_secs(2),
        });
        let hits = adapter.search("anything", 5, None, None).await;
        assert!(hits.is_empty());
    }
}
