//! # Pipeline Orchestrator
//!
//! Scatter-gather over every source: six scrapers, the creative-build
//! generator, the valuation generator and the disassembly-manual lookup
//! all run concurrently, each independently time-boxed. One source
//! failing (or timing out) costs exactly that source's contribution;
//! nothing can cancel the siblings. The caller owns the whole-request
//! deadline.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use crate::ai::client::ChatClient;
use crate::ai::creative::generate_creative_builds;
use crate::ai::fallback::generate_fallback_ideas;
use crate::ai::valuation::generate_eco_valuation;
use crate::config::PipelineConfig;
use crate::pipeline::dedup::{dedupe_by_title, SIMILARITY_THRESHOLD};
use crate::pipeline::queries::formulate;
use crate::pipeline::score::{classify_type, normalize_difficulty, score_candidate};
use crate::pipeline::stage::StageTracker;
use crate::schemas::{
    short_id, DeviceContext, EcoValuation, ProjectCandidate, ProjectRecommendation, ProjectType,
    ScrapeResponse, StepByStepInstruction, ThoughtLogEntry,
};
use crate::scrape::{
    CreativeScraper, GeneralScraper, GitHubScraper, MakerScraper, RedditScraper, ScrapeHaul,
    Scraper, YouTubeScraper,
};
use crate::search::SearchAdapter;

/// Final list cap
const MAX_RECOMMENDATIONS: usize = 20;
/// Slots reserved so AI creative builds are never crowded out by
/// high-volume scraped results
const MAX_AI_CREATIVE_SLOTS: usize = 6;

/// One concurrent task's settled outcome
enum TaskOutput {
    Scrape {
        index: usize,
        outcome: Result<ScrapeHaul, String>,
    },
    Disassembly(String),
    Creative(Vec<ProjectCandidate>),
    Valuation(Option<EcoValuation>),
}

/// The aggregation pipeline. Stateless between requests; owns the source
/// list (whose fixed order is the dedup tie-break) and the shared search
/// adapter handle.
pub struct Pipeline {
    search: Arc<SearchAdapter>,
    chat: ChatClient,
    config: PipelineConfig,
    scrapers: Vec<Arc<dyn Scraper>>,
}

impl Pipeline {
    pub fn new(search: Arc<SearchAdapter>, chat: ChatClient, config: PipelineConfig) -> Self {
        // Fixed source order - deduplication's first-seen tie-break
        // depends on it, not on wall-clock completion order
        let max_results = config.max_results_per_source;
        let scrapers: Vec<Arc<dyn Scraper>> = vec![
            Arc::new(YouTubeScraper { max_results }),
            Arc::new(RedditScraper { max_results }),
            Arc::new(GitHubScraper { max_results }),
            Arc::new(MakerScraper::default()),
            Arc::new(GeneralScraper { max_results }),
            Arc::new(CreativeScraper { max_results }),
        ];
        Self {
            search,
            chat,
            config,
            scrapers,
        }
    }

    /// Run the full chain for one request. Never fails: every internal
    /// error degrades to a smaller result set and a log line.
    pub async fn run(&self, ctx: &DeviceContext) -> ScrapeResponse {
        let mut tracker = StageTracker::new();
        let mut thoughts = vec![ThoughtLogEntry::now(format!(
            "Analyzing {} ({}) specs...",
            ctx.device, ctx.device_type
        ))];

        let mut plan = formulate(ctx);
        thoughts.append(&mut plan.thoughts);

        // Dispatch everything
        thoughts.push(ThoughtLogEntry::now(format!(
            "Launching {} scraper agents in parallel...",
            self.scrapers.len()
        )));

        let mut join_set: JoinSet<TaskOutput> = JoinSet::new();

        for (index, scraper) in self.scrapers.iter().enumerate() {
            let scraper = Arc::clone(scraper);
            let search = Arc::clone(&self.search);
            let queries: Vec<String> = plan.for_platform(scraper.platform()).to_vec();
            let device = ctx.device.clone();
            let conditions = ctx.conditions.clone();
            let cap = self.config.per_source_timeout;

            join_set.spawn(async move {
                if queries.is_empty() {
                    return TaskOutput::Scrape {
                        index,
                        outcome: Ok(ScrapeHaul::default()),
                    };
                }
                let outcome = match tokio::time::timeout(
                    cap,
                    scraper.scrape(&search, &queries, &device, &conditions),
                )
                .await
                {
                    Ok(haul) => Ok(haul),
                    Err(_) => Err(format!("timed out after {}s", cap.as_secs())),
                };
                TaskOutput::Scrape { index, outcome }
            });
        }

        {
            let search = Arc::clone(&self.search);
            let device = ctx.device.clone();
            let cap = self.config.disassembly_timeout;
            join_set.spawn(async move {
                TaskOutput::Disassembly(find_disassembly_url(&search, &device, cap).await)
            });
        }

        thoughts.push(ThoughtLogEntry::now(
            "Activating AI Creative Builds Architect for spec-aware project ideas...",
        ));
        {
            let chat = self.chat.clone();
            let ctx = ctx.clone();
            join_set
                .spawn(async move { TaskOutput::Creative(generate_creative_builds(&chat, &ctx).await) });
        }

        thoughts.push(ThoughtLogEntry::now(
            "Activating Eco-Exchange Valuation Engine for trade-in offers...",
        ));
        {
            let chat = self.chat.clone();
            let ctx = ctx.clone();
            join_set.spawn(async move {
                let notes = ctx.condition_notes.clone();
                TaskOutput::Valuation(generate_eco_valuation(&chat, &ctx, &notes).await)
            });
        }

        tracker.advance(); // Dispatched

        // Gather every settled outcome; a panicked task loses only its own
        // contribution
        let mut scraper_outcomes: Vec<Option<Result<ScrapeHaul, String>>> = Vec::new();
        scraper_outcomes.resize_with(self.scrapers.len(), || None);
        let mut disassembly_url = String::new();
        let mut ai_creative: Vec<ProjectCandidate> = Vec::new();
        let mut eco_valuation: Option<EcoValuation> = None;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(TaskOutput::Scrape { index, outcome }) => scraper_outcomes[index] = Some(outcome),
                Ok(TaskOutput::Disassembly(url)) => disassembly_url = url,
                Ok(TaskOutput::Creative(ideas)) => ai_creative = ideas,
                Ok(TaskOutput::Valuation(valuation)) => eco_valuation = valuation,
                Err(e) => {
                    tracing::warn!("pipeline task panicked: {}", e);
                    thoughts.push(ThoughtLogEntry::now(format!(
                        "A source task crashed: {}. Continuing...",
                        truncate(&e.to_string(), 80)
                    )));
                }
            }
        }

        // Merge scraper hauls in fixed source order
        let mut candidates: Vec<ProjectCandidate> = Vec::new();
        for (scraper, outcome) in self.scrapers.iter().zip(scraper_outcomes) {
            match outcome {
                Some(Ok(mut haul)) => {
                    thoughts.append(&mut haul.thoughts);
                    candidates.append(&mut haul.candidates);
                }
                Some(Err(message)) => {
                    tracing::warn!("[{}] Failed: {}", scraper.platform(), message);
                    thoughts.push(ThoughtLogEntry::now(format!(
                        "[{}] Failed: {}. Continuing...",
                        scraper.platform(),
                        truncate(&message, 80)
                    )));
                }
                None => {}
            }
        }

        thoughts.push(ThoughtLogEntry::now(format!(
            "Collected {} raw results across all sources.",
            candidates.len()
        )));
        tracker.advance(); // Collected

        if ai_creative.is_empty() {
            thoughts.push(ThoughtLogEntry::now(
                "AI Creative Builds Architect returned no results. Using web search results only.",
            ));
        } else {
            thoughts.push(ThoughtLogEntry::now(format!(
                "AI Architect generated {} spec-aware creative build ideas.",
                ai_creative.len()
            )));
            candidates.extend(ai_creative);
        }

        let mut deduped = dedupe_by_title(candidates, SIMILARITY_THRESHOLD);
        thoughts.push(ThoughtLogEntry::now(format!(
            "After deduplication: {} unique projects.",
            deduped.len()
        )));
        tracker.advance(); // Deduplicated

        // Fallback: a completely empty set means the AI brainstorms the
        // whole result list instead
        if deduped.is_empty() {
            thoughts.push(ThoughtLogEntry::now(
                "No web results found. Activating AI to generate project recommendations...",
            ));
            let ideas = generate_fallback_ideas(&self.chat, ctx).await;
            if ideas.is_empty() {
                thoughts.push(ThoughtLogEntry::now(
                    "AI fallback also returned no results. Delivering empty set.",
                ));
            } else {
                thoughts.push(ThoughtLogEntry::now(format!(
                    "AI generated {} creative project ideas with step-by-step instructions.",
                    ideas.len()
                )));
                deduped = ideas;
            }
        }
        tracker.advance(); // FallbackCheck

        thoughts.push(ThoughtLogEntry::now(
            "Scoring projects by device compatibility...",
        ));
        if !disassembly_url.is_empty() {
            thoughts.push(ThoughtLogEntry::now(format!(
                "Found disassembly manual: {}...",
                truncate(&disassembly_url, 60)
            )));
        }

        let recommendations = build_recommendations(deduped, ctx);
        tracker.advance(); // Scored
        tracker.advance(); // SlotReserved
        tracker.advance(); // Ranked

        thoughts.push(ThoughtLogEntry::now(format!(
            "Synthesis complete. Generated {} recommendations.",
            recommendations.len()
        )));
        thoughts.push(ThoughtLogEntry::now(
            "Generating shopping lists and difficulty ratings...",
        ));
        thoughts.push(ThoughtLogEntry::now("Done. Delivering results."));

        if let Some(valuation) = &eco_valuation {
            thoughts.push(ThoughtLogEntry::now(format!(
                "Eco-Exchange valued device at ${} scrap + {} partner offers.",
                valuation.valuation_summary.estimated_scrap_cash_usd,
                valuation.trade_in_offers.len()
            )));
        }

        tracker.advance(); // Delivered
        debug_assert!(tracker.is_delivered());

        ScrapeResponse {
            thoughts,
            recommendations,
            search_queries: plan.flatten(),
            device_summary: ctx.summary(),
            disassembly_url,
            eco_valuation,
        }
    }
}

/// Look for an iFixit teardown guide for this device
async fn find_disassembly_url(search: &SearchAdapter, device: &str, cap: Duration) -> String {
    let query = format!("{} teardown disassembly guide", device);
    let hits = search.search(&query, 3, Some("ifixit.com"), Some(cap)).await;
    hits.into_iter()
        .map(|hit| hit.url)
        .find(|url| url.contains("ifixit.com"))
        .unwrap_or_default()
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Score, convert, reserve AI-creative slots, rank, cap.
pub(crate) fn build_recommendations(
    candidates: Vec<ProjectCandidate>,
    ctx: &DeviceContext,
) -> Vec<ProjectRecommendation> {
    let mut recommendations: Vec<ProjectRecommendation> = candidates
        .into_iter()
        .map(|candidate| to_recommendation(candidate, ctx))
        .collect();
    recommendations.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));

    // Keep up to 6 AI creative builds unconditionally, then fill the
    // remaining slots with the highest-scoring remainder
    let (ai_creative, other): (Vec<_>, Vec<_>) = recommendations.into_iter().partition(|r| {
        r.platform == "AI Generated" && r.project_type == ProjectType::CreativeBuild
    });
    let ai_slots = ai_creative.len().min(MAX_AI_CREATIVE_SLOTS);
    let other_slots = MAX_RECOMMENDATIONS - ai_slots;

    let mut kept: Vec<ProjectRecommendation> = ai_creative
        .into_iter()
        .take(ai_slots)
        .chain(other.into_iter().take(other_slots))
        .collect();
    kept.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));
    kept
}

fn to_recommendation(candidate: ProjectCandidate, ctx: &DeviceContext) -> ProjectRecommendation {
    let is_ai_creative = candidate.is_ai_creative();

    let mut score: u8 = if is_ai_creative {
        // The architect's own 1-10 rating, scaled and floored
        let base = match candidate.feasibility_score {
            Some(feasibility) => (feasibility * 10.0).clamp(60.0, 100.0) as u8,
            None => 75,
        };
        if candidate.steps.len() >= 3 {
            base.saturating_add(5).min(100)
        } else {
            base
        }
    } else {
        score_candidate(&candidate, ctx)
    };

    // Tailored AI suggestions are never ranked below generic scraped hits
    if candidate.platform == "AI Generated" && !is_ai_creative {
        score = score.max(70);
    }

    let project_type = candidate
        .project_type
        .unwrap_or_else(|| classify_type(&candidate, ctx.mode));
    let difficulty = normalize_difficulty(&candidate.difficulty);

    let steps: Vec<StepByStepInstruction> = candidate
        .steps
        .iter()
        .enumerate()
        .filter_map(|(i, step)| {
            let step = step.trim();
            if step.is_empty() {
                None
            } else {
                Some(StepByStepInstruction {
                    step_number: (i + 1) as u32,
                    description: step.to_string(),
                })
            }
        })
        .collect();

    let platform = if candidate.platform.is_empty() {
        "Web".to_string()
    } else {
        candidate.platform
    };
    let reasoning = candidate
        .reasoning
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| {
            format!(
                "Found on {}. Compatible with your {}'s condition.",
                platform, ctx.device
            )
        });

    ProjectRecommendation {
        id: short_id(),
        title: candidate.title,
        project_type,
        description: candidate.description,
        difficulty,
        compatibility_score: score,
        reasoning,
        required_parts: candidate.required_parts,
        source_url: candidate.source_url,
        steps,
        platform,
    }
}
