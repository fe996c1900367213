use crate::config::AlgorithmConfig;
use crate::models::Listing;
use crate::services::placement::{sort_desc_by_score, Scored};
use crate::services::DisplayScorer;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Subcategory agreement bonus added on top of the display score.
const SUBCATEGORY_BONUS: f64 = 20.0;

pub const DEFAULT_SIMILAR_LIMIT: usize = 6;

/// Picks related listings for a detail page: same category, current listing
/// excluded, ordered by display score with a bonus for matching subcategory.
pub struct SimilarFinder {
    scorer: DisplayScorer,
}

impl SimilarFinder {
    pub fn new(config: &AlgorithmConfig) -> Self {
        Self {
            scorer: DisplayScorer::new(config),
        }
    }

    pub fn find(&self, listings: &[Listing], current: &Listing, limit: usize) -> Vec<Listing> {
        self.find_at(listings, current, limit, Utc::now())
    }

    pub fn find_at(
        &self,
        listings: &[Listing],
        current: &Listing,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<Listing> {
        let mut scored: Vec<Scored> = listings
            .iter()
            .filter(|l| {
                l.is_active() && l.id != current.id && l.category_id == current.category_id
            })
            .map(|l| {
                let bonus = if l.subcategory_id == current.subcategory_id {
                    SUBCATEGORY_BONUS
                } else {
                    0.0
                };
                Scored {
                    score: self.scorer.score_at(l, now, None, None) + bonus,
                    listing: l.clone(),
                }
            })
            .collect();
        sort_desc_by_score(&mut scored);

        debug!(
            current_id = %current.id,
            candidates = scored.len(),
            limit = limit,
            "Similar listings picked"
        );

        scored.into_iter().take(limit).map(|s| s.listing).collect()
    }
}
