// ============================================
// Display Scorer
// ============================================
//
// Five-factor weighted score deciding a listing's position:
// - Plan priority (tier lookup)
// - Recency (linear decay, 2 points per day)
// - Search relevance (substring match on title/description/tags)
// - Engagement (views/favorites/contacts, saturating)
// - Location proximity (haversine, 1 point per 10 km)
//
// Each factor is normalized to 0-100 before weighting. The weighted sum is
// multiplied by the listing's plan position boost.

use crate::config::{AlgorithmConfig, ScoreWeights};
use crate::models::{GeoPoint, Listing};
use crate::utils::haversine_km;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Age assumed for listings that were never published.
const UNPUBLISHED_AGE_DAYS: f64 = 999.0;

/// Computes display scores from a fixed weight set.
#[derive(Debug, Clone, Default)]
pub struct DisplayScorer {
    weights: ScoreWeights,
}

impl DisplayScorer {
    pub fn new(config: &AlgorithmConfig) -> Self {
        Self {
            weights: config.weights,
        }
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Score against the current wall clock.
    pub fn score(
        &self,
        listing: &Listing,
        query: Option<&str>,
        user_location: Option<GeoPoint>,
    ) -> f64 {
        self.score_at(listing, Utc::now(), query, user_location)
    }

    /// Score with an explicit `now`, so recency is testable without a clock.
    /// Pure: same inputs always produce the same score.
    pub fn score_at(
        &self,
        listing: &Listing,
        now: DateTime<Utc>,
        query: Option<&str>,
        user_location: Option<GeoPoint>,
    ) -> f64 {
        let plan = listing.plan.priority_score();
        let recency = self.recency_score(listing, now);
        let relevance = self.relevance_score(listing, query);
        let engagement = self.engagement_score(listing);
        let location = self.location_score(listing, user_location);

        let weighted = plan * self.weights.plan_priority
            + recency * self.weights.recency
            + relevance * self.weights.relevance
            + engagement * self.weights.engagement
            + location * self.weights.location;

        let boost = if listing.display.priority > 0.0 {
            listing.display.priority
        } else {
            1.0
        };

        let score = weighted * boost;

        debug!(
            listing_id = %listing.id,
            plan = plan,
            recency = recency,
            relevance = relevance,
            engagement = engagement,
            location = location,
            boost = boost,
            score = score,
            "Display score computed"
        );

        score
    }

    /// Linear decay from the publish timestamp: 100 fresh, 0 at 50+ days.
    fn recency_score(&self, listing: &Listing, now: DateTime<Utc>) -> f64 {
        let age_days = match listing.published_at {
            Some(published) => {
                ((now - published).num_seconds() as f64 / 86_400.0).max(0.0)
            }
            None => UNPUBLISHED_AGE_DAYS,
        };
        (100.0 - age_days * 2.0).max(0.0)
    }

    /// Neutral 50 without a query; otherwise title 50 + description 30 +
    /// tags 20 for each matching field.
    fn relevance_score(&self, listing: &Listing, query: Option<&str>) -> f64 {
        let Some(query) = query.filter(|q| !q.is_empty()) else {
            return 50.0;
        };
        let q = query.to_lowercase();

        let title = if listing.title.to_lowercase().contains(&q) {
            50.0
        } else {
            0.0
        };
        let description = if listing.description.to_lowercase().contains(&q) {
            30.0
        } else {
            0.0
        };
        let tags = if listing.tags.iter().any(|t| t.to_lowercase().contains(&q)) {
            20.0
        } else {
            0.0
        };

        title + description + tags
    }

    /// Saturating linear combination of the engagement counters. A contact
    /// event weighs 50x a raw view.
    fn engagement_score(&self, listing: &Listing) -> f64 {
        (f64::from(listing.views) * 0.1
            + f64::from(listing.favorites) * 2.0
            + f64::from(listing.contacts) * 5.0)
            .min(100.0)
    }

    /// Neutral 50 unless both coordinates are known; then loses one point
    /// per 10 km of great-circle distance.
    fn location_score(&self, listing: &Listing, user_location: Option<GeoPoint>) -> f64 {
        match (user_location, listing.location.geo) {
            (Some(user), Some(geo)) => (100.0 - haversine_km(user, geo) / 10.0).max(0.0),
            _ => 50.0,
        }
    }
}
