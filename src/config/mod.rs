use crate::services::PlacementError;
use serde::{Deserialize, Serialize};
use std::env;

/// Weights applied to the five score factors. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub plan_priority: f64,
    pub recency: f64,
    pub relevance: f64,
    pub engagement: f64,
    pub location: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            plan_priority: 0.40,
            recency: 0.25,
            relevance: 0.20,
            engagement: 0.10,
            location: 0.05,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.plan_priority + self.recency + self.relevance + self.engagement + self.location
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomepageConfig {
    pub featured_slots: usize,
    pub premium_slots: usize,
    pub regular_slots: usize,
    /// How often the featured window rotates, in seconds.
    pub rotation_interval_secs: u64,
}

impl Default for HomepageConfig {
    fn default() -> Self {
        Self {
            featured_slots: 4,
            premium_slots: 8,
            regular_slots: 12,
            rotation_interval_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Leading result positions reserved for the top premium listings.
    pub boost_premium_positions: usize,
    /// Per-step probability of drawing a premium listing during interleave.
    pub mix_ratio: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            boost_premium_positions: 3,
            mix_ratio: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub highlighted_count: usize,
    pub page_size: usize,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            highlighted_count: 4,
            page_size: 20,
        }
    }
}

/// Tunable constants for the whole engine. Built once, immutable during a
/// single computation; callers may pass a modified copy per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    pub weights: ScoreWeights,
    pub homepage: HomepageConfig,
    pub search: SearchConfig,
    pub category: CategoryConfig,
}

impl AlgorithmConfig {
    /// Load configuration with per-field env overrides on top of defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = AlgorithmConfig::default();
        AlgorithmConfig {
            weights: ScoreWeights {
                plan_priority: env_f64("WEIGHT_PLAN_PRIORITY", defaults.weights.plan_priority),
                recency: env_f64("WEIGHT_RECENCY", defaults.weights.recency),
                relevance: env_f64("WEIGHT_RELEVANCE", defaults.weights.relevance),
                engagement: env_f64("WEIGHT_ENGAGEMENT", defaults.weights.engagement),
                location: env_f64("WEIGHT_LOCATION", defaults.weights.location),
            },
            homepage: HomepageConfig {
                featured_slots: env_usize("HOMEPAGE_FEATURED_SLOTS", defaults.homepage.featured_slots),
                premium_slots: env_usize("HOMEPAGE_PREMIUM_SLOTS", defaults.homepage.premium_slots),
                regular_slots: env_usize("HOMEPAGE_REGULAR_SLOTS", defaults.homepage.regular_slots),
                rotation_interval_secs: env_u64(
                    "HOMEPAGE_ROTATION_INTERVAL_SECS",
                    defaults.homepage.rotation_interval_secs,
                ),
            },
            search: SearchConfig {
                boost_premium_positions: env_usize(
                    "SEARCH_BOOST_PREMIUM_POSITIONS",
                    defaults.search.boost_premium_positions,
                ),
                mix_ratio: env_f64("SEARCH_MIX_RATIO", defaults.search.mix_ratio),
            },
            category: CategoryConfig {
                highlighted_count: env_usize(
                    "CATEGORY_HIGHLIGHTED_COUNT",
                    defaults.category.highlighted_count,
                ),
                page_size: env_usize("CATEGORY_PAGE_SIZE", defaults.category.page_size),
            },
        }
    }

    /// Reject weight sets that do not sum to 1.0 (within float tolerance).
    pub fn validate(&self) -> Result<(), PlacementError> {
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(PlacementError::InvalidWeights(sum));
        }
        Ok(())
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .map(|v| v.parse().unwrap_or_else(|_| panic!("{key} must be a valid f64")))
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .map(|v| v.parse().unwrap_or_else(|_| panic!("{key} must be a valid usize")))
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .map(|v| v.parse().unwrap_or_else(|_| panic!("{key} must be a valid u64")))
        .unwrap_or(default)
}
