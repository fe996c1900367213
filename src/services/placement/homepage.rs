use super::{sort_desc_by_score, Scored};
use crate::config::AlgorithmConfig;
use crate::models::{HomepageSections, Listing, PlanTier};
use crate::services::{DisplayGate, DisplayScorer};
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

/// Builds the three homepage sections: featured (Featured/Enterprise),
/// premium (Premium), regular (Basic/Free). The regular group passes the
/// display gate before scoring, one draw per listing per call.
pub struct HomepageAssembler {
    config: AlgorithmConfig,
    scorer: DisplayScorer,
    gate: DisplayGate,
}

impl HomepageAssembler {
    pub fn new(config: AlgorithmConfig) -> Self {
        let scorer = DisplayScorer::new(&config);
        Self {
            config,
            scorer,
            gate: DisplayGate::new(),
        }
    }

    pub fn assemble<R: Rng + ?Sized>(
        &self,
        listings: &[Listing],
        rng: &mut R,
    ) -> HomepageSections {
        self.assemble_at(listings, Utc::now(), rng)
    }

    pub fn assemble_at<R: Rng + ?Sized>(
        &self,
        listings: &[Listing],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> HomepageSections {
        let active: Vec<&Listing> = listings.iter().filter(|l| l.is_active()).collect();

        let featured: Vec<&Listing> = active
            .iter()
            .copied()
            .filter(|l| l.plan.is_highlight())
            .collect();
        let premium: Vec<&Listing> = active
            .iter()
            .copied()
            .filter(|l| l.plan == PlanTier::Premium)
            .collect();
        let regular: Vec<&Listing> = active
            .iter()
            .copied()
            .filter(|l| matches!(l.plan, PlanTier::Basic | PlanTier::Free))
            .filter(|l| self.gate.passes(l, rng))
            .collect();

        let sections = HomepageSections {
            featured: self.rank(featured, now, self.config.homepage.featured_slots),
            premium: self.rank(premium, now, self.config.homepage.premium_slots),
            regular: self.rank(regular, now, self.config.homepage.regular_slots),
        };

        info!(
            featured = sections.featured.len(),
            premium = sections.premium.len(),
            regular = sections.regular.len(),
            "Homepage sections assembled"
        );

        sections
    }

    /// Query-less score, stable descending sort, truncate to the slot count.
    fn rank(&self, group: Vec<&Listing>, now: DateTime<Utc>, slots: usize) -> Vec<Listing> {
        let mut scored: Vec<Scored> = group
            .into_iter()
            .map(|l| Scored {
                score: self.scorer.score_at(l, now, None, None),
                listing: l.clone(),
            })
            .collect();
        sort_desc_by_score(&mut scored);
        scored
            .into_iter()
            .take(slots)
            .map(|s| s.listing)
            .collect()
    }
}
