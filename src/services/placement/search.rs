// ============================================
// Search Assembler
// ============================================
//
// Filter pipeline over the listing snapshot, in order:
//   active → text query → structured filters → display gate (non-premium
//   only) → score → sort → paginate
//
// The default relevance sort reserves the leading positions for the top
// premium listings and interleaves the remainder with a per-step random
// draw, so premium visibility stays high without freezing out the rest.

use super::{sort_desc_by_score, Scored};
use crate::config::AlgorithmConfig;
use crate::models::{
    DisplayMetrics, DisplayResult, Listing, SearchParams, SortOrder,
};
use crate::services::{DisplayGate, DisplayScorer};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, info};

const DEFAULT_PAGE_SIZE: usize = 20;

pub struct SearchAssembler {
    config: AlgorithmConfig,
    scorer: DisplayScorer,
    gate: DisplayGate,
}

impl SearchAssembler {
    pub fn new(config: AlgorithmConfig) -> Self {
        let scorer = DisplayScorer::new(&config);
        Self {
            config,
            scorer,
            gate: DisplayGate::new(),
        }
    }

    /// Run the full search pipeline against the current wall clock.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        listings: &[Listing],
        params: &SearchParams,
        rng: &mut R,
    ) -> DisplayResult {
        self.assemble_at(listings, params, Utc::now(), rng)
    }

    /// Same pipeline with an explicit `now` for the recency factor.
    pub fn assemble_at<R: Rng + ?Sized>(
        &self,
        listings: &[Listing],
        params: &SearchParams,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> DisplayResult {
        let page = params.page.unwrap_or(1).max(1);
        let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        let filtered = self.filter(listings, params, rng);
        debug!(
            input_count = listings.len(),
            filtered_count = filtered.len(),
            "Search filters applied"
        );

        let query = params.query.as_deref().filter(|q| !q.is_empty());
        let mut scored: Vec<Scored> = filtered
            .into_iter()
            .map(|l| Scored {
                score: self.scorer.score_at(l, now, query, None),
                listing: l.clone(),
            })
            .collect();

        scored = self.order(scored, params.sort, rng);

        let total_count = scored.len();
        let start = (page - 1) * page_size;
        let page_items: Vec<Scored> = scored.into_iter().skip(start).take(page_size).collect();

        let premium_shown = page_items
            .iter()
            .filter(|s| s.listing.plan.is_premium())
            .count();
        let average_score = if page_items.is_empty() {
            0.0
        } else {
            page_items.iter().map(|s| s.score).sum::<f64>() / page_items.len() as f64
        };

        info!(
            total_count = total_count,
            page = page,
            returned = page_items.len(),
            premium_shown = premium_shown,
            "Search assembled"
        );

        DisplayResult {
            has_more: start + page_size < total_count,
            metrics: DisplayMetrics {
                premium_shown,
                regular_shown: page_items.len() - premium_shown,
                average_score,
            },
            items: page_items.into_iter().map(|s| s.listing).collect(),
            total_count,
            page,
            page_size,
        }
    }

    /// Stages 1-4: active filter, text query, structured filters, gate.
    fn filter<'a, R: Rng + ?Sized>(
        &self,
        listings: &'a [Listing],
        params: &SearchParams,
        rng: &mut R,
    ) -> Vec<&'a Listing> {
        let mut filtered: Vec<&Listing> = listings.iter().filter(|l| l.is_active()).collect();

        if let Some(query) = params.query.as_deref().filter(|q| !q.is_empty()) {
            filtered.retain(|l| l.matches_query(query));
        }

        if let Some(category_id) = params.category_id {
            filtered.retain(|l| l.category_id == category_id);
        }

        if let Some(subcategory_id) = params.subcategory_id {
            filtered.retain(|l| l.subcategory_id == Some(subcategory_id));
        }

        if let Some(location) = &params.location {
            if let Some(state) = &location.state {
                filtered.retain(|l| l.location.state == *state);
            }
            if let Some(city) = &location.city {
                filtered.retain(|l| l.location.city == *city);
            }
        }

        if let Some(range) = params.price_range {
            // Inclusive on both bounds; missing min is 0, missing max unbounded
            let min = range.min.unwrap_or(0.0);
            filtered.retain(|l| l.price >= min);
            if let Some(max) = range.max {
                filtered.retain(|l| l.price <= max);
            }
        }

        if !params.conditions.is_empty() {
            filtered.retain(|l| params.conditions.contains(&l.condition));
        }

        // Premium and above always pass; lower tiers draw against the gate
        filtered.retain(|l| l.plan.is_premium() || self.gate.passes(l, rng));

        filtered
    }

    fn order<R: Rng + ?Sized>(
        &self,
        mut scored: Vec<Scored>,
        sort: SortOrder,
        rng: &mut R,
    ) -> Vec<Scored> {
        match sort {
            SortOrder::PriceAsc => {
                scored.sort_by(|a, b| {
                    a.listing
                        .price
                        .partial_cmp(&b.listing.price)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                scored
            }
            SortOrder::PriceDesc => {
                scored.sort_by(|a, b| {
                    b.listing
                        .price
                        .partial_cmp(&a.listing.price)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                scored
            }
            SortOrder::DateDesc => {
                scored.sort_by_key(|s| std::cmp::Reverse(sort_date(&s.listing)));
                scored
            }
            SortOrder::DateAsc => {
                scored.sort_by_key(|s| sort_date(&s.listing));
                scored
            }
            SortOrder::Relevance => self.interleave_premium(scored, rng),
        }
    }

    /// Relevance ordering: unconditional premium head, then a two-pointer
    /// merge with one uniform draw per step.
    fn interleave_premium<R: Rng + ?Sized>(
        &self,
        scored: Vec<Scored>,
        rng: &mut R,
    ) -> Vec<Scored> {
        let (mut premium, mut rest): (Vec<Scored>, Vec<Scored>) = scored
            .into_iter()
            .partition(|s| s.listing.plan.is_premium());
        sort_desc_by_score(&mut premium);
        sort_desc_by_score(&mut rest);

        let head_len = self.config.search.boost_premium_positions.min(premium.len());
        let mut remaining_premium: VecDeque<Scored> = premium.split_off(head_len).into();
        let mut others: VecDeque<Scored> = rest.into();

        let mut ordered = premium; // the guaranteed premium head
        loop {
            let take_premium = !remaining_premium.is_empty()
                && (others.is_empty() || rng.gen::<f64>() < self.config.search.mix_ratio);
            let next = if take_premium {
                remaining_premium.pop_front()
            } else {
                others.pop_front()
            };
            match next {
                Some(item) => ordered.push(item),
                None => break,
            }
        }

        ordered
    }
}

/// Publish timestamp with creation-time fallback, for the date sort modes.
fn sort_date(listing: &Listing) -> DateTime<Utc> {
    listing.published_at.unwrap_or(listing.created_at)
}
