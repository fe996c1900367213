use super::{sort_desc_by_score, SearchAssembler, Scored};
use crate::config::AlgorithmConfig;
use crate::models::{CategorySections, Listing, SearchParams};
use crate::services::DisplayScorer;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

/// Builds a category page: a highlighted block of Featured/Enterprise
/// listings on top, and the rest as a standard paginated search result.
/// The two sections are disjoint by listing id.
pub struct CategoryAssembler {
    config: AlgorithmConfig,
    scorer: DisplayScorer,
    search: SearchAssembler,
}

impl CategoryAssembler {
    pub fn new(config: AlgorithmConfig) -> Self {
        let scorer = DisplayScorer::new(&config);
        let search = SearchAssembler::new(config.clone());
        Self {
            config,
            scorer,
            search,
        }
    }

    pub fn assemble<R: Rng + ?Sized>(
        &self,
        listings: &[Listing],
        category_id: Uuid,
        page: usize,
        rng: &mut R,
    ) -> CategorySections {
        self.assemble_at(listings, category_id, page, Utc::now(), rng)
    }

    pub fn assemble_at<R: Rng + ?Sized>(
        &self,
        listings: &[Listing],
        category_id: Uuid,
        page: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> CategorySections {
        let category_listings: Vec<&Listing> = listings
            .iter()
            .filter(|l| l.is_active() && l.category_id == category_id)
            .collect();

        let mut highlighted: Vec<Scored> = category_listings
            .iter()
            .copied()
            .filter(|l| l.plan.is_highlight())
            .map(|l| Scored {
                score: self.scorer.score_at(l, now, None, None),
                listing: l.clone(),
            })
            .collect();
        sort_desc_by_score(&mut highlighted);
        let highlighted: Vec<Listing> = highlighted
            .into_iter()
            .take(self.config.category.highlighted_count)
            .map(|s| s.listing)
            .collect();

        let highlighted_ids: HashSet<Uuid> = highlighted.iter().map(|l| l.id).collect();
        let standard_pool: Vec<Listing> = category_listings
            .into_iter()
            .filter(|l| !highlighted_ids.contains(&l.id))
            .cloned()
            .collect();

        let params = SearchParams {
            page: Some(page),
            page_size: Some(self.config.category.page_size),
            ..Default::default()
        };
        let standard = self.search.assemble_at(&standard_pool, &params, now, rng);

        info!(
            category_id = %category_id,
            highlighted = highlighted.len(),
            standard_total = standard.total_count,
            "Category sections assembled"
        );

        CategorySections {
            highlighted,
            standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::listing;
    use crate::models::{ListingStatus, PlanTier};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assembler() -> CategoryAssembler {
        CategoryAssembler::new(AlgorithmConfig::default())
    }

    fn category_snapshot(category_id: Uuid) -> Vec<Listing> {
        let mut listings: Vec<Listing> = Vec::new();
        listings.extend((0..6).map(|_| listing(PlanTier::Featured, 1)));
        listings.extend((0..3).map(|_| listing(PlanTier::Premium, 1)));
        listings.extend((0..8).map(|_| listing(PlanTier::Enterprise, 1)));
        for l in &mut listings {
            l.category_id = category_id;
        }
        listings
    }

    #[test]
    fn test_empty_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let sections = assembler().assemble(&[], Uuid::new_v4(), 1, &mut rng);
        assert!(sections.highlighted.is_empty());
        assert_eq!(sections.standard.total_count, 0);
    }

    #[test]
    fn test_highlighted_and_standard_are_disjoint() {
        let category_id = Uuid::new_v4();
        let listings = category_snapshot(category_id);

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sections = assembler().assemble(&listings, category_id, 1, &mut rng);

            assert_eq!(sections.highlighted.len(), 4);
            assert!(sections.highlighted.iter().all(|l| l.plan.is_highlight()));

            let highlighted_ids: HashSet<Uuid> =
                sections.highlighted.iter().map(|l| l.id).collect();
            assert!(
                sections
                    .standard
                    .items
                    .iter()
                    .all(|l| !highlighted_ids.contains(&l.id)),
                "seed {seed}: overlap between sections"
            );
        }
    }

    #[test]
    fn test_other_categories_are_excluded() {
        let category_id = Uuid::new_v4();
        let mut listings = category_snapshot(category_id);
        // Noise from another category
        listings.extend((0..5).map(|_| listing(PlanTier::Enterprise, 0)));

        let mut rng = StdRng::seed_from_u64(2);
        let sections = assembler().assemble(&listings, category_id, 1, &mut rng);
        assert!(sections
            .highlighted
            .iter()
            .chain(sections.standard.items.iter())
            .all(|l| l.category_id == category_id));
    }

    #[test]
    fn test_inactive_category_listings_are_excluded() {
        let category_id = Uuid::new_v4();
        let mut listings = category_snapshot(category_id);
        for l in &mut listings {
            l.status = ListingStatus::Rejected;
        }

        let mut rng = StdRng::seed_from_u64(2);
        let sections = assembler().assemble(&listings, category_id, 1, &mut rng);
        assert!(sections.highlighted.is_empty());
        assert_eq!(sections.standard.total_count, 0);
    }

    #[test]
    fn test_standard_section_uses_category_page_size() {
        let mut config = AlgorithmConfig::default();
        config.category.highlighted_count = 2;
        config.category.page_size = 5;
        let assembler = CategoryAssembler::new(config);

        let category_id = Uuid::new_v4();
        let listings = category_snapshot(category_id);

        let mut rng = StdRng::seed_from_u64(8);
        let sections = assembler.assemble(&listings, category_id, 1, &mut rng);
        assert_eq!(sections.highlighted.len(), 2);
        assert_eq!(sections.standard.page_size, 5);
        assert!(sections.standard.items.len() <= 5);
        // 17 in category, 2 highlighted: 15 in the standard pool (all
        // premium-or-above, so the gate admits everything)
        assert_eq!(sections.standard.total_count, 15);
        assert!(sections.standard.has_more);
    }
}
