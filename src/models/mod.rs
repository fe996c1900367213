use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Paid visibility tier, ordered low → high visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Basic,
    Premium,
    Featured,
    Enterprise,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Basic => "basic",
            PlanTier::Premium => "premium",
            PlanTier::Featured => "featured",
            PlanTier::Enterprise => "enterprise",
        }
    }

    /// Fixed priority score (0-100) used by the plan factor of the display score.
    pub fn priority_score(&self) -> f64 {
        match self {
            PlanTier::Free => 10.0,
            PlanTier::Basic => 30.0,
            PlanTier::Premium => 60.0,
            PlanTier::Featured => 85.0,
            PlanTier::Enterprise => 100.0,
        }
    }

    /// Probability (0-1) that a listing on this tier is admitted into a
    /// general listing pass. Enterprise is always shown.
    pub fn display_probability(&self) -> f64 {
        match self {
            PlanTier::Free => 0.40,
            PlanTier::Basic => 0.65,
            PlanTier::Premium => 0.85,
            PlanTier::Featured => 0.95,
            PlanTier::Enterprise => 1.0,
        }
    }

    /// Premium-or-above tiers bypass the display gate in search results.
    pub fn is_premium(&self) -> bool {
        matches!(
            self,
            PlanTier::Premium | PlanTier::Featured | PlanTier::Enterprise
        )
    }

    /// Tiers eligible for the homepage featured section and category highlights.
    pub fn is_highlight(&self) -> bool {
        matches!(self, PlanTier::Featured | PlanTier::Enterprise)
    }
}

/// Listing lifecycle. Only `Active` listings are eligible for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Draft,
    Pending,
    Active,
    Paused,
    Expired,
    Sold,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Parts,
}

/// WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingLocation {
    pub country: String,
    pub state: String,
    pub city: String,
    #[serde(default)]
    pub geo: Option<GeoPoint>,
}

/// Display settings denormalized from the plan at publish time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Position boost multiplier applied to the final score.
    pub priority: f64,
    #[serde(default)]
    pub featured_badge: bool,
    #[serde(default)]
    pub urgent_badge: bool,
    #[serde(default)]
    pub verified_badge: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            priority: 1.0,
            featured_badge: false,
            urgent_badge: false,
            verified_badge: false,
        }
    }
}

/// A single classified advertisement record. Read-only input to the engine;
/// every computation returns fresh derived structures instead of mutating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub plan: PlanTier,

    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: f64,
    pub condition: Condition,

    pub category_id: Uuid,
    #[serde(default)]
    pub subcategory_id: Option<Uuid>,
    pub location: ListingLocation,

    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub favorites: u32,
    #[serde(default)]
    pub contacts: u32,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl Listing {
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    /// Case-insensitive substring match against title, description, or any tag.
    /// Same rule the relevance factor of the display score uses.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.title.to_lowercase().contains(&q)
            || self.description.to_lowercase().contains(&q)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&q))
    }
}

/// Sort order for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    DateDesc,
    DateAsc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationFilter {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Ephemeral per-request query descriptor. Built by the caller, discarded
/// after the search pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub subcategory_id: Option<Uuid>,
    #[serde(default)]
    pub location: Option<LocationFilter>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub sort: SortOrder,
    /// 1-indexed page number; missing defaults to 1.
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

/// Metrics over a single returned page of results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub premium_shown: usize,
    pub regular_shown: usize,
    pub average_score: f64,
}

/// One ordered page of search results plus pagination bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayResult {
    pub items: Vec<Listing>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
    pub metrics: DisplayMetrics,
}

impl DisplayResult {
    pub fn empty(page: usize, page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page,
            page_size,
            has_more: false,
            metrics: DisplayMetrics::default(),
        }
    }
}

/// The three homepage sections, each already ordered and capped to its slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomepageSections {
    pub featured: Vec<Listing>,
    pub premium: Vec<Listing>,
    pub regular: Vec<Listing>,
}

/// Category page output: highlighted tier block plus the standard paginated
/// section. The two are disjoint by listing id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySections {
    pub highlighted: Vec<Listing>,
    pub standard: DisplayResult,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::Duration;

    /// Active listing on the given tier, published `age_days` ago.
    pub fn listing(plan: PlanTier, age_days: i64) -> Listing {
        let now = Utc::now();
        let published = now - Duration::days(age_days);
        Listing {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            plan,
            title: "iPhone 13 Pro".to_string(),
            description: "Lightly used, original box and charger".to_string(),
            tags: vec!["apple".to_string(), "smartphone".to_string()],
            price: 3500.0,
            condition: Condition::Good,
            category_id: Uuid::new_v4(),
            subcategory_id: None,
            location: ListingLocation {
                country: "BR".to_string(),
                state: "SP".to_string(),
                city: "São Paulo".to_string(),
                geo: None,
            },
            status: ListingStatus::Active,
            created_at: published,
            updated_at: published,
            published_at: Some(published),
            expires_at: None,
            views: 0,
            favorites: 0,
            contacts: 0,
            display: DisplaySettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_constants_ordering() {
        let tiers = [
            PlanTier::Free,
            PlanTier::Basic,
            PlanTier::Premium,
            PlanTier::Featured,
            PlanTier::Enterprise,
        ];
        for pair in tiers.windows(2) {
            assert!(pair[0].priority_score() < pair[1].priority_score());
            assert!(pair[0].display_probability() < pair[1].display_probability());
        }
        assert_eq!(PlanTier::Enterprise.display_probability(), 1.0);
    }

    #[test]
    fn test_tier_groups() {
        assert!(!PlanTier::Basic.is_premium());
        assert!(PlanTier::Premium.is_premium());
        assert!(!PlanTier::Premium.is_highlight());
        assert!(PlanTier::Featured.is_highlight());
        assert!(PlanTier::Enterprise.is_highlight());
    }

    #[test]
    fn test_matches_query_is_case_insensitive() {
        let listing = fixtures::listing(PlanTier::Free, 0);
        assert!(listing.matches_query("IPHONE"));
        assert!(listing.matches_query("original box"));
        assert!(listing.matches_query("SmartPhone")); // tag match
        assert!(!listing.matches_query("bicycle"));
    }

    #[test]
    fn test_listing_serde_round_trip() {
        let listing = fixtures::listing(PlanTier::Featured, 3);
        let json = serde_json::to_string(&listing).unwrap();
        assert!(json.contains("\"plan\":\"featured\""));
        assert!(json.contains("\"status\":\"active\""));
        let back: Listing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, listing);
    }

    #[test]
    fn test_display_settings_default_priority() {
        assert_eq!(DisplaySettings::default().priority, 1.0);
    }

    #[test]
    fn test_sort_order_serde_names() {
        assert_eq!(
            serde_json::to_string(&SortOrder::PriceAsc).unwrap(),
            "\"price_asc\""
        );
        let sort: SortOrder = serde_json::from_str("\"date_desc\"").unwrap();
        assert_eq!(sort, SortOrder::DateDesc);
    }
}
