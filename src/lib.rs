//! Plan-tier aware scoring and placement engine for classifieds listings.
//!
//! Pure, synchronous computation over a caller-supplied snapshot: score
//! listings on five weighted factors, probabilistically gate lower tiers,
//! and assemble homepage, search, and category views. Randomized paths take
//! an injected [`rand::Rng`]; time-dependent paths offer explicit-clock
//! variants.

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::{AlgorithmConfig, CategoryConfig, HomepageConfig, ScoreWeights, SearchConfig};
pub use models::{
    CategorySections, Condition, DisplayMetrics, DisplayResult, DisplaySettings, GeoPoint,
    HomepageSections, Listing, ListingLocation, ListingStatus, LocationFilter, PlanTier,
    PriceRange, SearchParams, SortOrder,
};
pub use services::rotation::{rotation_start, rotation_start_at};
pub use services::{
    CategoryAssembler, DisplayGate, DisplayScorer, HomepageAssembler, PlacementError, Result,
    SearchAssembler, SimilarFinder,
};
