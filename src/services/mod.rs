pub mod gate;
pub mod placement;
pub mod rotation;
pub mod scoring;
pub mod similar;

pub use gate::DisplayGate;
pub use placement::{CategoryAssembler, HomepageAssembler, SearchAssembler};
pub use scoring::DisplayScorer;
pub use similar::SimilarFinder;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("score weights must sum to 1.0, got {0}")]
    InvalidWeights(f64),

    #[error("rotation requires at least one eligible listing")]
    EmptyRotationPool,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PlacementError>;
