pub mod ratio;
pub mod strategy;
pub mod weighted;

pub use ratio::Ratio;
pub use strategy::{ScoringStrategy, Weights};
pub use weighted::WeightedSum;
