// Layout estimation: page geometry, per-section height heuristics, the validator
// built on them, and deterministic single-page compaction.
// Everything here is pure and synchronous.

pub mod compaction;
pub mod estimator;
pub mod geometry;
pub mod validator;

// Re-export the public API consumed by generation, handlers and main.
pub use compaction::compact_for_single_page;
pub use estimator::{HeightTable, HeuristicEstimator};
pub use geometry::PageGeometry;
pub use validator::{DensitySpacing, LayoutValidation, LayoutValidator};
