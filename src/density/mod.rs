// src/density/mod.rs

pub mod bandwidth;
pub mod config;
pub mod estimator;
pub mod field;
pub mod grid;
pub mod partition;

pub use bandwidth::BandwidthSelection;
pub use config::{BandwidthMode, CvSearch, KdeConfig};
pub use estimator::{SphericalKde, estimate_density};
pub use field::{DensityCell, DensityField};
pub use grid::EvaluationGrid;
pub use partition::{CombineOp, combine_fields, partition_samples};
