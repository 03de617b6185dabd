//! Kerndichteschätzung auf der Kugel mit dem von Mises–Fisher-Kern.
//!
//! Richtungsdaten (Breite/Länge) werden als Einheitsvektoren eingebettet, eine
//! Bandbreite wird gewählt (Kreuzvalidierung, Faustregel oder fest) und die
//! Kernsumme auf einem regulären Breiten-/Längen-Gitter ausgewertet.
//!
//! ```no_run
//! use spherical_kde::prelude::*;
//!
//! let samples = SphereSampler::von_mises_fisher(0.0, 0.0, 10.0, SeedConfig::from_seed(1))?
//!     .sample_set(1000)?;
//!
//! let kde = SphericalKde::new(
//!     KdeConfig::new()
//!         .with_bandwidth(BandwidthMode::RuleOfThumb)
//!         .with_grid_size(50),
//! )?;
//! let field = kde.estimate_density(&samples)?;
//! println!("{field}");
//! # Ok::<(), MathError>(())
//! ```

pub mod density;
pub mod math;

pub mod prelude {
    pub use crate::density::{
        BandwidthMode, BandwidthSelection, CombineOp, CvSearch, DensityCell, DensityField,
        EvaluationGrid, KdeConfig, SphericalKde, estimate_density,
    };
    pub use crate::math::prelude::*;
}
