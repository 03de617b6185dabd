pub mod error;
pub mod geometry;
pub mod probability;
pub mod scalar_field;
pub mod types;
pub mod utils;

// Re-exports für einfache Verwendung
pub use error::{MathError, MathResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        error::{MathError, MathResult},
        geometry::sphere::{coordinates::*, rotation::*, sampling::*},
        probability::{SeedConfig, VonMisesFisher},
        scalar_field::ScalarField2D,
        types::*,
    };
}
