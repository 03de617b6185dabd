// src/math/geometry/sphere/mod.rs

// Deklaration der Untermodule für Kugel-spezifische Funktionalität
pub mod coordinates;
pub mod rotation;
pub mod sampling;

// Re-Exporte für den einfachen Zugriff auf die wichtigsten Kugel-Elemente
pub use self::coordinates::{DirectionalSample, SampleSet, angular_distance, embed_degrees};
pub use self::rotation::SphereRotation;
pub use self::sampling::{SphereSampler, SphereSamplingMethod};
