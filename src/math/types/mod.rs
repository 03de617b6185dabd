// src/math/types/mod.rs
pub mod bounds;

pub use bounds::*;

// Re-export häufig verwendete externe Typen
pub use nalgebra::{Rotation3, Unit, Vector3};

// Einheitliche Typen für das gesamte Modul
pub type Point3D = Vector3<f64>;
