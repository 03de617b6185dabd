// src/math/geometry/sphere/rotation.rs

use crate::math::{error::*, geometry::sphere::coordinates::*, types::*, utils::*};

/// Starre Rotation der Kugel (Wrapper um [`nalgebra::Rotation3`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereRotation {
    rotation: Rotation3<f64>,
}

impl SphereRotation {
    /// Erstellt eine Rotation aus Achse und Winkel (Radiant)
    pub fn from_axis_angle(axis: Point3D, angle: f64) -> MathResult<Self> {
        let axis = Unit::try_new(axis, constants::EPSILON).ok_or_else(|| {
            MathError::invalid_configuration("Rotation axis cannot be zero vector")
        })?;

        Ok(Self {
            rotation: Rotation3::from_axis_angle(&axis, angle),
        })
    }

    /// Rotation, die `from` auf `to` abbildet (beide werden normiert).
    ///
    /// Für entgegengesetzte Vektoren wird um eine beliebige dazu senkrechte Achse
    /// um π gedreht.
    pub fn between(from: &Point3D, to: &Point3D) -> MathResult<Self> {
        if from.norm() < constants::EPSILON || to.norm() < constants::EPSILON {
            return Err(MathError::invalid_configuration(
                "Cannot rotate between zero vectors",
            ));
        }

        if let Some(rotation) = Rotation3::rotation_between(from, to) {
            return Ok(Self { rotation });
        }

        // Vektoren sind entgegengesetzt
        let from_normalized = from.normalize();
        let orthogonal = if from_normalized.x.abs() < 0.9 {
            Point3D::x()
        } else {
            Point3D::y()
        };
        Self::from_axis_angle(from_normalized.cross(&orthogonal), constants::PI)
    }

    pub fn inverse(&self) -> Self {
        Self {
            rotation: self.rotation.inverse(),
        }
    }

    pub fn rotate_vector(&self, vector: &Point3D) -> Point3D {
        self.rotation.transform_vector(vector)
    }

    pub fn rotate_sample(&self, sample: &DirectionalSample) -> MathResult<DirectionalSample> {
        DirectionalSample::from_vector(&self.rotate_vector(&sample.to_unit_vector()))
    }

    pub fn rotate_sample_set(&self, samples: &SampleSet) -> MathResult<SampleSet> {
        let rotated = samples
            .iter()
            .map(|s| self.rotate_sample(s))
            .collect::<MathResult<Vec<_>>>()?;
        SampleSet::new(rotated)
    }
}
