// src/math/probability/von_mises_fisher.rs

use crate::math::{
    error::*,
    geometry::sphere::{coordinates::*, rotation::SphereRotation},
    probability::bessel,
    types::*,
    utils::*,
};
use rand::Rng;
use rand::distr::OpenClosed01;
use rand_distr::{Distribution, UnitCircle};
use tracing::trace;

/// Von Mises–Fisher-Verteilung auf der Einheitskugel S².
///
/// Dichte: f(x) = κ / (4π·sinh κ) · exp(κ·μᵀx)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VonMisesFisher {
    mean: Unit<Point3D>,
    kappa: f64,
}

impl VonMisesFisher {
    const NEWTON_TOLERANCE: f64 = 1e-7;
    const NEWTON_MAX_ITERATIONS: usize = 100;

    /// Erstellt die Verteilung aus mittlerer Richtung (wird normiert) und Konzentration κ ≥ 0
    pub fn new(mean: Point3D, kappa: f64) -> MathResult<Self> {
        if !kappa.is_finite() || kappa < 0.0 {
            return Err(MathError::invalid_configuration(format!(
                "Concentration must be finite and non-negative, got {kappa}"
            )));
        }
        let mean = Unit::try_new(mean, constants::EPSILON).ok_or_else(|| {
            MathError::invalid_configuration("Mean direction cannot be zero vector")
        })?;

        Ok(Self { mean, kappa })
    }

    pub fn from_direction(mean: &DirectionalSample, kappa: f64) -> MathResult<Self> {
        Self::new(mean.to_unit_vector(), kappa)
    }

    pub fn mean(&self) -> Point3D {
        self.mean.into_inner()
    }

    pub fn mean_direction(&self) -> MathResult<DirectionalSample> {
        DirectionalSample::from_vector(&self.mean())
    }

    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// ln C₃(κ) mit C₃(κ) = κ / (4π·sinh κ); für κ → 0 die Gleichverteilung 1/(4π)
    pub fn ln_normalizer(&self) -> f64 {
        let ln_uniform = -(2.0 * constants::TAU).ln();
        if self.kappa < 1e-8 {
            ln_uniform
        } else {
            self.kappa.ln() + ln_uniform - numerical::ln_sinh(self.kappa)
        }
    }

    pub fn ln_pdf(&self, x: &Point3D) -> f64 {
        self.ln_normalizer() + self.kappa * self.mean.dot(x)
    }

    pub fn pdf(&self, x: &Point3D) -> f64 {
        self.ln_pdf(x).exp()
    }

    /// Zieht `count` Einheitsvektoren (Wood-Algorithmus, für S² geschlossen lösbar).
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> MathResult<Vec<Point3D>> {
        let to_mean = SphereRotation::between(&Point3D::z(), &self.mean())?;
        let decay = (-2.0 * self.kappa).exp();

        Ok((0..count)
            .map(|_| {
                let u: f64 = OpenClosed01.sample(rng);
                // Komponente entlang der mittleren Richtung
                let w = if self.kappa < 1e-8 {
                    2.0 * u - 1.0
                } else {
                    (1.0 + (u + (1.0 - u) * decay).ln() / self.kappa).clamp(-1.0, 1.0)
                };
                let [tx, ty]: [f64; 2] = UnitCircle.sample(rng);
                let radial = (1.0 - w * w).max(0.0).sqrt();
                to_mean.rotate_vector(&Point3D::new(radial * tx, radial * ty, w))
            })
            .collect())
    }

    /// Maximum-Likelihood-Schätzung von mittlerer Richtung und κ.
    pub fn fit(samples: &SampleSet) -> MathResult<Self> {
        Self::fit_vectors(&samples.unit_vectors())
    }

    /// Wie [`Self::fit`], aber direkt auf Einheitsvektoren.
    ///
    /// Startwert nach Banerjee et al., danach Newton-Iteration auf A₃(κ) = R̄.
    pub fn fit_vectors(vectors: &[Point3D]) -> MathResult<Self> {
        if vectors.len() < SampleSet::MIN_SAMPLES {
            return Err(MathError::InsufficientPoints {
                expected: SampleSet::MIN_SAMPLES,
                actual: vectors.len(),
            });
        }

        let resultant: Point3D = vectors.iter().sum();
        let r_bar = resultant.norm() / vectors.len() as f64;

        if comparison::nearly_zero(r_bar) {
            return Err(MathError::numerical(
                "vMF fit: mean resultant length vanishes, mean direction undefined",
            ));
        }
        if r_bar >= 1.0 - constants::EPSILON {
            return Err(MathError::numerical(
                "vMF fit: all samples coincide, concentration is unbounded",
            ));
        }

        let mut kappa = r_bar * (3.0 - r_bar * r_bar) / (1.0 - r_bar * r_bar);
        for iteration in 0..Self::NEWTON_MAX_ITERATIONS {
            let derivative = bessel::mean_resultant_length_derivative(kappa);
            if derivative <= 0.0 || !derivative.is_finite() {
                break;
            }
            let mut next = kappa - (bessel::mean_resultant_length(kappa) - r_bar) / derivative;
            if next <= 0.0 {
                next = kappa * 0.5;
            }
            let step = (next - kappa).abs();
            kappa = next;
            if step < Self::NEWTON_TOLERANCE {
                trace!(iteration, kappa, "vMF fit converged");
                break;
            }
        }

        if !kappa.is_finite() {
            return Err(MathError::numerical("vMF fit: concentration diverged"));
        }

        Self::new(resultant, kappa)
    }
}
