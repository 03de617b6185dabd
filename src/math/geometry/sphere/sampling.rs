// src/math/geometry/sphere/sampling.rs

use crate::math::{
    error::*, geometry::sphere::coordinates::*, probability::*, types::*, utils::*,
};
use rand::Rng;
use rand::rngs::StdRng;

/// Verschiedene Sampling-Methoden für Kugel-Oberflächen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SphereSamplingMethod {
    /// Uniform verteilte Punkte
    Uniform,
    /// Von Mises–Fisher-verteilte Punkte um eine mittlere Richtung
    VonMisesFisher { mean: DirectionalSample, kappa: f64 },
}

/// Sphere-Sampler für Test- und Demonstrationsdaten
pub struct SphereSampler {
    method: SphereSamplingMethod,
    rng: StdRng,
}

impl SphereSampler {
    /// Erstellt einen Sampler mit explizitem Seed
    pub fn new(method: SphereSamplingMethod, seed: SeedConfig) -> MathResult<Self> {
        if let SphereSamplingMethod::VonMisesFisher { kappa, .. } = method {
            if !kappa.is_finite() || kappa < 0.0 {
                return Err(MathError::invalid_configuration(format!(
                    "Concentration must be finite and non-negative, got {kappa}"
                )));
            }
        }

        Ok(Self {
            method,
            rng: seed.rng(),
        })
    }

    /// Kurzform für vMF-Daten mit öffentlicher Mittelrichtung (Breite, Länge)
    pub fn von_mises_fisher(
        mean_latitude: f64,
        mean_longitude: f64,
        kappa: f64,
        seed: SeedConfig,
    ) -> MathResult<Self> {
        let mean = DirectionalSample::from_public(mean_latitude, mean_longitude)?;
        Self::new(SphereSamplingMethod::VonMisesFisher { mean, kappa }, seed)
    }

    pub fn method(&self) -> SphereSamplingMethod {
        self.method
    }

    /// Generiert eine bestimmte Anzahl von Einheitsvektoren
    pub fn sample_vectors(&mut self, count: usize) -> MathResult<Vec<Point3D>> {
        match self.method {
            SphereSamplingMethod::Uniform => {
                Ok((0..count).map(|_| self.uniform_point()).collect())
            }
            SphereSamplingMethod::VonMisesFisher { mean, kappa } => {
                VonMisesFisher::from_direction(&mean, kappa)?.sample(&mut self.rng, count)
            }
        }
    }

    /// Generiert eine Stichprobe als [`SampleSet`] (interne Konvention)
    pub fn sample_set(&mut self, count: usize) -> MathResult<SampleSet> {
        let vectors = self.sample_vectors(count)?;
        SampleSet::from_vectors(&vectors)
    }

    /// Uniform verteilter Punkt (Marsaglia-Methode)
    fn uniform_point(&mut self) -> Point3D {
        loop {
            let x1: f64 = self.rng.random_range(-1.0..=1.0);
            let x2: f64 = self.rng.random_range(-1.0..=1.0);
            let length_sq = x1 * x1 + x2 * x2;

            if length_sq < 1.0 && length_sq > constants::EPSILON {
                let factor = 2.0 * (1.0 - length_sq).sqrt();
                return Point3D::new(x1 * factor, x2 * factor, 1.0 - 2.0 * length_sq);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_sampling() {
        let mut sampler =
            SphereSampler::new(SphereSamplingMethod::Uniform, SeedConfig::from_seed(42)).unwrap();
        let points = sampler.sample_vectors(1000).unwrap();

        assert_eq!(points.len(), 1000);

        // Alle Punkte sollten auf der Einheitskugel liegen
        for point in &points {
            assert_relative_eq!(point.norm(), 1.0, max_relative = 1e-12);
        }

        let centroid: Point3D = points.iter().sum::<Point3D>() / points.len() as f64;
        assert!(centroid.norm() < 0.1);
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let a = SphereSampler::von_mises_fisher(10.0, 20.0, 5.0, SeedConfig::from_seed(1))
            .unwrap()
            .sample_set(50)
            .unwrap();
        let b = SphereSampler::von_mises_fisher(10.0, 20.0, 5.0, SeedConfig::from_seed(1))
            .unwrap()
            .sample_set(50)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_vmf_sample_set_centered_on_public_mean() {
        let mut sampler =
            SphereSampler::von_mises_fisher(-30.0, 120.0, 50.0, SeedConfig::from_seed(8)).unwrap();
        let samples = sampler.sample_set(2000).unwrap();
        let mean = DirectionalSample::from_public(-30.0, 120.0).unwrap();

        let fitted = VonMisesFisher::fit(&samples).unwrap();
        let fitted_mean = fitted.mean_direction().unwrap();
        assert!(fitted_mean.angular_distance(&mean).to_degrees() < 1.0);
    }

    #[test]
    fn test_invalid_concentration_rejected() {
        let method = SphereSamplingMethod::VonMisesFisher {
            mean: DirectionalSample::new(90.0, 180.0).unwrap(),
            kappa: -2.0,
        };
        assert!(SphereSampler::new(method, SeedConfig::from_seed(0)).is_err());
    }
}
