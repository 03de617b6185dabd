// src/density/estimator.rs

use crate::density::{
    bandwidth::{self, BandwidthSelection, KernelTerms},
    config::{BandwidthMode, KdeConfig},
    field::{DensityCell, DensityField},
    grid::EvaluationGrid,
};
use crate::math::{
    error::*,
    geometry::sphere::{DirectionalSample, SampleSet},
    types::*,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Kerndichteschätzer auf der Kugel mit von Mises–Fisher-Kern.
///
/// Die Auswertung ist eine reine Funktion von Stichprobe, Bandbreite und Gitter;
/// die Zeilen des Gitters werden parallel berechnet.
#[derive(Debug, Clone)]
pub struct SphericalKde {
    config: KdeConfig,
}

impl SphericalKde {
    pub fn new(config: KdeConfig) -> MathResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KdeConfig {
        &self.config
    }

    /// Bandbreitenwahl allein, ohne Gitterauswertung
    pub fn select_bandwidth(&self, samples: &SampleSet) -> MathResult<BandwidthSelection> {
        bandwidth::select_bandwidth(&samples.unit_vectors(), self.config.bandwidth, &self.config.cv)
    }

    /// Gitter gemäß Konfiguration: ganze Kugel oder aufgepolsterte Stichproben-Box
    pub fn evaluation_grid(&self, samples: &SampleSet) -> MathResult<EvaluationGrid> {
        let grid = if self.config.full_sphere {
            EvaluationGrid::full_sphere(self.config.grid_size)?
        } else {
            EvaluationGrid::around_samples(samples, self.config.grid_size, self.config.padding_deg)?
        };
        debug!(bounds = %grid.bounds(), size = grid.size(), "Evaluation grid built");
        Ok(grid)
    }

    /// Dichteschätzung auf dem konfigurierten Gitter.
    pub fn estimate_density(&self, samples: &SampleSet) -> MathResult<DensityField> {
        let grid = self.evaluation_grid(samples)?;
        self.estimate_on_grid(samples, &grid)
    }

    /// Dichteschätzung auf einem vorgegebenen Gitter (z. B. gemeinsames Gitter mehrerer Gruppen).
    pub fn estimate_on_grid(
        &self,
        samples: &SampleSet,
        grid: &EvaluationGrid,
    ) -> MathResult<DensityField> {
        let vectors = samples.unit_vectors();
        let selection =
            bandwidth::select_bandwidth(&vectors, self.config.bandwidth, &self.config.cv)?;
        let field = evaluate_grid(&vectors, grid, selection.bandwidth)?;

        info!(
            samples = samples.len(),
            grid_size = grid.size(),
            bandwidth = selection.bandwidth,
            "Spherical density estimated"
        );
        Ok(field)
    }

    /// Dichte an einer einzelnen Richtung, normiert wie eine Gitterzelle.
    pub fn density_at(
        &self,
        samples: &SampleSet,
        point: &DirectionalSample,
        bandwidth: f64,
    ) -> MathResult<DensityCell> {
        self.density_at_vector(samples, &point.to_unit_vector(), bandwidth)
    }

    /// Wie [`Self::density_at`], aber für einen beliebigen Einheitsvektor.
    pub fn density_at_vector(
        &self,
        samples: &SampleSet,
        point: &Point3D,
        bandwidth: f64,
    ) -> MathResult<DensityCell> {
        let Some(terms) = KernelTerms::new(bandwidth)? else {
            return Ok(DensityCell::Missing);
        };
        let vectors = samples.unit_vectors();
        Ok(DensityCell::from_raw(
            kernel_sum(&vectors, point, &terms) / self.config.grid_size as f64,
        ))
    }
}

/// Kurzform: Dichtefeld mit Standardpolsterung und Standardsuche.
pub fn estimate_density(
    samples: &SampleSet,
    bandwidth: BandwidthMode,
    grid_size: usize,
    full_sphere: bool,
) -> MathResult<DensityField> {
    let config = KdeConfig::new()
        .with_bandwidth(bandwidth)
        .with_grid_size(grid_size)
        .with_full_sphere(full_sphere);
    SphericalKde::new(config)?.estimate_density(samples)
}

/// Σ_k exp(x_k·y / h² + ln cpk)
#[inline]
fn kernel_sum(vectors: &[Point3D], y: &Point3D, terms: &KernelTerms) -> f64 {
    vectors.iter().map(|x| terms.ln_kernel(x.dot(y)).exp()).sum()
}

/// Wertet die Kernsumme für jede Gitterzelle aus.
///
/// Die Summe wird durch die Gittergröße geteilt, nicht durch n; absolute Werte
/// sind damit nur innerhalb einer Gittergröße vergleichbar. Ist schon 1/h²
/// nicht darstellbar, sind alle Zellen `Missing`.
pub(crate) fn evaluate_grid(
    vectors: &[Point3D],
    grid: &EvaluationGrid,
    bandwidth: f64,
) -> MathResult<DensityField> {
    let size = grid.size();
    let Some(terms) = KernelTerms::new(bandwidth)? else {
        warn!(bandwidth, "Kernel concentration overflows; all cells marked missing");
        return Ok(DensityField::new(
            grid.clone(),
            vec![DensityCell::Missing; size * size],
            bandwidth,
        ));
    };
    let divisor = size as f64;

    let rows: Vec<Vec<DensityCell>> = (0..size)
        .into_par_iter()
        .map(|i| {
            grid.row_vectors(i)
                .iter()
                .map(|y| DensityCell::from_raw(kernel_sum(vectors, y, &terms) / divisor))
                .collect()
        })
        .collect();

    let field = DensityField::new(grid.clone(), rows.concat(), bandwidth);
    let missing = field.missing_cells();
    if missing > 0 {
        warn!(
            missing,
            bandwidth, "Kernel sum overflowed; cells marked missing"
        );
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::sphere::SphereSampler;
    use crate::math::probability::SeedConfig;
    use approx::assert_relative_eq;

    fn clustered_samples() -> SampleSet {
        SphereSampler::von_mises_fisher(10.0, -40.0, 20.0, SeedConfig::from_seed(77))
            .unwrap()
            .sample_set(200)
            .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected_before_computation() {
        let err = SphericalKde::new(KdeConfig::new().with_grid_size(1)).unwrap_err();
        assert!(matches!(err, MathError::InvalidInput { .. }));
        assert!(err.is_invalid_input());

        let err = SphericalKde::new(KdeConfig::new().with_bandwidth(BandwidthMode::Fixed(-0.5)))
            .unwrap_err();
        assert!(matches!(err, MathError::InvalidConfiguration { .. }));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_field_shape_and_non_negativity() {
        let kde = SphericalKde::new(
            KdeConfig::new()
                .with_bandwidth(BandwidthMode::Fixed(0.3))
                .with_grid_size(12),
        )
        .unwrap();
        let field = kde.estimate_density(&clustered_samples()).unwrap();

        assert_eq!(field.shape(), (12, 12));
        assert_eq!(field.cells().len(), 144);
        assert_eq!(field.missing_cells(), 0);
        assert!(field.cells().iter().all(|c| c.value().unwrap() >= 0.0));
        assert_eq!(field.bandwidth(), 0.3);
    }

    #[test]
    fn test_grid_cell_matches_direct_formula() {
        let samples = SampleSet::from_internal([(40.0, 10.0), (60.0, 30.0), (50.0, 20.0)]).unwrap();
        let h: f64 = 0.5;
        let kde = SphericalKde::new(
            KdeConfig::new()
                .with_bandwidth(BandwidthMode::Fixed(h))
                .with_grid_size(4)
                .with_full_sphere(true),
        )
        .unwrap();
        let field = kde.estimate_density(&samples).unwrap();

        let (lat, lon) = field.cell_coordinates(1, 2).unwrap();
        let y = crate::math::geometry::sphere::embed_degrees(lat, lon);
        let cpk = 1.0
            / (h * std::f64::consts::TAU.powf(1.5)
                * crate::math::probability::bessel::bessel_i_half(1.0 / (h * h)).unwrap());
        let expected: f64 = samples
            .unit_vectors()
            .iter()
            .map(|x| (x.dot(&y) / (h * h) + cpk.ln()).exp())
            .sum::<f64>()
            / 4.0;

        assert_relative_eq!(field.value(1, 2).unwrap(), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_density_at_matches_grid_cell() {
        let samples = clustered_samples();
        let kde = SphericalKde::new(
            KdeConfig::new()
                .with_bandwidth(BandwidthMode::Fixed(0.2))
                .with_grid_size(8),
        )
        .unwrap();
        let field = kde.estimate_density(&samples).unwrap();
        let (lat, lon) = field.cell_coordinates(3, 5).unwrap();

        let point = DirectionalSample::new(lat, lon).unwrap();
        let cell = kde.density_at(&samples, &point, 0.2).unwrap();
        assert_relative_eq!(cell.value().unwrap(), field.value(3, 5).unwrap(), max_relative = 1e-12);
    }

    #[test]
    fn test_tiny_bandwidth_does_not_abort() {
        let samples = SampleSet::from_internal([(90.0, 180.0), (90.0, 180.5)]).unwrap();
        let kde = SphericalKde::new(
            KdeConfig::new()
                .with_bandwidth(BandwidthMode::Fixed(1e-3))
                .with_grid_size(5),
        )
        .unwrap();
        let field = kde.estimate_density(&samples).unwrap();
        assert_eq!(field.cells().len(), 25);
        assert!(field.cells().iter().filter_map(|c| c.value()).all(|v| v >= 0.0));
    }

    #[test]
    fn test_overflowing_bandwidth_marks_every_cell_missing() {
        let samples = clustered_samples();
        let field = estimate_density(&samples, BandwidthMode::Fixed(1e-160), 6, false).unwrap();

        assert_eq!(field.shape(), (6, 6));
        assert_eq!(field.missing_cells(), 36);
        assert_eq!(field.argmax(), None);
        assert_eq!(field.bandwidth(), 1e-160);

        let kde = SphericalKde::new(KdeConfig::new().with_grid_size(6)).unwrap();
        let point = DirectionalSample::from_public(-40.0, 20.0).unwrap();
        assert_eq!(kde.density_at(&samples, &point, 1e-160).unwrap(), DensityCell::Missing);
    }

    #[test]
    fn test_free_function_uses_defaults() {
        let samples = clustered_samples();
        let field = estimate_density(&samples, BandwidthMode::RuleOfThumb, 10, true).unwrap();
        assert_eq!(field.latitudes()[0], 0.0);
        assert_eq!(field.longitudes()[9], 360.0);
        assert!(estimate_density(&samples, BandwidthMode::RuleOfThumb, 1, true).is_err());
    }
}
