// src/density/config.rs
use crate::math::error::{MathError, MathResult};
use serde::{Deserialize, Serialize};

/// Wie die Bandbreite h bestimmt wird.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BandwidthMode {
    /// Datengetrieben: Leave-one-out-Likelihood über [`CvSearch`] maximieren.
    CrossValidation,
    /// Geschlossene Faustregel aus der vMF-ML-Schätzung von κ.
    RuleOfThumb,
    /// Vom Aufrufer vorgegebene Bandbreite.
    Fixed(f64),
}

impl Default for BandwidthMode {
    fn default() -> Self {
        Self::CrossValidation
    }
}

/// Suchintervall und Abbruchkriterien der Kreuzvalidierung.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CvSearch {
    pub lower: f64,
    pub upper: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl CvSearch {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> MathResult<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower <= 0.0 {
            return Err(MathError::invalid_configuration(
                "Bandwidth search interval must be finite and positive",
            ));
        }
        if self.lower >= self.upper {
            return Err(MathError::invalid_configuration(format!(
                "Bandwidth search interval is empty: [{}, {}]",
                self.lower, self.upper
            )));
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(MathError::invalid_configuration(
                "Bandwidth search tolerance must be positive",
            ));
        }
        if self.max_iterations == 0 {
            return Err(MathError::invalid_configuration(
                "Bandwidth search needs at least one iteration",
            ));
        }
        Ok(())
    }
}

impl Default for CvSearch {
    fn default() -> Self {
        Self {
            lower: 0.1,
            upper: 1.0,
            tolerance: 1e-4,
            max_iterations: 100,
        }
    }
}

/// Konfiguration einer Dichteschätzung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdeConfig {
    pub bandwidth: BandwidthMode,
    /// Punkte pro Achse; beide Achsen verwenden dieselbe Anzahl.
    pub grid_size: usize,
    /// Gitter über die ganze Kugel statt über die aufgepolsterte Stichproben-Box.
    pub full_sphere: bool,
    /// Polsterung der Stichproben-Box in Grad.
    pub padding_deg: f64,
    pub cv: CvSearch,
}

impl KdeConfig {
    pub const MIN_GRID_SIZE: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bandwidth(mut self, bandwidth: BandwidthMode) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_full_sphere(mut self, full_sphere: bool) -> Self {
        self.full_sphere = full_sphere;
        self
    }

    pub fn with_padding(mut self, padding_deg: f64) -> Self {
        self.padding_deg = padding_deg;
        self
    }

    pub fn with_cv_search(mut self, cv: CvSearch) -> Self {
        self.cv = cv;
        self
    }

    pub fn validate(&self) -> MathResult<()> {
        if self.grid_size < Self::MIN_GRID_SIZE {
            return Err(MathError::invalid_input(format!(
                "Grid size must be at least {}, got {}",
                Self::MIN_GRID_SIZE,
                self.grid_size
            )));
        }

        if !self.padding_deg.is_finite() || self.padding_deg < 0.0 {
            return Err(MathError::invalid_configuration(
                "Padding must be finite and non-negative",
            ));
        }

        match self.bandwidth {
            BandwidthMode::Fixed(h) if !(h.is_finite() && h > 0.0) => {
                Err(MathError::invalid_configuration(format!(
                    "Fixed bandwidth must be finite and positive, got {h}"
                )))
            }
            BandwidthMode::CrossValidation => self.cv.validate(),
            _ => Ok(()),
        }
    }
}

impl Default for KdeConfig {
    fn default() -> Self {
        Self {
            bandwidth: BandwidthMode::default(),
            grid_size: 100,
            full_sphere: false,
            padding_deg: 5.0,
            cv: CvSearch::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = KdeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_size, 100);
        assert_eq!(config.bandwidth, BandwidthMode::CrossValidation);
        assert_eq!(config.padding_deg, 5.0);
    }

    #[test]
    fn test_grid_size_below_two_is_invalid_input() {
        let err = KdeConfig::new().with_grid_size(1).validate().unwrap_err();
        assert!(matches!(err, MathError::InvalidInput { .. }));
    }

    #[test]
    fn test_fixed_bandwidth_must_be_positive() {
        for h in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let config = KdeConfig::new().with_bandwidth(BandwidthMode::Fixed(h));
            assert!(config.validate().is_err(), "h = {h} accepted");
        }
        assert!(
            KdeConfig::new()
                .with_bandwidth(BandwidthMode::Fixed(0.3))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_cv_interval_checks() {
        assert!(CvSearch::new(0.5, 0.2).validate().is_err());
        assert!(CvSearch::new(0.0, 1.0).validate().is_err());
        assert!(CvSearch::new(0.1, 1.0).with_tolerance(0.0).validate().is_err());

        // Intervall wird nur bei Kreuzvalidierung geprüft
        let config = KdeConfig::new()
            .with_bandwidth(BandwidthMode::RuleOfThumb)
            .with_cv_search(CvSearch::new(0.5, 0.2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_padding_rejected() {
        assert!(KdeConfig::new().with_padding(-1.0).validate().is_err());
    }
}
