// src/density/grid.rs

use crate::math::{
    error::*,
    geometry::sphere::{SampleSet, embed_degrees},
    types::*,
    utils::numerical,
};
use serde::{Deserialize, Serialize};

/// Reguläres Breiten-/Längen-Gitter in interner Konvention (Grad).
///
/// Zelle (i, j) liegt bei (`latitudes[i]`, `longitudes[j]`); beide Achsen
/// enthalten ihre Endpunkte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct EvaluationGrid {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    bounds: GeoBounds,
}

#[derive(Deserialize)]
struct RawGrid {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    bounds: GeoBounds,
}

impl TryFrom<RawGrid> for EvaluationGrid {
    type Error = MathError;

    /// Beide Achsen gleich lang (>= 2) und endlich, sonst wäre die Feldform inkonsistent
    fn try_from(raw: RawGrid) -> MathResult<Self> {
        if raw.latitudes.len() != raw.longitudes.len() || raw.latitudes.len() < 2 {
            return Err(MathError::invalid_input(format!(
                "Grid axes must have equal length >= 2, got {} and {}",
                raw.latitudes.len(),
                raw.longitudes.len()
            )));
        }
        if !raw
            .latitudes
            .iter()
            .chain(&raw.longitudes)
            .all(|v| v.is_finite())
        {
            return Err(MathError::invalid_input("Grid breakpoints must be finite"));
        }

        Ok(Self {
            latitudes: raw.latitudes,
            longitudes: raw.longitudes,
            bounds: raw.bounds,
        })
    }
}

impl EvaluationGrid {
    /// Gitter mit `size` Punkten pro Achse über `bounds`
    pub fn from_bounds(bounds: GeoBounds, size: usize) -> MathResult<Self> {
        if size < 2 {
            return Err(MathError::invalid_input(format!(
                "Grid size must be at least 2, got {size}"
            )));
        }

        Ok(Self {
            latitudes: numerical::linspace(bounds.lat_min(), bounds.lat_max(), size),
            longitudes: numerical::linspace(bounds.lon_min(), bounds.lon_max(), size),
            bounds,
        })
    }

    /// Ganze Kugel: Breite [0, 180] × Länge [0, 360]
    pub fn full_sphere(size: usize) -> MathResult<Self> {
        Self::from_bounds(GeoBounds::full_sphere(), size)
    }

    /// [min(lat) − padding, max(lat) + padding] × [min(lon) − padding, max(lon) + padding]
    pub fn around_samples(samples: &SampleSet, size: usize, padding_deg: f64) -> MathResult<Self> {
        Self::from_bounds(samples.bounds().expand(padding_deg), size)
    }

    /// Anzahl der Punkte pro Achse
    pub fn size(&self) -> usize {
        self.latitudes.len()
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn lat_spacing(&self) -> f64 {
        self.bounds.lat_span() / (self.size() - 1) as f64
    }

    pub fn lon_spacing(&self) -> f64 {
        self.bounds.lon_span() / (self.size() - 1) as f64
    }

    pub fn cell_coordinates(&self, i: usize, j: usize) -> Option<(f64, f64)> {
        Some((*self.latitudes.get(i)?, *self.longitudes.get(j)?))
    }

    pub fn cell_vector(&self, i: usize, j: usize) -> Option<Point3D> {
        self.cell_coordinates(i, j)
            .map(|(lat, lon)| embed_degrees(lat, lon))
    }

    /// Einbettungen aller Zellen einer Zeile
    pub fn row_vectors(&self, i: usize) -> Vec<Point3D> {
        let lat = self.latitudes[i];
        self.longitudes
            .iter()
            .map(|&lon| embed_degrees(lat, lon))
            .collect()
    }

    /// Index der Zelle, die (lat, lon) am nächsten liegt (achsenweise)
    pub fn nearest_cell(&self, lat: f64, lon: f64) -> (usize, usize) {
        (nearest_index(&self.latitudes, lat), nearest_index(&self.longitudes, lon))
    }
}

fn nearest_index(values: &[f64], target: f64) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - target).abs().total_cmp(&(*b - target).abs()))
        .map(|(index, _)| index)
        .unwrap_or(0)
}
