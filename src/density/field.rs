// src/density/field.rs

use crate::density::grid::EvaluationGrid;
use crate::math::{
    error::{MathError, MathResult},
    geometry::sphere::coordinates::to_public_degrees,
    scalar_field::ScalarField2D,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Eine Zelle des Dichtefeldes.
///
/// `Missing` markiert Zellen, deren Kernsumme nicht endlich war (Überlauf);
/// die Berechnung der übrigen Zellen läuft weiter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DensityCell {
    Value(f64),
    Missing,
}

impl DensityCell {
    /// Endliche Werte werden übernommen, alles andere wird `Missing`
    pub fn from_raw(raw: f64) -> Self {
        if raw.is_finite() {
            Self::Value(raw)
        } else {
            Self::Missing
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Ergebnis einer Dichteschätzung: grid_size × grid_size Zellen, zeilenweise
/// (Zeile i = Breite, Spalte j = Länge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawField")]
pub struct DensityField {
    grid: EvaluationGrid,
    cells: Vec<DensityCell>,
    bandwidth: f64,
}

#[derive(Deserialize)]
struct RawField {
    grid: EvaluationGrid,
    cells: Vec<DensityCell>,
    bandwidth: f64,
}

impl TryFrom<RawField> for DensityField {
    type Error = MathError;

    fn try_from(raw: RawField) -> MathResult<Self> {
        let expected = raw.grid.size() * raw.grid.size();
        if raw.cells.len() != expected {
            return Err(MathError::invalid_input(format!(
                "Field needs {expected} cells for its grid, got {}",
                raw.cells.len()
            )));
        }
        if !raw.bandwidth.is_finite() || raw.bandwidth <= 0.0 {
            return Err(MathError::invalid_input(format!(
                "Field bandwidth must be finite and positive, got {}",
                raw.bandwidth
            )));
        }
        if raw.cells.iter().any(|c| c.value().is_some_and(|v| !v.is_finite())) {
            return Err(MathError::invalid_input("Field values must be finite"));
        }

        Ok(Self::new(raw.grid, raw.cells, raw.bandwidth))
    }
}

impl DensityField {
    /// `cells` muss genau `grid.size()²` Einträge in Zeilenordnung enthalten.
    pub(crate) fn new(grid: EvaluationGrid, cells: Vec<DensityCell>, bandwidth: f64) -> Self {
        debug_assert_eq!(cells.len(), grid.size() * grid.size());
        Self {
            grid,
            cells,
            bandwidth,
        }
    }

    pub fn grid(&self) -> &EvaluationGrid {
        &self.grid
    }

    pub fn latitudes(&self) -> &[f64] {
        self.grid.latitudes()
    }

    pub fn longitudes(&self) -> &[f64] {
        self.grid.longitudes()
    }

    /// (Zeilen, Spalten)
    pub fn shape(&self) -> (usize, usize) {
        (self.grid.size(), self.grid.size())
    }

    /// Verwendete Bandbreite; für kombinierte Felder der Mittelwert der Gruppen
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn cells(&self) -> &[DensityCell] {
        &self.cells
    }

    #[inline]
    fn idx(&self, i: usize, j: usize) -> usize {
        i * self.grid.size() + j
    }

    pub fn get(&self, i: usize, j: usize) -> Option<DensityCell> {
        let size = self.grid.size();
        if i >= size || j >= size {
            return None;
        }
        Some(self.cells[self.idx(i, j)])
    }

    /// Wert der Zelle (i, j); `None` außerhalb oder für fehlende Zellen
    pub fn value(&self, i: usize, j: usize) -> Option<f64> {
        self.get(i, j).and_then(|cell| cell.value())
    }

    pub fn row(&self, i: usize) -> &[DensityCell] {
        let size = self.grid.size();
        &self.cells[i * size..(i + 1) * size]
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, DensityCell> {
        self.cells.chunks(self.grid.size())
    }

    /// Anzahl der Zellen mit numerischem Überlauf
    pub fn missing_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// (i, j, Wert) der größten vorhandenen Zelle
    pub fn argmax(&self) -> Option<(usize, usize, f64)> {
        let size = self.grid.size();
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(k, cell)| cell.value().map(|v| (k, v)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, v)| (k / size, k % size, v))
    }

    pub fn max_value(&self) -> Option<f64> {
        self.argmax().map(|(_, _, v)| v)
    }

    /// Gitterkoordinaten (interne Konvention) der Zelle (i, j)
    pub fn cell_coordinates(&self, i: usize, j: usize) -> Option<(f64, f64)> {
        self.grid.cell_coordinates(i, j)
    }

    /// Gitterkoordinaten der Zelle (i, j) in öffentlicher Konvention
    pub fn public_coordinates(&self, i: usize, j: usize) -> Option<(f64, f64)> {
        self.cell_coordinates(i, j)
            .map(|(lat, lon)| to_public_degrees(lat, lon))
    }

    /// Breitengrade in öffentlicher Konvention (-90..90)
    pub fn public_latitudes(&self) -> Vec<f64> {
        self.latitudes()
            .iter()
            .map(|&lat| to_public_degrees(lat, 0.0).0)
            .collect()
    }

    /// Längengrade in öffentlicher Konvention (-180..180)
    pub fn public_longitudes(&self) -> Vec<f64> {
        self.longitudes()
            .iter()
            .map(|&lon| to_public_degrees(0.0, lon).1)
            .collect()
    }

    /// Dichte als Matrix; fehlende Zellen werden zu NaN (für Plot-Bibliotheken)
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.rows()
            .map(|row| row.iter().map(|c| c.value().unwrap_or(f64::NAN)).collect())
            .collect()
    }
}

impl ScalarField2D for DensityField {
    fn width(&self) -> usize {
        self.grid.size()
    }

    fn height(&self) -> usize {
        self.grid.size()
    }

    fn value_at(&self, x_idx: usize, y_idx: usize) -> Option<f64> {
        self.value(y_idx, x_idx)
    }

    fn cell_to_world(&self, x_idx: usize, y_idx: usize) -> Option<(f64, f64)> {
        self.cell_coordinates(y_idx, x_idx)
    }
}

impl fmt::Display for DensityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Grid:        {} x {}", self.grid.size(), self.grid.size())?;
        writeln!(f, "  Bounds:      {}", self.grid.bounds())?;
        writeln!(f, "  Bandwidth:   {:.6}", self.bandwidth)?;
        writeln!(f, "  Missing:     {}", self.missing_cells())?;
        match self.argmax() {
            Some((i, j, v)) => {
                let (lat, lon) = self.public_coordinates(i, j).unwrap_or((f64::NAN, f64::NAN));
                write!(f, "  Peak:        {v:.6} at lat {lat:.3}, lon {lon:.3}")
            }
            None => write!(f, "  Peak:        none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_from(values: &[f64], size: usize) -> DensityField {
        let grid = EvaluationGrid::full_sphere(size).unwrap();
        let cells = values.iter().map(|&v| DensityCell::from_raw(v)).collect();
        DensityField::new(grid, cells, 0.5)
    }

    #[test]
    fn test_cell_from_raw() {
        assert_eq!(DensityCell::from_raw(1.5), DensityCell::Value(1.5));
        assert!(DensityCell::from_raw(f64::INFINITY).is_missing());
        assert!(DensityCell::from_raw(f64::NAN).is_missing());
    }

    #[test]
    fn test_indexing_is_row_major() {
        let field = field_from(&[0.0, 1.0, 2.0, 3.0], 2);
        assert_eq!(field.value(0, 1), Some(1.0));
        assert_eq!(field.value(1, 0), Some(2.0));
        assert_eq!(field.value(2, 0), None);
        assert_eq!(field.row(1), &[DensityCell::Value(2.0), DensityCell::Value(3.0)]);
        assert_eq!(field.value_at(1, 0), Some(1.0));
    }

    #[test]
    fn test_argmax_skips_missing_cells() {
        let field = field_from(&[0.5, f64::INFINITY, 2.0, 1.0], 2);
        assert_eq!(field.missing_cells(), 1);
        assert_eq!(field.argmax(), Some((1, 0, 2.0)));
        assert_eq!(field.value(0, 1), None);
    }

    #[test]
    fn test_matrix_marks_missing_as_nan() {
        let field = field_from(&[0.5, f64::INFINITY, 2.0, 1.0], 2);
        let matrix = field.to_matrix();
        assert!(matrix[0][1].is_nan());
        assert_eq!(matrix[1][1], 1.0);
    }

    #[test]
    fn test_public_axes() {
        let field = field_from(&[0.0; 9], 3);
        assert_eq!(field.public_latitudes(), vec![-90.0, 0.0, 90.0]);
        assert_eq!(field.public_longitudes(), vec![-180.0, 0.0, 180.0]);
        assert_eq!(field.public_coordinates(2, 1), Some((90.0, 0.0)));
    }

    #[test]
    fn test_value_range() {
        let field = field_from(&[0.5, f64::NAN, 2.0, 1.0], 2);
        assert_eq!(field.value_range(), Some((0.5, 2.0)));
    }

    #[test]
    fn test_deserialize_checks_cell_count() {
        let field = field_from(&[0.5, f64::INFINITY, 2.0, 1.0], 2);
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(serde_json::from_str::<DensityField>(&json).unwrap(), field);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["cells"] = serde_json::json!([{ "Value": 1.0 }]);
        let err = serde_json::from_value::<DensityField>(value).unwrap_err();
        assert!(err.to_string().contains("cells"));
    }

    #[test]
    fn test_display_summary() {
        let text = field_from(&[0.5, 0.1, 2.0, 1.0], 2).to_string();
        assert!(text.contains("Grid:        2 x 2"));
        assert!(text.contains("Missing:     0"));
    }
}
