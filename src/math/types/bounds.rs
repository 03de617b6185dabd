// src/math/types/bounds.rs

use crate::math::error::*;
use geo::{BoundingRect, Coord, MultiPoint, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Achsenparalleles Breiten-/Längen-Rechteck in Grad.
///
/// Intern ein [`geo::Rect`] mit `x = Längengrad` und `y = Breitengrad`, damit
/// nachgelagerte Geo-Werkzeuge die Grenzen direkt übernehmen können.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct GeoBounds {
    rect: Rect<f64>,
}

#[derive(Deserialize)]
struct RawBounds {
    rect: Rect<f64>,
}

impl TryFrom<RawBounds> for GeoBounds {
    type Error = MathError;

    fn try_from(raw: RawBounds) -> MathResult<Self> {
        let (min, max) = (raw.rect.min(), raw.rect.max());
        Self::new(min.y, max.y, min.x, max.x)
    }
}

impl GeoBounds {
    /// Erstellt neue Grenzen; `min` muss auf beiden Achsen <= `max` sein.
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> MathResult<Self> {
        if ![lat_min, lat_max, lon_min, lon_max]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(MathError::invalid_input("Bounds must be finite"));
        }
        if lat_min > lat_max || lon_min > lon_max {
            return Err(MathError::invalid_input(format!(
                "Invalid bounds: lat [{lat_min}, {lat_max}], lon [{lon_min}, {lon_max}]"
            )));
        }

        Ok(Self {
            rect: Rect::new(
                Coord {
                    x: lon_min,
                    y: lat_min,
                },
                Coord {
                    x: lon_max,
                    y: lat_max,
                },
            ),
        })
    }

    /// Die ganze Kugel in interner Konvention: Breite [0, 180], Länge [0, 360].
    pub fn full_sphere() -> Self {
        Self {
            rect: Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 360.0, y: 180.0 }),
        }
    }

    /// Kleinste Box, die alle (lat, lon)-Paare umschließt.
    pub fn from_lat_lon<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let multi_point: MultiPoint<f64> = points
            .into_iter()
            .map(|(lat, lon)| geo::Point::new(lon, lat))
            .collect();
        multi_point.bounding_rect().map(|rect| Self { rect })
    }

    /// Vergrößert die Box um `padding` Grad auf jeder Seite.
    pub fn expand(&self, padding: f64) -> Self {
        let min = self.rect.min();
        let max = self.rect.max();
        Self {
            rect: Rect::new(
                Coord {
                    x: min.x - padding,
                    y: min.y - padding,
                },
                Coord {
                    x: max.x + padding,
                    y: max.y + padding,
                },
            ),
        }
    }

    pub fn lat_min(&self) -> f64 {
        self.rect.min().y
    }

    pub fn lat_max(&self) -> f64 {
        self.rect.max().y
    }

    pub fn lon_min(&self) -> f64 {
        self.rect.min().x
    }

    pub fn lon_max(&self) -> f64 {
        self.rect.max().x
    }

    pub fn lat_span(&self) -> f64 {
        self.rect.height()
    }

    pub fn lon_span(&self) -> f64 {
        self.rect.width()
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat [{:.3}, {:.3}] x lon [{:.3}, {:.3}]",
            self.lat_min(),
            self.lat_max(),
            self.lon_min(),
            self.lon_max()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bounds_from_points() {
        let bounds =
            GeoBounds::from_lat_lon([(10.0, 200.0), (30.0, 150.0), (20.0, 170.0)]).unwrap();
        assert_abs_diff_eq!(bounds.lat_min(), 10.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bounds.lat_max(), 30.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bounds.lon_min(), 150.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bounds.lon_max(), 200.0, epsilon = 1e-10);
    }

    #[test]
    fn test_bounds_from_empty_iterator() {
        assert!(GeoBounds::from_lat_lon(std::iter::empty()).is_none());
    }

    #[test]
    fn test_expand() {
        let bounds = GeoBounds::new(10.0, 20.0, 30.0, 40.0).unwrap().expand(5.0);
        assert_abs_diff_eq!(bounds.lat_min(), 5.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bounds.lat_max(), 25.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bounds.lon_min(), 25.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bounds.lon_max(), 45.0, epsilon = 1e-10);
        assert_abs_diff_eq!(bounds.lat_span(), 20.0, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(GeoBounds::new(20.0, 10.0, 0.0, 1.0).is_err());
        assert!(GeoBounds::new(0.0, f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_deserialize_rejects_inverted_bounds() {
        let bounds = GeoBounds::new(10.0, 20.0, 30.0, 40.0).unwrap();
        let json = serde_json::to_string(&bounds).unwrap();
        assert_eq!(serde_json::from_str::<GeoBounds>(&json).unwrap(), bounds);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        // Breite max unter Breite min
        value["rect"]["max"]["y"] = serde_json::json!(5.0);
        assert!(serde_json::from_value::<GeoBounds>(value).is_err());
    }

    #[test]
    fn test_full_sphere() {
        let bounds = GeoBounds::full_sphere();
        assert_eq!(bounds.lat_min(), 0.0);
        assert_eq!(bounds.lat_max(), 180.0);
        assert_eq!(bounds.lon_min(), 0.0);
        assert_eq!(bounds.lon_max(), 360.0);
    }
}
