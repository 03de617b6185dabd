// src/math/geometry/sphere/coordinates.rs

use crate::math::{error::*, types::*, utils::*};
use serde::{Deserialize, Serialize};

/// Versatz zwischen öffentlicher (-90..90) und interner (0..180) Breite.
pub const LATITUDE_OFFSET_DEG: f64 = 90.0;
/// Versatz zwischen öffentlicher (-180..180) und interner (0..360) Länge.
pub const LONGITUDE_OFFSET_DEG: f64 = 180.0;

/// Eine Richtung auf der Einheitskugel in interner Konvention (Grad).
///
/// `latitude` ist der Polarwinkel zur +Z-Achse in [0, 180], `longitude` der
/// Azimut in [0, 360]. Die öffentliche Konvention (Breite -90..90, Länge
/// -180..180) wird über einen festen Versatz von +90°/+180° abgebildet.
///
/// Die Felder sind nur über [`Self::new`] und Co. setzbar; auch die
/// Deserialisierung läuft über die Bereichsprüfung.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDirection")]
pub struct DirectionalSample {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawDirection {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawDirection> for DirectionalSample {
    type Error = MathError;

    fn try_from(raw: RawDirection) -> MathResult<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl DirectionalSample {
    /// Erstellt eine Richtung aus internen Koordinaten
    pub fn new(latitude: f64, longitude: f64) -> MathResult<Self> {
        check_internal_domain(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Polarwinkel in Grad, [0, 180]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Azimut in Grad, [0, 360]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Erstellt eine Richtung aus öffentlichen Koordinaten (Breite -90..90, Länge -180..180)
    pub fn from_public(latitude: f64, longitude: f64) -> MathResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(MathError::invalid_input(format!(
                "Latitude {latitude} outside public domain [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(MathError::invalid_input(format!(
                "Longitude {longitude} outside public domain [-180, 180]"
            )));
        }

        let (latitude, longitude) = to_internal_degrees(latitude, longitude);
        Self::new(latitude, longitude)
    }

    /// Rückgabe in öffentlicher Konvention als (Breite, Länge)
    pub fn to_public(&self) -> (f64, f64) {
        to_public_degrees(self.latitude, self.longitude)
    }

    /// Einbettung als Einheitsvektor
    pub fn to_unit_vector(&self) -> Point3D {
        embed_degrees(self.latitude, self.longitude)
    }

    /// Erstellt eine Richtung aus einem (nicht notwendig normierten) Vektor
    pub fn from_vector(vector: &Point3D) -> MathResult<Self> {
        let length = vector.norm();
        if !length.is_finite() || length < constants::EPSILON {
            return Err(MathError::invalid_input(
                "Cannot derive a direction from a zero or non-finite vector",
            ));
        }

        let unit = vector / length;
        let latitude = unit.z.clamp(-1.0, 1.0).acos().to_degrees();
        let longitude = angles::normalize_degrees(unit.y.atan2(unit.x).to_degrees());

        Self::new(latitude, longitude)
    }

    /// Großkreis-Abstand in Radiant
    pub fn angular_distance(&self, other: &DirectionalSample) -> f64 {
        angular_distance(&self.to_unit_vector(), &other.to_unit_vector())
    }
}

fn check_internal_domain(latitude: f64, longitude: f64) -> MathResult<()> {
    if !latitude.is_finite() || !(0.0..=180.0).contains(&latitude) {
        return Err(MathError::invalid_input(format!(
            "Latitude {latitude} outside internal domain [0, 180]"
        )));
    }
    if !longitude.is_finite() || !(0.0..=360.0).contains(&longitude) {
        return Err(MathError::invalid_input(format!(
            "Longitude {longitude} outside internal domain [0, 360]"
        )));
    }
    Ok(())
}

/// Interne Grad-Koordinaten in öffentliche umrechnen.
pub fn to_public_degrees(latitude: f64, longitude: f64) -> (f64, f64) {
    (
        latitude - LATITUDE_OFFSET_DEG,
        longitude - LONGITUDE_OFFSET_DEG,
    )
}

/// Öffentliche Grad-Koordinaten in interne umrechnen (ohne Bereichsprüfung).
pub fn to_internal_degrees(latitude: f64, longitude: f64) -> (f64, f64) {
    (
        latitude + LATITUDE_OFFSET_DEG,
        longitude + LONGITUDE_OFFSET_DEG,
    )
}

/// x = (sin(lat)·cos(lon), sin(lat)·sin(lon), cos(lat)), Eingabe in Grad.
///
/// Ohne Bereichsprüfung: Gitterpunkte eines aufgepolsterten Rechtecks dürfen
/// außerhalb des internen Wertebereichs liegen.
#[inline]
pub fn embed_degrees(latitude: f64, longitude: f64) -> Point3D {
    let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
    let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();
    Point3D::new(sin_lat * cos_lon, sin_lat * sin_lon, cos_lat)
}

/// Winkel zwischen zwei Richtungen in Radiant
pub fn angular_distance(a: &Point3D, b: &Point3D) -> f64 {
    // atan2 bleibt auch für fast parallele Vektoren genau
    a.cross(b).norm().atan2(a.dot(b))
}

/// Geordnete, unveränderliche Menge von Richtungen mit mindestens zwei Elementen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSampleSet")]
pub struct SampleSet {
    samples: Vec<DirectionalSample>,
}

#[derive(Deserialize)]
struct RawSampleSet {
    samples: Vec<DirectionalSample>,
}

impl TryFrom<RawSampleSet> for SampleSet {
    type Error = MathError;

    fn try_from(raw: RawSampleSet) -> MathResult<Self> {
        Self::new(raw.samples)
    }
}

impl SampleSet {
    pub const MIN_SAMPLES: usize = 2;

    pub fn new(samples: Vec<DirectionalSample>) -> MathResult<Self> {
        if samples.len() < Self::MIN_SAMPLES {
            return Err(MathError::InsufficientPoints {
                expected: Self::MIN_SAMPLES,
                actual: samples.len(),
            });
        }
        for sample in &samples {
            check_internal_domain(sample.latitude, sample.longitude)?;
        }

        Ok(Self { samples })
    }

    /// Erstellt die Menge aus internen (Breite, Länge)-Paaren
    pub fn from_internal<I>(coordinates: I) -> MathResult<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let samples = coordinates
            .into_iter()
            .map(|(lat, lon)| DirectionalSample::new(lat, lon))
            .collect::<MathResult<Vec<_>>>()?;
        Self::new(samples)
    }

    /// Erstellt die Menge aus öffentlichen (Breite, Länge)-Paaren
    pub fn from_public<I>(coordinates: I) -> MathResult<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let samples = coordinates
            .into_iter()
            .map(|(lat, lon)| DirectionalSample::from_public(lat, lon))
            .collect::<MathResult<Vec<_>>>()?;
        Self::new(samples)
    }

    /// Erstellt die Menge aus Vektoren (werden normiert)
    pub fn from_vectors(vectors: &[Point3D]) -> MathResult<Self> {
        let samples = vectors
            .iter()
            .map(DirectionalSample::from_vector)
            .collect::<MathResult<Vec<_>>>()?;
        Self::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DirectionalSample> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[DirectionalSample] {
        &self.samples
    }

    pub fn unit_vectors(&self) -> Vec<Point3D> {
        self.samples.iter().map(|s| s.to_unit_vector()).collect()
    }

    /// Umschließende Box in interner Konvention
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::from_lat_lon(self.samples.iter().map(|s| (s.latitude(), s.longitude())))
            .unwrap_or_else(GeoBounds::full_sphere)
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a DirectionalSample;
    type IntoIter = std::slice::Iter<'a, DirectionalSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
