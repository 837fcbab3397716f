//! Great-circle distance and bounding boxes over WGS84 coordinates.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for every distance in the directory, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build a point only when both values are finite and inside WGS84 range.
    #[must_use]
    pub fn checked(lat: f64, lng: f64) -> Option<Self> {
        let point = Self { lat, lng };
        point.is_valid().then_some(point)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Distance to `other` in miles.
    #[must_use]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance_miles(self.lat, self.lng, other.lat, other.lng)
    }
}

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Haversine distance between two points, in miles.
///
/// Inputs must be finite decimal degrees; callers filter out records without
/// usable coordinates before reaching this function.
#[must_use]
pub fn distance_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = to_radians(lat2 - lat1);
    let d_lng = to_radians(lng2 - lng1);

    let a = (d_lat / 2.0).sin().powi(2)
        + to_radians(lat1).cos() * to_radians(lat2).cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Axis-aligned lat/lng box grown one point at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl GeoBounds {
    #[must_use]
    pub fn from_point(point: GeoPoint) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self::from_point(first);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: GeoPoint) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }

    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }
}
