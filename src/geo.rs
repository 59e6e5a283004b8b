use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::cost_matrix::Node;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Planar distance, treating lat/lng as Cartesian coordinates.
/// No unit conversion; only meaningful for small synthetic maps.
pub fn euclidean_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;
    (dlat * dlat + dlng * dlng).sqrt()
}

/// Great-circle distance using the haversine formula.
/// Input lat/lng in degrees. Output in kilometers.
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (lat1, lng1, lat2, lng2) = (
        lat1.to_radians(),
        lng1.to_radians(),
        lat2.to_radians(),
        lng2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    #[default]
    Euclidean,
    Haversine,
}

impl Metric {
    pub fn between(&self, lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
        match self {
            Metric::Euclidean => euclidean_distance(lat1, lng1, lat2, lng2),
            Metric::Haversine => haversine_distance(lat1, lng1, lat2, lng2),
        }
    }

    pub fn distance(&self, a: &Node, b: &Node) -> f64 {
        self.between(a.lat, a.lng, b.lat, b.lng)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown metric {0:?}, possible options are: (\"euclidean\", \"haversine\")")]
pub struct ParseMetricError(pub String);

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "haversine" => Ok(Metric::Haversine),
            _ => Err(ParseMetricError(s.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Euclidean => write!(f, "euclidean"),
            Metric::Haversine => write!(f, "haversine"),
        }
    }
}
