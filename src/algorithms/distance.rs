//! Point-to-point surface distance models
//!
//! The accumulator never assumes a particular earth model; it asks a
//! [`DistanceStrategy`] for the distance between consecutive fixes. The
//! haversine model on a 6,371 km sphere is the default and is what previously
//! recorded totals were computed with.

use crate::core::{Coordinate, MEAN_EARTH_RADIUS_M};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Surface distance between two coordinates, in meters.
///
/// Implementations return a finite, non-negative value for valid coordinates
/// and exactly `0.0` for identical ones.
pub trait DistanceStrategy: Send {
    fn distance_m(&self, from: &Coordinate, to: &Coordinate) -> f64;

    /// Short model name for logs and reports
    fn name(&self) -> &'static str;
}

/// Great-circle distance using the law of haversines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Haversine {
    pub radius_m: f64,
}

impl Haversine {
    pub fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }
}

impl Default for Haversine {
    fn default() -> Self {
        Self::new(MEAN_EARTH_RADIUS_M)
    }
}

impl DistanceStrategy for Haversine {
    fn distance_m(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        let lat1 = from.latitude.to_radians();
        let lat2 = to.latitude.to_radians();
        let d_lat = (to.latitude - from.latitude).to_radians();
        let d_lon = (to.longitude - from.longitude).to_radians();

        let half_chord = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        // Rounding can push the term a hair outside [0, 1] near antipodes
        let half_chord = half_chord.clamp(0.0, 1.0);

        let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
        self.radius_m * angle
    }

    fn name(&self) -> &'static str {
        "haversine"
    }
}

/// Great-circle distance computed from the angle between unit position
/// vectors. Same sphere as [`Haversine`], but stays well conditioned for both
/// tiny and near-antipodal separations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalVector {
    pub radius_m: f64,
}

impl SphericalVector {
    pub fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }

    fn unit_vector(coordinate: &Coordinate) -> Vector3<f64> {
        let lat = coordinate.latitude.to_radians();
        let lon = coordinate.longitude.to_radians();
        Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }
}

impl Default for SphericalVector {
    fn default() -> Self {
        Self::new(MEAN_EARTH_RADIUS_M)
    }
}

impl DistanceStrategy for SphericalVector {
    fn distance_m(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        let a = Self::unit_vector(from);
        let b = Self::unit_vector(to);
        let angle = a.cross(&b).norm().atan2(a.dot(&b));
        self.radius_m * angle
    }

    fn name(&self) -> &'static str {
        "spherical_vector"
    }
}

/// Local flat-earth approximation around the mean latitude of the two points.
/// Accurate to well under a meter for the short hops between consecutive
/// fixes, cheaper than the trigonometry of the great-circle models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    pub radius_m: f64,
}

impl Equirectangular {
    pub fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }
}

impl Default for Equirectangular {
    fn default() -> Self {
        Self::new(MEAN_EARTH_RADIUS_M)
    }
}

impl DistanceStrategy for Equirectangular {
    fn distance_m(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        let mean_lat = ((from.latitude + to.latitude) / 2.0).to_radians();
        let d_lat = (to.latitude - from.latitude).to_radians();
        let mut d_lon = (to.longitude - from.longitude).to_radians();

        // Take the short way across the antimeridian
        if d_lon > PI {
            d_lon -= 2.0 * PI;
        } else if d_lon < -PI {
            d_lon += 2.0 * PI;
        }

        let east = d_lon * mean_lat.cos();
        self.radius_m * (east * east + d_lat * d_lat).sqrt()
    }

    fn name(&self) -> &'static str {
        "equirectangular"
    }
}

/// Configurable selection of a distance model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceModel {
    #[default]
    Haversine,
    SphericalVector,
    Equirectangular,
}

impl DistanceModel {
    /// Build the strategy for this model on a sphere of the given radius
    pub fn build(&self, radius_m: f64) -> Box<dyn DistanceStrategy> {
        match self {
            DistanceModel::Haversine => Box::new(Haversine::new(radius_m)),
            DistanceModel::SphericalVector => Box::new(SphericalVector::new(radius_m)),
            DistanceModel::Equirectangular => Box::new(Equirectangular::new(radius_m)),
        }
    }
}
