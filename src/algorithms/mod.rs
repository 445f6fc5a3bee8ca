//! Geodesic algorithms

pub mod distance;

pub use distance::{DistanceModel, DistanceStrategy, Equirectangular, Haversine, SphericalVector};
