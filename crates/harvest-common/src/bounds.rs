//! Geographic bounds of a named harvest region.

use serde::{Deserialize, Serialize};

use crate::error::BoundsError;

pub const SOUTH_POLE_LAT: f64 = -90.0;
pub const NORTH_POLE_LAT: f64 = 90.0;
pub const LON_ORIGIN: f64 = 0.0;
pub const LON_FULL_CIRCLE: f64 = 360.0;

/// Latitude/longitude bounds of a region on a 0..360 east-positive grid.
///
/// Longitudes are walked eastward from `east_lon` to `west_lon`. When the
/// column of `east_lon` lies beyond the column of `west_lon` the region
/// crosses the 0/360 seam.
///
/// Missing keys fall back to the global extents, so `{}` is the whole globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    #[serde(default = "default_min_lat", alias = "south_lat")]
    pub min_lat: f64,
    #[serde(default = "default_max_lat", alias = "north_lat")]
    pub max_lat: f64,
    #[serde(default = "default_east_lon")]
    pub east_lon: f64,
    #[serde(default = "default_west_lon")]
    pub west_lon: f64,
}

fn default_min_lat() -> f64 {
    SOUTH_POLE_LAT
}

fn default_max_lat() -> f64 {
    NORTH_POLE_LAT
}

fn default_east_lon() -> f64 {
    LON_ORIGIN
}

fn default_west_lon() -> f64 {
    LON_FULL_CIRCLE
}

impl RegionBounds {
    pub fn new(min_lat: f64, max_lat: f64, east_lon: f64, west_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            east_lon,
            west_lon,
        }
    }

    /// The whole globe.
    pub fn global() -> Self {
        Self::new(SOUTH_POLE_LAT, NORTH_POLE_LAT, LON_ORIGIN, LON_FULL_CIRCLE)
    }

    /// Check that the bounds describe a selection on the globe.
    pub fn validate(&self) -> Result<(), BoundsError> {
        for (name, value) in [
            ("min_lat", self.min_lat),
            ("max_lat", self.max_lat),
            ("east_lon", self.east_lon),
            ("west_lon", self.west_lon),
        ] {
            if !value.is_finite() {
                return Err(BoundsError::NotFinite(name));
            }
        }

        for (name, value) in [("min_lat", self.min_lat), ("max_lat", self.max_lat)] {
            if !(SOUTH_POLE_LAT..=NORTH_POLE_LAT).contains(&value) {
                return Err(BoundsError::LatitudeOutOfRange { name, value });
            }
        }

        if self.min_lat > self.max_lat {
            return Err(BoundsError::InvertedLatitudes {
                min_lat: self.min_lat,
                max_lat: self.max_lat,
            });
        }

        for (name, value) in [("east_lon", self.east_lon), ("west_lon", self.west_lon)] {
            if !(LON_ORIGIN..=LON_FULL_CIRCLE).contains(&value) {
                return Err(BoundsError::LongitudeOutOfRange { name, value });
            }
        }

        Ok(())
    }

    /// Check whether a latitude lies inside the (inclusive) latitude band.
    pub fn contains_lat(&self, lat: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat
    }
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self::global()
    }
}
