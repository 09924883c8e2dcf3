//! Enumerated keywords accepted in a harvest configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseKindError;

/// A descriptive statistic the harvester can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Mean,
    Variance,
    Minimum,
    Maximum,
}

impl Statistic {
    pub const ALL: [Statistic; 4] = [
        Statistic::Mean,
        Statistic::Variance,
        Statistic::Minimum,
        Statistic::Maximum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Variance => "variance",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
        }
    }
}

impl FromStr for Statistic {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Self::Mean),
            "variance" => Ok(Self::Variance),
            "minimum" => Ok(Self::Minimum),
            "maximum" => Ok(Self::Maximum),
            other => Err(ParseKindError {
                kind: "statistic",
                value: other.to_string(),
                expected: "mean, variance, minimum, maximum".to_string(),
            }),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surface type as encoded by the categorical land/sea/ice field.
///
/// The category field is ordinal, not a bitmask: 0 = ocean, 1 = land, 2 = ice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceCategory {
    Ocean,
    Land,
    Ice,
}

impl SurfaceCategory {
    /// Value of this category in the categorical field.
    pub fn code(&self) -> i64 {
        match self {
            Self::Ocean => 0,
            Self::Land => 1,
            Self::Ice => 2,
        }
    }

    /// Category for a raw field value, if the value encodes one.
    pub fn from_code(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        match value.round() as i64 {
            0 => Some(Self::Ocean),
            1 => Some(Self::Land),
            2 => Some(Self::Ice),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ocean => "ocean",
            Self::Land => "land",
            Self::Ice => "ice",
        }
    }
}

impl FromStr for SurfaceCategory {
    type Err = ParseKindError;

    /// `sea` and `water` are accepted as synonyms of `ocean`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ocean" | "sea" | "water" => Ok(Self::Ocean),
            "land" => Ok(Self::Land),
            "ice" => Ok(Self::Ice),
            _ => Err(ParseKindError {
                kind: "surface mask",
                value: s.to_string(),
                expected: "land, ocean (sea, water), ice".to_string(),
            }),
        }
    }
}

impl fmt::Display for SurfaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistic_round_trips_through_str() {
        for stat in Statistic::ALL {
            assert_eq!(stat.as_str().parse::<Statistic>().unwrap(), stat);
        }
    }

    #[test]
    fn test_statistic_rejects_std() {
        let err = "std".parse::<Statistic>().unwrap_err();
        assert_eq!(err.value, "std");
        assert!(err.to_string().contains("statistic"));
    }

    #[test]
    fn test_surface_category_aliases() {
        assert_eq!("water".parse::<SurfaceCategory>().unwrap(), SurfaceCategory::Ocean);
        assert_eq!("sea".parse::<SurfaceCategory>().unwrap(), SurfaceCategory::Ocean);
        assert_eq!("LAND".parse::<SurfaceCategory>().unwrap(), SurfaceCategory::Land);
        assert!("swamp".parse::<SurfaceCategory>().is_err());
    }

    #[test]
    fn test_surface_category_codes() {
        assert_eq!(SurfaceCategory::from_code(0.0), Some(SurfaceCategory::Ocean));
        assert_eq!(SurfaceCategory::from_code(1.0), Some(SurfaceCategory::Land));
        assert_eq!(SurfaceCategory::from_code(2.0), Some(SurfaceCategory::Ice));
        assert_eq!(SurfaceCategory::from_code(16.0), None);
        assert_eq!(SurfaceCategory::from_code(f64::NAN), None);
    }
}
