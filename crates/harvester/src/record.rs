//! Harvested output records.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use harvest_common::{Statistic, SurfaceCategory};
use serde::Serialize;

use crate::config::Regions;

/// Value of one harvested statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HarvestValue {
    /// The whole globe (no regions configured).
    Scalar(f64),
    /// One value per configured region, in configuration order.
    PerRegion(Vec<f64>),
}

impl HarvestValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::PerRegion(_) => None,
        }
    }

    pub fn per_region(&self) -> Option<&[f64]> {
        match self {
            Self::Scalar(_) => None,
            Self::PerRegion(values) => Some(values),
        }
    }
}

/// One statistic of one variable over a batch of forecast files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarvestRecord {
    pub filenames: Vec<PathBuf>,
    pub statistic: Statistic,
    pub variable: String,
    pub value: HarvestValue,
    pub units: String,
    pub mediantime: DateTime<Utc>,
    pub longname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_mask: Option<SurfaceCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Regions>,
}

impl HarvestRecord {
    /// Value for a named region, or the scalar value when no regions were configured.
    pub fn region_value(&self, region: &str) -> Option<f64> {
        match (&self.value, &self.regions) {
            (HarvestValue::Scalar(v), None) => Some(*v),
            (HarvestValue::PerRegion(values), Some(regions)) => regions
                .get_index_of(region)
                .and_then(|i| values.get(i).copied()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use harvest_common::RegionBounds;

    fn record(value: HarvestValue, regions: Option<Regions>) -> HarvestRecord {
        HarvestRecord {
            filenames: vec![PathBuf::from("bfg_1994010100_fhr03_control.nc")],
            statistic: Statistic::Mean,
            variable: "tmp2m".to_string(),
            value,
            units: "K".to_string(),
            mediantime: Utc.with_ymd_and_hms(1994, 1, 1, 1, 30, 0).unwrap(),
            longname: "2m temperature".to_string(),
            surface_mask: None,
            regions,
        }
    }

    #[test]
    fn test_region_value() {
        let regions = Regions::from([
            ("south".to_string(), RegionBounds::new(-90.0, 0.0, 0.0, 360.0)),
            ("north".to_string(), RegionBounds::new(0.0, 90.0, 0.0, 360.0)),
        ]);
        let r = record(HarvestValue::PerRegion(vec![270.0, 280.0]), Some(regions));
        assert_eq!(r.region_value("north"), Some(280.0));
        assert_eq!(r.region_value("tropics"), None);
        assert_eq!(r.value.as_scalar(), None);

        let r = record(HarvestValue::Scalar(275.0), None);
        assert_eq!(r.region_value("anything"), Some(275.0));
    }
}
