//! Harvest configuration.
//!
//! [`HarvestRequest`] is the raw user input as it arrives from YAML or JSON.
//! [`HarvestConfig`] is the validated form; it can only be obtained through
//! `HarvestConfig::try_from(request)`, which checks everything before any file
//! is touched. [`HarvestSettings`] holds the fixed, deployment-level settings.

use std::path::PathBuf;

use harvest_common::{RegionBounds, Statistic, SurfaceCategory};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{HarvestError, Result};
use crate::variables::{is_valid_variable, VALID_VARIABLES};

/// Versioned grid-geometry asset shipped with the harvester.
pub const GRIDCELL_AREA_FILE: &str =
    "gridcell-area_noaa-ufs-gefsv13replay-pds_bfg_control_1536x768_20231116.nc";

/// Relative tolerance of the weight-conservation check (0.1%).
pub const DEFAULT_CONSERVATION_TOLERANCE: f64 = 1e-3;

// ============================================================================
// Regions
// ============================================================================

/// Named regions in the order they were configured.
///
/// Serialized as a mapping `name -> bounds`, keeping the key order of the input.
pub type Regions = IndexMap<String, RegionBounds>;

// ============================================================================
// Request
// ============================================================================

/// `surface_mask` may be given as a single name or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SurfaceMaskInput {
    One(String),
    Many(Vec<String>),
}

impl SurfaceMaskInput {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::One(name) => vec![name.as_str()],
            Self::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// Unvalidated harvest request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarvestRequest {
    /// Forecast files, concatenated along time in this order.
    #[serde(default)]
    pub filenames: Vec<PathBuf>,

    /// Statistic names (`mean`, `variance`, `minimum`, `maximum`).
    #[serde(default)]
    pub statistic: Vec<String>,

    /// Variable names, each drawn from [`VALID_VARIABLES`].
    #[serde(default)]
    pub variable: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_mask: Option<SurfaceMaskInput>,

    #[serde(default, alias = "region", skip_serializing_if = "Option::is_none")]
    pub regions: Option<Regions>,
}

// ============================================================================
// Validated configuration
// ============================================================================

/// A validated harvest configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestConfig {
    filenames: Vec<PathBuf>,
    statistics: Vec<Statistic>,
    variables: Vec<String>,
    surface_mask: Option<SurfaceCategory>,
    regions: Option<Regions>,
}

impl HarvestConfig {
    pub fn filenames(&self) -> &[PathBuf] {
        &self.filenames
    }

    pub fn statistics(&self) -> &[Statistic] {
        &self.statistics
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn surface_mask(&self) -> Option<SurfaceCategory> {
        self.surface_mask
    }

    /// Configured regions; `None` means the whole globe.
    pub fn regions(&self) -> Option<&Regions> {
        self.regions.as_ref()
    }
}

impl TryFrom<HarvestRequest> for HarvestConfig {
    type Error = HarvestError;

    fn try_from(request: HarvestRequest) -> Result<Self> {
        if request.filenames.is_empty() {
            return Err(HarvestError::configuration(
                "at least one forecast file must be given in 'filenames'",
            ));
        }

        if request.statistic.is_empty() {
            return Err(HarvestError::configuration(
                "at least one statistic must be given in 'statistic'",
            ));
        }
        let statistics = request
            .statistic
            .iter()
            .map(|s| s.parse::<Statistic>())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if request.variable.is_empty() {
            return Err(HarvestError::configuration(
                "at least one variable must be given in 'variable'",
            ));
        }
        if let Some(unknown) = request.variable.iter().find(|v| !is_valid_variable(v)) {
            return Err(HarvestError::configuration(format!(
                "'{}' is not a supported variable to harvest from background forecast data; \
                 expected one of: {}",
                unknown,
                VALID_VARIABLES.join(", ")
            )));
        }

        let surface_mask = match &request.surface_mask {
            None => None,
            Some(input) => {
                let masks = input
                    .names()
                    .into_iter()
                    .map(|m| m.parse::<SurfaceCategory>())
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                match masks.as_slice() {
                    [] => None,
                    [mask] => Some(*mask),
                    _ => {
                        return Err(HarvestError::configuration(format!(
                            "only one surface mask can be applied per harvest, got {:?}",
                            input.names()
                        )))
                    }
                }
            }
        };

        if let Some(regions) = &request.regions {
            if regions.is_empty() {
                return Err(HarvestError::configuration(
                    "'regions' is present but names no region",
                ));
            }
            for (name, bounds) in regions.iter() {
                if name.trim().is_empty() {
                    return Err(HarvestError::configuration("region names must not be empty"));
                }
                bounds.validate().map_err(|e| {
                    HarvestError::configuration(format!("region '{}': {}", name, e))
                })?;
            }
        }

        Ok(Self {
            filenames: request.filenames,
            statistics,
            variables: request.variable,
            surface_mask,
            regions: request.regions,
        })
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Deployment-level harvest settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestSettings {
    /// Reference file with grid coordinates and per-cell solid angles.
    pub gridcell_area_path: PathBuf,

    /// Relative tolerance of the weight-conservation check.
    pub conservation_tolerance: f64,

    /// Categorical surface-type field (0 ocean, 1 land, 2 ice).
    pub category_field: String,

    /// Latitude coordinate name.
    pub lat_name: String,

    /// Longitude coordinate name.
    pub lon_name: String,

    /// Solid-angle weight variable in the reference file.
    pub weight_name: String,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            gridcell_area_path: PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("data")
                .join(GRIDCELL_AREA_FILE),
            conservation_tolerance: DEFAULT_CONSERVATION_TOLERANCE,
            category_field: "slmsk".to_string(),
            lat_name: "grid_yt".to_string(),
            lon_name: "grid_xt".to_string(),
            weight_name: "area".to_string(),
        }
    }
}

impl HarvestSettings {
    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(val) = std::env::var("HARVEST_GRIDCELL_AREA_PATH") {
            settings.gridcell_area_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("HARVEST_CONSERVATION_TOLERANCE") {
            if let Ok(tolerance) = val.parse() {
                settings.conservation_tolerance = tolerance;
            }
        }

        if let Ok(val) = std::env::var("HARVEST_CATEGORY_FIELD") {
            settings.category_field = val;
        }

        settings
    }

    /// Validate the settings.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.conservation_tolerance > 0.0 && self.conservation_tolerance < 1.0) {
            return Err("conservation_tolerance must be in (0, 1)".to_string());
        }

        for (key, value) in [
            ("category_field", &self.category_field),
            ("lat_name", &self.lat_name),
            ("lon_name", &self.lon_name),
            ("weight_name", &self.weight_name),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", key));
            }
        }

        Ok(())
    }
}
