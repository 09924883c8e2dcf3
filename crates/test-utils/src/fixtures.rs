//! Common test fixtures for harvester tests.
//!
//! Names follow the NOAA UFS replay background-forecast files.

use chrono::{DateTime, TimeZone, Utc};

/// Latitude coordinate of BFG files.
pub const LAT_NAME: &str = "grid_yt";

/// Longitude coordinate of BFG files.
pub const LON_NAME: &str = "grid_xt";

/// Solid-angle weight variable of the grid-geometry file.
pub const WEIGHT_NAME: &str = "area";

/// Categorical land/sea/ice field.
pub const CATEGORY_FIELD: &str = "slmsk";

/// Path under which generated grid-geometry files are registered.
pub const GEOMETRY_PATH: &str = "gridcell-area_test.nc";

/// Units of the generated time axes.
pub const REFERENCE_UNITS: &str = "hours since 1994-01-01 00:00:00";

/// Reference time of [`REFERENCE_UNITS`].
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1994, 1, 1, 0, 0, 0).unwrap()
}

/// File name of a control-member background forecast, e.g.
/// `bfg_1994010100_fhr09_control.nc`.
pub fn bfg_filename(cycle: &str, forecast_hour: u32) -> String {
    format!("bfg_{}_fhr{:02}_control.nc", cycle, forecast_hour)
}

/// Real replay files behind the 24-hour bucket precipitation reference mean.
///
/// Names are `bfg_<cycle>_fhr<hour>`: 6 h and 9 h forecasts drawn from the cycles
/// from 1994-01-01 00Z to 1994-01-02 00Z. Each file holds one 3 h bucket
/// average and the eight buckets tile 1994-01-01 00Z to 1994-01-02 00Z, so
/// their representative time is 1994-01-01 12Z.
pub const PRATEB_REPLAY_FILES: [&str; 8] = [
    "bfg_1994010100_fhr09_prateb_control.nc",
    "bfg_1994010106_fhr06_prateb_control.nc",
    "bfg_1994010106_fhr09_prateb_control.nc",
    "bfg_1994010112_fhr06_prateb_control.nc",
    "bfg_1994010112_fhr09_prateb_control.nc",
    "bfg_1994010118_fhr06_prateb_control.nc",
    "bfg_1994010118_fhr09_prateb_control.nc",
    "bfg_1994010200_fhr06_prateb_control.nc",
];

/// Grid-geometry reference file of the 1536x768 replay grid.
pub const REPLAY_GRIDCELL_AREA_FILE: &str =
    "gridcell-area_noaa-ufs-gefsv13replay-pds_bfg_control_1536x768_20231116.nc";
