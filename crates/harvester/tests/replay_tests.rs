//! Harvests over real replay files. Skipped when the files are not present.
#![cfg(feature = "netcdf")]

use bfg_dataset::NetCdfOpener;
use chrono::{TimeZone, Utc};
use harvester::{HarvestRequest, HarvestSettings, Harvester, Regions};
use harvest_common::RegionBounds;
use test_utils::{
    assert_approx_eq, require_test_file, require_test_files, PRATEB_REPLAY_FILES,
    REPLAY_GRIDCELL_AREA_FILE,
};

/// Global mean of `prateb_ave` over the eight replay files, in kg/m**2/s.
const PRATEB_REPLAY_MEAN: f64 = 3.117385391676263e-05;

fn settings() -> Option<HarvestSettings> {
    let path = test_utils::find_test_file(REPLAY_GRIDCELL_AREA_FILE)?;
    Some(HarvestSettings {
        gridcell_area_path: path,
        ..HarvestSettings::default()
    })
}

#[test]
fn test_replay_bucket_precipitation_mean() {
    let _ = require_test_file!(REPLAY_GRIDCELL_AREA_FILE);
    let filenames = require_test_files!(
        PRATEB_REPLAY_FILES[0],
        PRATEB_REPLAY_FILES[1],
        PRATEB_REPLAY_FILES[2],
        PRATEB_REPLAY_FILES[3],
        PRATEB_REPLAY_FILES[4],
        PRATEB_REPLAY_FILES[5],
        PRATEB_REPLAY_FILES[6],
        PRATEB_REPLAY_FILES[7],
    );
    let Some(settings) = settings() else { return };

    let harvester = Harvester::new(NetCdfOpener, settings);
    let records = harvester
        .harvest_request(HarvestRequest {
            filenames,
            statistic: vec!["mean".to_string(), "minimum".to_string()],
            variable: vec!["prateb_ave".to_string()],
            surface_mask: None,
            regions: None,
        })
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].units, "kg/m**2/s");

    let mean = records[0].value.as_scalar().unwrap();
    assert_approx_eq!(mean, PRATEB_REPLAY_MEAN, PRATEB_REPLAY_MEAN * 1e-3);
    assert!(records[1].value.as_scalar().unwrap() >= 0.0);

    // the 3 h windows cover 1994-01-01 00Z to 1994-01-02 00Z
    let midday = Utc.with_ymd_and_hms(1994, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(records[0].mediantime, midday);
    assert_eq!(records[1].mediantime, midday);
}

#[test]
fn test_replay_hemispheres() {
    let _ = require_test_file!(REPLAY_GRIDCELL_AREA_FILE);
    let filenames = require_test_files!(PRATEB_REPLAY_FILES[0], PRATEB_REPLAY_FILES[1]);
    let Some(settings) = settings() else { return };

    let harvester = Harvester::new(NetCdfOpener, settings);
    let records = harvester
        .harvest_request(HarvestRequest {
            filenames,
            statistic: vec!["mean".to_string()],
            variable: vec!["prateb_ave".to_string()],
            surface_mask: None,
            regions: Some(Regions::from([
                ("north".to_string(), RegionBounds::new(0.0, 90.0, 0.0, 360.0)),
                ("south".to_string(), RegionBounds::new(-90.0, 0.0, 0.0, 360.0)),
            ])),
        })
        .unwrap();

    let values = records[0].value.per_region().unwrap();
    assert_eq!(values.len(), 2);
    assert!(values.iter().all(|v| *v > 0.0));
}
