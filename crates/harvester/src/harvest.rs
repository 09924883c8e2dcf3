//! Harvest orchestration.
//!
//! One harvest call loads the grid geometry, resolves the configured regions,
//! opens every forecast file as one time series, and then for each variable:
//! resolves it, applies surface masks, averages it over time, and computes the
//! requested statistics per region. Any failure aborts the call; files are
//! closed on every exit path when the dataset handles go out of scope.

use bfg_dataset::{DatasetOpener, ForecastFile, MfDataset};
use chrono::{DateTime, Utc};
use harvest_common::SurfaceCategory;
use tracing::{debug, info, warn};

use crate::config::{HarvestConfig, HarvestRequest, HarvestSettings};
use crate::error::{HarvestError, Result};
use crate::geometry::GridGeometry;
use crate::mask::{is_land_only, mask_variable};
use crate::record::{HarvestRecord, HarvestValue};
use crate::region::{self, RegionIndex};
use crate::stats::{self, check_weight_conservation, temporal_mean};
use crate::temporal::representative_time;
use crate::variables::{resolve_variable, VariableSpec};

/// A region resolved to its grid cells and their weights.
struct RegionWindow {
    index: RegionIndex,
    cells: Vec<usize>,
    weights: Vec<f64>,
}

/// Harvests statistics from forecast files opened through `O`.
pub struct Harvester<O: DatasetOpener> {
    opener: O,
    settings: HarvestSettings,
}

impl<O: DatasetOpener> Harvester<O> {
    pub fn new(opener: O, settings: HarvestSettings) -> Self {
        Self { opener, settings }
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    /// Validate a raw request and harvest it.
    pub fn harvest_request(&self, request: HarvestRequest) -> Result<Vec<HarvestRecord>> {
        let config = HarvestConfig::try_from(request)?;
        self.harvest(&config)
    }

    /// Produce one record per (variable, statistic), variables outermost.
    pub fn harvest(&self, config: &HarvestConfig) -> Result<Vec<HarvestRecord>> {
        self.settings
            .validate()
            .map_err(HarvestError::configuration)?;

        info!(
            files = config.filenames().len(),
            variables = ?config.variables(),
            statistics = ?config.statistics(),
            surface_mask = ?config.surface_mask(),
            "Starting harvest"
        );

        let geometry = self.load_geometry()?;
        let windows = self.region_windows(config, &geometry)?;

        let dataset = MfDataset::open(&self.opener, config.filenames())?;
        let mediantime = representative_time(&dataset.times()?)?;
        debug!(mediantime = %mediantime, "Representative time");

        let needs_categories = config.surface_mask().is_some()
            || config.variables().iter().any(|v| is_land_only(v));
        let categories = if needs_categories {
            self.read_categories(&dataset)?
        } else {
            None
        };

        let mut records = Vec::with_capacity(config.variables().len() * config.statistics().len());
        for variable in config.variables() {
            let spec = self.prepare_variable(
                &dataset,
                variable,
                config.surface_mask(),
                categories.as_deref(),
                &geometry,
            )?;
            records.extend(self.variable_records(config, &spec, &windows, mediantime)?);
        }

        info!(records = records.len(), "Harvest complete");
        Ok(records)
    }

    fn load_geometry(&self) -> Result<GridGeometry> {
        let file = self.opener.open(&self.settings.gridcell_area_path)?;
        GridGeometry::load(&file, &self.settings)
    }

    /// Resolve regions and check each selection's weights.
    fn region_windows(
        &self,
        config: &HarvestConfig,
        geometry: &GridGeometry,
    ) -> Result<Vec<RegionWindow>> {
        region::resolve(config.regions(), geometry)?
            .into_iter()
            .map(|index| -> Result<RegionWindow> {
                let cells = index.cells();
                let weights = geometry.weights_at(&cells);
                check_weight_conservation(
                    &format!("region '{}'", index.name),
                    weights.iter().sum(),
                    cells.len(),
                    geometry.len(),
                    self.settings.conservation_tolerance,
                )?;
                debug!(
                    region = %index.name,
                    lat = ?index.lat_indices(),
                    east_idx = index.east_idx(),
                    west_idx = index.west_idx(),
                    wrapping = index.is_wrapping(),
                    "Resolved region"
                );
                Ok(RegionWindow {
                    index,
                    cells,
                    weights,
                })
            })
            .collect()
    }

    fn read_categories<F: ForecastFile>(&self, dataset: &MfDataset<F>) -> Result<Option<Vec<f64>>> {
        let name = &self.settings.category_field;
        if !dataset.has_variable(name) {
            return Ok(None);
        }
        Ok(Some(dataset.field(name)?.values))
    }

    fn prepare_variable<F: ForecastFile>(
        &self,
        dataset: &MfDataset<F>,
        variable: &str,
        surface_mask: Option<SurfaceCategory>,
        categories: Option<&[f64]>,
        geometry: &GridGeometry,
    ) -> Result<VariableSpec> {
        let mut spec = resolve_variable(dataset, variable)?;
        geometry.check_shape(variable, spec.spatial_shape())?;

        if is_land_only(variable) {
            match categories {
                Some(categories) => {
                    mask_variable(&mut spec, categories, SurfaceCategory::Land)?;
                }
                None => warn!(
                    variable = %variable,
                    field = %self.settings.category_field,
                    "No surface category field, land-only variable left unmasked"
                ),
            }
        }

        if let Some(requested) = surface_mask {
            let categories = categories.ok_or_else(|| {
                HarvestError::missing_field(variable, self.settings.category_field.as_str())
            })?;
            mask_variable(&mut spec, categories, requested)?;
        }

        Ok(spec)
    }

    fn variable_records(
        &self,
        config: &HarvestConfig,
        spec: &VariableSpec,
        windows: &[RegionWindow],
        mediantime: DateTime<Utc>,
    ) -> Result<Vec<HarvestRecord>> {
        let (means, valid) = temporal_mean(
            &spec.values,
            &spec.valid,
            spec.time_steps(),
            spec.plane_len(),
        );

        let statistics = config.statistics();
        let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(windows.len()); statistics.len()];

        for window in windows {
            let x: Vec<f64> = window.cells.iter().map(|&c| means[c]).collect();
            let ok: Vec<bool> = window.cells.iter().map(|&c| valid[c]).collect();
            let mean = stats::weighted_mean(&x, &ok, &window.weights).map(|m| m.mean);

            for (k, statistic) in statistics.iter().enumerate() {
                let value = stats::compute(*statistic, &x, &ok, &window.weights, mean)
                    .ok_or_else(|| {
                        HarvestError::insufficient_data(&spec.name, &window.index.name, statistic)
                    })?;
                values[k].push(value);
            }

            debug!(
                variable = %spec.name,
                region = %window.index.name,
                cells = window.cells.len(),
                valid = ok.iter().filter(|v| **v).count(),
                "Computed statistics"
            );
        }

        Ok(statistics
            .iter()
            .zip(values)
            .map(|(statistic, values)| HarvestRecord {
                filenames: config.filenames().to_vec(),
                statistic: *statistic,
                variable: spec.name.clone(),
                value: match config.regions() {
                    Some(_) => HarvestValue::PerRegion(values),
                    None => HarvestValue::Scalar(values[0]),
                },
                units: spec.units.clone(),
                mediantime,
                longname: spec.long_name.clone(),
                surface_mask: config.surface_mask(),
                regions: config.regions().cloned(),
            })
            .collect())
    }
}
