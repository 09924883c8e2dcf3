//! Variable resolution.
//!
//! Turns a requested variable name into values over (time, lat, lon) plus the
//! descriptive metadata carried into harvest records. Most names map straight
//! to a field of the same name; the names in [`DERIVATIONS`] are computed from
//! one or more component fields.

use bfg_dataset::{Field, ForecastFile, MfDataset};
use tracing::{debug, warn};

use crate::error::{HarvestError, Result};

/// Placeholder for metadata a field does not declare.
pub const MISSING_METADATA: &str = "None";

/// Variables that can be harvested from background forecast data.
pub const VALID_VARIABLES: &[&str] = &[
    "icetk",        // sea ice thickness (m)
    "lhtfl_ave",    // surface latent heat flux (W m^-2)
    "shtfl_ave",    // surface sensible heat flux (W m^-2)
    "dswrf_ave",    // surface downward shortwave flux (W m^-2)
    "dlwrf_ave",    // surface downward longwave flux (W m^-2)
    "uswrf_ave",    // surface upward shortwave flux (W m^-2)
    "ulwrf_ave",    // surface upward longwave flux (W m^-2)
    "netef_ave",    // surface energy balance (W m^-2)
    "dswrf_avetoa", // top of atmosphere downward shortwave flux (W m^-2)
    "uswrf_avetoa", // top of atmosphere upward shortwave flux (W m^-2)
    "ulwrf_avetoa", // top of atmosphere upward longwave flux (W m^-2)
    "netrf_avetoa", // top of atmosphere net radiative flux (W m^-2)
    "prate_ave",    // surface precipitation rate (kg m^-2 s^-1)
    "prateb_ave",   // bucket surface precipitation rate (kg m^-2 s^-1)
    "pressfc",      // surface pressure (Pa)
    "snod",         // surface snow depth (m)
    "soill4",       // liquid soil moisture at layer 4
    "soilm",        // total column soil moisture content (kg m^-2)
    "soilt4",       // soil temperature at layer 4 (K)
    "tg3",          // deep soil temperature (K)
    "tmp2m",        // 2 m air temperature (K)
    "tmpsfc",       // surface temperature (K)
    "weasd",        // surface snow water equivalent (kg m^-2)
    "sst",          // sea surface temperature (K)
    "nsst",         // near sea surface temperature (K)
];

pub fn is_valid_variable(name: &str) -> bool {
    VALID_VARIABLES.contains(&name)
}

// ============================================================================
// Derivations
// ============================================================================

/// A variable computed from component fields.
#[derive(Debug)]
pub struct Derivation {
    pub name: &'static str,
    pub long_name: &'static str,
    pub units: &'static str,
    /// Component fields, in the order `combine` receives them.
    pub fields: &'static [&'static str],
    pub combine: fn(&[f64]) -> f64,
}

/// Registered derived variables.
pub const DERIVATIONS: &[Derivation] = &[
    Derivation {
        name: "netef_ave",
        long_name: "surface energy balance",
        units: "W/m**2",
        fields: &[
            "dswrf_ave",
            "dlwrf_ave",
            "ulwrf_ave",
            "uswrf_ave",
            "shtfl_ave",
            "lhtfl_ave",
        ],
        combine: surface_energy_balance,
    },
    Derivation {
        name: "netrf_avetoa",
        long_name: "Top of atmosphere net radiative flux",
        units: "W/m**2",
        fields: &["dswrf_avetoa", "uswrf_avetoa", "ulwrf_avetoa"],
        combine: toa_net_radiative_flux,
    },
    Derivation {
        name: "sst",
        long_name: "sea surface temperature",
        units: "K",
        fields: &["tmpsfc"],
        combine: identity,
    },
    Derivation {
        name: "nsst",
        long_name: "near sea surface temperature",
        units: "K",
        fields: &["tref"],
        combine: identity,
    },
];

/// (dswrf + dlwrf) - (ulwrf + uswrf + shtfl + lhtfl)
fn surface_energy_balance(c: &[f64]) -> f64 {
    c[0] + c[1] - c[2] - c[3] - c[4] - c[5]
}

/// dswrf_toa - uswrf_toa - ulwrf_toa
fn toa_net_radiative_flux(c: &[f64]) -> f64 {
    c[0] - c[1] - c[2]
}

fn identity(c: &[f64]) -> f64 {
    c[0]
}

pub fn derivation(name: &str) -> Option<&'static Derivation> {
    DERIVATIONS.iter().find(|d| d.name == name)
}

// ============================================================================
// Resolution
// ============================================================================

/// A resolved variable: values over (time, lat, lon) with explicit validity.
#[derive(Debug, Clone)]
pub struct VariableSpec {
    pub name: String,
    pub long_name: String,
    pub units: String,
    /// (time, lat, lon)
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
    /// `false` where a value is fill, missing, non-finite, or masked out.
    pub valid: Vec<bool>,
    /// Value written into cells that are masked out.
    pub missing_value: f64,
}

impl VariableSpec {
    /// Number of time samples.
    pub fn time_steps(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Shape of one time sample.
    pub fn spatial_shape(&self) -> &[usize] {
        self.shape.get(1..).unwrap_or(&[])
    }

    /// Number of values in one time sample.
    pub fn plane_len(&self) -> usize {
        self.spatial_shape().iter().product()
    }

    fn from_field(field: Field, long_name: String, units: String) -> Self {
        let valid = field.validity();
        let missing_value = field.declared_missing().unwrap_or(f64::NAN);
        Self {
            name: field.name,
            long_name,
            units,
            shape: field.shape,
            values: field.values,
            valid,
            missing_value,
        }
    }
}

/// Resolve `name` against `dataset`.
pub fn resolve_variable<F: ForecastFile>(dataset: &MfDataset<F>, name: &str) -> Result<VariableSpec> {
    match derivation(name) {
        Some(derivation) => derive(dataset, derivation),
        None => read_plain(dataset, name),
    }
}

fn read_plain<F: ForecastFile>(dataset: &MfDataset<F>, name: &str) -> Result<VariableSpec> {
    if !dataset.has_variable(name) {
        return Err(HarvestError::missing_field(name, name));
    }
    let field = dataset.field(name)?;

    let long_name = field.long_name().map(str::to_string).unwrap_or_else(|| {
        warn!(variable = %name, "No long_name attribute");
        MISSING_METADATA.to_string()
    });
    let units = field.units().map(str::to_string).unwrap_or_else(|| {
        warn!(variable = %name, "No units attribute");
        MISSING_METADATA.to_string()
    });

    debug!(variable = %name, shape = ?field.shape, "Read variable");
    Ok(VariableSpec::from_field(field, long_name, units))
}

fn derive<F: ForecastFile>(dataset: &MfDataset<F>, derivation: &Derivation) -> Result<VariableSpec> {
    if let Some(missing) = derivation.fields.iter().find(|f| !dataset.has_variable(f)) {
        return Err(HarvestError::missing_field(derivation.name, *missing));
    }

    let components = derivation
        .fields
        .iter()
        .map(|f| dataset.field(f))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let shape = components[0].shape.clone();
    if let Some(other) = components.iter().find(|c| c.shape != shape) {
        return Err(HarvestError::grid_mismatch(format!(
            "'{}' has shape {:?} but '{}' has shape {:?}",
            other.name, other.shape, components[0].name, shape
        )));
    }

    let validity: Vec<Vec<bool>> = components.iter().map(Field::validity).collect();
    let len = components[0].len();
    let mut values = Vec::with_capacity(len);
    let mut valid = Vec::with_capacity(len);
    let mut inputs = vec![0.0; components.len()];

    for i in 0..len {
        if validity.iter().all(|v| v[i]) {
            for (slot, component) in inputs.iter_mut().zip(&components) {
                *slot = component.values[i];
            }
            values.push((derivation.combine)(&inputs));
            valid.push(true);
        } else {
            values.push(f64::NAN);
            valid.push(false);
        }
    }

    debug!(
        variable = %derivation.name,
        components = ?derivation.fields,
        "Derived variable"
    );

    Ok(VariableSpec {
        name: derivation.name.to_string(),
        long_name: derivation.long_name.to_string(),
        units: derivation.units.to_string(),
        shape,
        values,
        valid,
        missing_value: f64::NAN,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bfg_dataset::{MemoryFile, MemoryOpener};

    fn field(name: &str, values: Vec<f64>) -> Field {
        Field::new(name, &["time", "grid_yt", "grid_xt"], &[1, 1, 2], values).unwrap()
    }

    fn dataset_with(fields: Vec<Field>) -> (MemoryOpener, &'static str) {
        let mut file = MemoryFile::new("bfg.nc");
        for f in fields {
            file = file.with_field(f);
        }
        (MemoryOpener::new().with_file(file), "bfg.nc")
    }

    #[test]
    fn test_every_derivation_is_allowed() {
        for d in DERIVATIONS {
            assert!(is_valid_variable(d.name), "{} not in VALID_VARIABLES", d.name);
        }
    }

    #[test]
    fn test_plain_variable_metadata() {
        let (opener, path) = dataset_with(vec![field("tmp2m", vec![280.0, 290.0])
            .with_attribute("long_name", "2m temperature")
            .with_attribute("units", "K")]);
        let dataset = MfDataset::open(&opener, &[path]).unwrap();
        let spec = resolve_variable(&dataset, "tmp2m").unwrap();
        assert_eq!(spec.long_name, "2m temperature");
        assert_eq!(spec.units, "K");
        assert_eq!(spec.values, vec![280.0, 290.0]);
        assert_eq!(spec.valid, vec![true, true]);
        assert!(spec.missing_value.is_nan());
    }

    #[test]
    fn test_missing_metadata_degrades_to_none() {
        let (opener, path) = dataset_with(vec![field("pressfc", vec![1.0e5, 1.01e5])]);
        let dataset = MfDataset::open(&opener, &[path]).unwrap();
        let spec = resolve_variable(&dataset, "pressfc").unwrap();
        assert_eq!(spec.long_name, "None");
        assert_eq!(spec.units, "None");
    }

    #[test]
    fn test_toa_net_flux() {
        let (opener, path) = dataset_with(vec![
            field("dswrf_avetoa", vec![340.0, 340.0]),
            field("uswrf_avetoa", vec![100.0, f64::NAN]),
            field("ulwrf_avetoa", vec![240.0, 240.0]),
        ]);
        let dataset = MfDataset::open(&opener, &[path]).unwrap();
        let spec = resolve_variable(&dataset, "netrf_avetoa").unwrap();
        assert_eq!(spec.values[0], 0.0);
        assert_eq!(spec.valid, vec![true, false]);
        assert_eq!(spec.units, "W/m**2");
    }

    #[test]
    fn test_surface_energy_balance() {
        let (opener, path) = dataset_with(vec![
            field("dswrf_ave", vec![200.0, 200.0]),
            field("dlwrf_ave", vec![350.0, 350.0]),
            field("ulwrf_ave", vec![400.0, 400.0]),
            field("uswrf_ave", vec![30.0, 30.0]),
            field("shtfl_ave", vec![20.0, 20.0]),
            field("lhtfl_ave", vec![80.0, 100.0]),
        ]);
        let dataset = MfDataset::open(&opener, &[path]).unwrap();
        let spec = resolve_variable(&dataset, "netef_ave").unwrap();
        assert_eq!(spec.values, vec![20.0, 0.0]);
        assert_eq!(spec.long_name, "surface energy balance");
    }

    #[test]
    fn test_missing_component_is_named() {
        let (opener, path) = dataset_with(vec![
            field("dswrf_avetoa", vec![340.0, 340.0]),
            field("ulwrf_avetoa", vec![240.0, 240.0]),
        ]);
        let dataset = MfDataset::open(&opener, &[path]).unwrap();
        match resolve_variable(&dataset, "netrf_avetoa") {
            Err(HarvestError::MissingRequiredField { variable, field }) => {
                assert_eq!(variable, "netrf_avetoa");
                assert_eq!(field, "uswrf_avetoa");
            }
            other => panic!("expected MissingRequiredField, got {:?}", other),
        }
    }

    #[test]
    fn test_sst_reads_surface_temperature() {
        let (opener, path) = dataset_with(vec![field("tmpsfc", vec![271.0, 300.0])]);
        let dataset = MfDataset::open(&opener, &[path]).unwrap();
        let spec = resolve_variable(&dataset, "sst").unwrap();
        assert_eq!(spec.name, "sst");
        assert_eq!(spec.values, vec![271.0, 300.0]);
        assert_eq!(spec.long_name, "sea surface temperature");
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let (opener, path) = dataset_with(vec![field("tmp2m", vec![f64::NAN, 290.0])]);
        let dataset = MfDataset::open(&opener, &[path]).unwrap();
        let a = resolve_variable(&dataset, "tmp2m").unwrap();
        let b = resolve_variable(&dataset, "tmp2m").unwrap();
        let bits = |s: &VariableSpec| s.values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(a.valid, b.valid);
    }
}
