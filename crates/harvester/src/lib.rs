//! Area-weighted statistics harvested from background-forecast (BFG) data.
//!
//! Given a batch of forecast files, the harvester computes spherical-area
//! weighted mean, variance, minimum and maximum of requested variables, over
//! the whole globe or over named regions, optionally restricted to land, ocean
//! or ice. Every batch is tagged with a single representative time.
//!
//! # Example
//!
//! ```ignore
//! use bfg_dataset::NetCdfOpener;
//! use harvester::{HarvestConfig, HarvestRequest, HarvestSettings, Harvester};
//!
//! let request: HarvestRequest = serde_yaml::from_str(yaml)?;
//! let config = HarvestConfig::try_from(request)?;
//! let harvester = Harvester::new(NetCdfOpener, HarvestSettings::from_env());
//! for record in harvester.harvest(&config)? {
//!     println!("{} {} = {:?}", record.variable, record.statistic, record.value);
//! }
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod harvest;
pub mod mask;
pub mod record;
pub mod region;
pub mod stats;
pub mod temporal;
pub mod variables;

pub use config::{HarvestConfig, HarvestRequest, HarvestSettings, Regions, SurfaceMaskInput};
pub use error::{HarvestError, Result};
pub use geometry::GridGeometry;
pub use harvest::Harvester;
pub use record::{HarvestRecord, HarvestValue};
pub use region::{LonSpan, RegionIndex};
pub use variables::{VariableSpec, VALID_VARIABLES};
