//! Common types shared by the BFG statistics harvester crates.

pub mod bounds;
pub mod error;
pub mod kinds;
pub mod time;

pub use bounds::RegionBounds;
pub use error::{BoundsError, ParseKindError, TimeAxisError};
pub use kinds::{Statistic, SurfaceCategory};
pub use time::{Calendar, TimeUnits, HOURS_EPOCH};
