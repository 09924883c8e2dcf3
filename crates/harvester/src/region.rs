//! Region catalog: named latitude/longitude bounds resolved to grid indices.

use std::ops::RangeInclusive;

use harvest_common::bounds::LON_FULL_CIRCLE;
use harvest_common::RegionBounds;

use crate::config::Regions;
use crate::error::{HarvestError, Result};
use crate::geometry::GridGeometry;

/// Name of the implicit region used when none is configured.
pub const GLOBAL_REGION: &str = "global";

/// Grid columns covered by a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonSpan {
    /// Columns `start..=end`.
    Contiguous { start: usize, end: usize },
    /// Columns `start..=nlon-1` followed by `0..=end`, crossing the 0/360 seam.
    Wrapping { start: usize, end: usize },
}

/// Inclusive grid index bounds of one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionIndex {
    pub name: String,
    pub lat_start: usize,
    pub lat_end: usize,
    pub lon: LonSpan,
    nlon: usize,
}

impl RegionIndex {
    /// The whole grid.
    pub fn global(grid: &GridGeometry) -> Self {
        Self {
            name: GLOBAL_REGION.to_string(),
            lat_start: 0,
            lat_end: grid.nlat() - 1,
            lon: LonSpan::Contiguous {
                start: 0,
                end: grid.nlon() - 1,
            },
            nlon: grid.nlon(),
        }
    }

    /// Lower of the two longitude indices.
    pub fn east_idx(&self) -> usize {
        match self.lon {
            LonSpan::Contiguous { start, .. } => start,
            LonSpan::Wrapping { end, .. } => end,
        }
    }

    /// Higher of the two longitude indices.
    pub fn west_idx(&self) -> usize {
        match self.lon {
            LonSpan::Contiguous { end, .. } => end,
            LonSpan::Wrapping { start, .. } => start,
        }
    }

    pub fn is_wrapping(&self) -> bool {
        matches!(self.lon, LonSpan::Wrapping { .. })
    }

    pub fn lat_indices(&self) -> RangeInclusive<usize> {
        self.lat_start..=self.lat_end
    }

    /// Column indices, walking east from the first column of the region.
    pub fn lon_indices(&self) -> Vec<usize> {
        match self.lon {
            LonSpan::Contiguous { start, end } => (start..=end).collect(),
            LonSpan::Wrapping { start, end } => (start..self.nlon).chain(0..=end).collect(),
        }
    }

    /// Flat (row-major) indices of every cell in the region.
    pub fn cells(&self) -> Vec<usize> {
        let lons = self.lon_indices();
        self.lat_indices()
            .flat_map(|i| lons.iter().map(move |&j| i * self.nlon + j))
            .collect()
    }

    pub fn cell_count(&self) -> usize {
        let rows = self.lat_end - self.lat_start + 1;
        let cols = match self.lon {
            LonSpan::Contiguous { start, end } => end - start + 1,
            LonSpan::Wrapping { start, end } => self.nlon - start + end + 1,
        };
        rows * cols
    }
}

/// Column of a longitude: `floor(lon * nlon / 360)`, with 360 mapped to the
/// last column.
pub fn lon_index(lon: f64, nlon: usize) -> usize {
    let idx = (lon * nlon as f64 / LON_FULL_CIRCLE).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(nlon - 1)
    }
}

/// Resolve one region against the grid.
pub fn resolve_region(name: &str, bounds: &RegionBounds, grid: &GridGeometry) -> Result<RegionIndex> {
    let rows: Vec<usize> = grid
        .lats()
        .iter()
        .enumerate()
        .filter(|(_, lat)| bounds.contains_lat(**lat))
        .map(|(i, _)| i)
        .collect();

    let (lat_start, lat_end) = match (rows.first(), rows.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => {
            return Err(HarvestError::EmptyRegion {
                region: name.to_string(),
                min_lat: bounds.min_lat,
                max_lat: bounds.max_lat,
            })
        }
    };

    let nlon = grid.nlon();
    let east = lon_index(bounds.east_lon, nlon);
    let west = lon_index(bounds.west_lon, nlon);
    let lon = if bounds.east_lon <= bounds.west_lon {
        LonSpan::Contiguous {
            start: east,
            end: west,
        }
    } else if east > west {
        LonSpan::Wrapping {
            start: east,
            end: west,
        }
    } else if east == 0 {
        // both ends fall in overlapping columns: the walk covers every column once
        LonSpan::Contiguous {
            start: 0,
            end: nlon - 1,
        }
    } else {
        LonSpan::Wrapping {
            start: east,
            end: east - 1,
        }
    };

    Ok(RegionIndex {
        name: name.to_string(),
        lat_start,
        lat_end,
        lon,
        nlon,
    })
}

/// Resolve every configured region, in configuration order. `None` yields the
/// single global region.
pub fn resolve(regions: Option<&Regions>, grid: &GridGeometry) -> Result<Vec<RegionIndex>> {
    match regions {
        None => Ok(vec![RegionIndex::global(grid)]),
        Some(regions) => regions
            .iter()
            .map(|(name, bounds)| resolve_region(name, bounds, grid))
            .collect(),
    }
}
