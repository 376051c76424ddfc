pub mod bands;
pub mod baseline;

use crate::catalog::{Capacity, Catalog};
use crate::error::Result;
use crate::placement::Placement;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub use bands::BandSelection;

/// Placement strategy. `Baseline` gives every region its own lanes; the others
/// stack regions into shared lane-bands and differ only in which eligible band
/// receives the next region.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    Baseline,
    #[default]
    FirstFit,
    BestFit,
    MinWidthGrowth,
}

impl Strategy {
    /// Band-selection rule for the merging strategies, `None` for the baseline
    pub fn band_selection(self) -> Option<BandSelection> {
        match self {
            Strategy::Baseline => None,
            Strategy::FirstFit => Some(BandSelection::FirstFit),
            Strategy::BestFit => Some(BandSelection::BestFit),
            Strategy::MinWidthGrowth => Some(BandSelection::MinWidthGrowth),
        }
    }
}

/// Packs the catalog with height-descending first-fit band merging.
pub fn pack(catalog: &Catalog, capacity: Capacity) -> Result<Placement> {
    bands::pack_merged(catalog, capacity, BandSelection::FirstFit)
}

/// Packs the catalog with the given strategy.
///
/// # Errors
/// `CapacityExceeded` if any region is taller than the capacity.
pub fn pack_with(catalog: &Catalog, capacity: Capacity, strategy: Strategy) -> Result<Placement> {
    match strategy.band_selection() {
        Some(selection) => bands::pack_merged(catalog, capacity, selection),
        None => baseline::pack_baseline(catalog, capacity),
    }
}
