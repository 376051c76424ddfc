//! One lane-band per region, left to right in catalog order. Used only as the
//! reference the merging strategies are measured against.

use crate::catalog::{Capacity, Catalog};
use crate::error::{PackError, Result};
use crate::pack::Strategy;
use crate::placement::{PlacedRegion, Placement};

pub(crate) fn pack_baseline(catalog: &Catalog, capacity: Capacity) -> Result<Placement> {
    let rows = capacity.rows();
    let mut x = 0u64;
    let mut placed = Vec::with_capacity(catalog.len());

    for region in catalog {
        if region.height > rows {
            return Err(PackError::CapacityExceeded {
                name: region.name.clone(),
                height: region.height,
                capacity: rows,
            });
        }
        placed.push(PlacedRegion::new(region, x, 0));
        // bounded by Catalog::total_width
        x += region.width;
    }

    Ok(Placement::new(Strategy::Baseline, placed, catalog.len()))
}
