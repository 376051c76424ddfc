//! Height-descending lane-band merging.
//!
//! Regions are visited tallest first (ties keep catalog order). Each region is
//! stacked on top of an open band whose row cursor still has room for it, or
//! opens a new band at row 0. Bands are laid out left to right in opening order,
//! so the layout width is the sum of the band widths.

use std::cmp::Reverse;

use itertools::Itertools;
use log::debug;

use super::Strategy;
use crate::catalog::{Capacity, Catalog, Region};
use crate::error::{PackError, Result};
use crate::placement::{PlacedRegion, Placement};

/// Which eligible band receives a region when more than one has room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandSelection {
    /// Earliest opened band with room
    FirstFit,
    /// Band left with the fewest free rows; earliest on ties
    BestFit,
    /// Band whose width grows least; earliest on ties
    MinWidthGrowth,
}

impl BandSelection {
    fn strategy(self) -> Strategy {
        match self {
            BandSelection::FirstFit => Strategy::FirstFit,
            BandSelection::BestFit => Strategy::BestFit,
            BandSelection::MinWidthGrowth => Strategy::MinWidthGrowth,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct LaneBand {
    y_cursor: u64,
    width: u64,
}

impl LaneBand {
    fn fits(&self, region: &Region, rows: u64) -> bool {
        self.y_cursor + region.height <= rows
    }
}

fn select_band(
    bands: &[LaneBand],
    region: &Region,
    rows: u64,
    selection: BandSelection,
) -> Option<usize> {
    let mut eligible = bands
        .iter()
        .enumerate()
        .filter(|(_, band)| band.fits(region, rows));

    // min_by_key keeps the first minimum, so ties go to the earliest band
    let chosen = match selection {
        BandSelection::FirstFit => eligible.next(),
        BandSelection::BestFit => {
            eligible.min_by_key(|(_, band)| rows - (band.y_cursor + region.height))
        }
        BandSelection::MinWidthGrowth => {
            eligible.min_by_key(|(_, band)| region.width.saturating_sub(band.width))
        }
    };
    chosen.map(|(index, _)| index)
}

pub(crate) fn pack_merged(
    catalog: &Catalog,
    capacity: Capacity,
    selection: BandSelection,
) -> Result<Placement> {
    let rows = capacity.rows();
    let mut bands: Vec<LaneBand> = Vec::new();
    // catalog index -> (band index, y)
    let mut assigned: Vec<(usize, u64)> = vec![(0, 0); catalog.len()];

    let order = catalog
        .iter()
        .enumerate()
        .sorted_by_key(|(index, region)| (Reverse(region.height), *index));

    for (index, region) in order {
        if region.height > rows {
            return Err(PackError::CapacityExceeded {
                name: region.name.clone(),
                height: region.height,
                capacity: rows,
            });
        }

        let band_index = match select_band(&bands, region, rows, selection) {
            Some(band_index) => band_index,
            None => {
                debug!(
                    "Opening lane-band {} for '{}' (height {})",
                    bands.len(),
                    region.name,
                    region.height
                );
                bands.push(LaneBand::default());
                bands.len() - 1
            }
        };

        let band = &mut bands[band_index];
        assigned[index] = (band_index, band.y_cursor);
        band.y_cursor += region.height;
        band.width = band.width.max(region.width);
    }

    // band widths sum to at most the catalog total width, which fits in u64
    let offsets: Vec<u64> = bands
        .iter()
        .scan(0u64, |x, band| {
            let offset = *x;
            *x += band.width;
            Some(offset)
        })
        .collect();

    let placed = catalog
        .iter()
        .zip(&assigned)
        .map(|(region, &(band_index, y))| PlacedRegion::new(region, offsets[band_index], y))
        .collect();

    debug!(
        "{:?} packed {} regions into {} lane-bands",
        selection,
        catalog.len(),
        bands.len()
    );

    Ok(Placement::new(selection.strategy(), placed, bands.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(regions: &[(&str, u64, u64)]) -> Catalog {
        Catalog::new(
            regions
                .iter()
                .map(|&(name, width, height)| Region::new(name, width, height))
                .collect(),
        )
        .unwrap()
    }

    fn zkevm_catalog() -> Catalog {
        catalog(&[
            ("keccak", 203, 67108827),
            ("copy", 26, 15794674),
            ("rw", 63, 8401580),
            ("bytecode", 12, 7022326),
            ("tx", 10, 6473591),
            ("evm", 131, 3336903),
            ("exp", 15, 808272),
            ("pi", 10, 244706),
            ("mpt", 156, 140891),
        ])
    }

    fn xy(placement: &Placement, name: &str) -> (u64, u64) {
        let placed = placement.get(name).unwrap();
        (placed.x, placed.y)
    }

    #[test]
    fn test_zkevm_reference_layout() {
        let capacity = Capacity::from_k(26).unwrap();
        let placement = pack_merged(&zkevm_catalog(), capacity, BandSelection::FirstFit).unwrap();

        assert_eq!(placement.band_count(), 2);
        assert_eq!(xy(&placement, "keccak"), (0, 0));
        for name in ["copy", "rw", "bytecode", "tx", "evm", "exp", "pi", "mpt"] {
            assert_eq!(placement.get(name).unwrap().x, 203, "{name} not in second band");
        }
        assert_eq!(placement.total_width(), 203 + 156);

        // second band is stacked tallest first
        assert_eq!(xy(&placement, "copy"), (203, 0));
        assert_eq!(xy(&placement, "rw"), (203, 15794674));
        assert_eq!(xy(&placement, "bytecode"), (203, 15794674 + 8401580));
        assert_eq!(placement.total_height(), 67108827);
        placement.check_valid(capacity).unwrap();
    }

    #[test]
    fn test_output_keeps_catalog_order() {
        let placement = pack_merged(
            &zkevm_catalog(),
            Capacity::from_k(26).unwrap(),
            BandSelection::FirstFit,
        )
        .unwrap();
        let names: Vec<&str> = placement.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["keccak", "copy", "rw", "bytecode", "tx", "evm", "exp", "pi", "mpt"]
        );
    }

    #[test]
    fn test_full_height_region_gets_its_own_band() {
        let capacity = Capacity::from_k(4).unwrap();
        let placement = pack_merged(
            &catalog(&[("small", 5, 1), ("full", 2, 16), ("mid", 3, 8)]),
            capacity,
            BandSelection::FirstFit,
        )
        .unwrap();

        let full = placement.get("full").unwrap();
        assert_eq!((full.x, full.y), (0, 0));
        assert!(
            placement
                .iter()
                .filter(|p| p.name != "full")
                .all(|p| p.x != full.x)
        );
        assert_eq!(xy(&placement, "mid"), (2, 0));
        assert_eq!(xy(&placement, "small"), (2, 8));
        assert_eq!(placement.total_width(), 2 + 5);
    }

    #[test]
    fn test_exact_fill_is_allowed() {
        let capacity = Capacity::from_k(3).unwrap();
        let placement = pack_merged(
            &catalog(&[("a", 1, 5), ("b", 1, 3)]),
            capacity,
            BandSelection::FirstFit,
        )
        .unwrap();
        assert_eq!(placement.band_count(), 1);
        assert_eq!(xy(&placement, "b"), (0, 5));
        assert_eq!(placement.total_height(), 8);
    }

    #[test]
    fn test_equal_heights_keep_catalog_order() {
        let capacity = Capacity::from_k(2).unwrap();
        let placement = pack_merged(
            &catalog(&[("first", 1, 3), ("second", 7, 3)]),
            capacity,
            BandSelection::FirstFit,
        )
        .unwrap();
        assert_eq!(xy(&placement, "first"), (0, 0));
        assert_eq!(xy(&placement, "second"), (1, 0));
    }

    // Bands after "a", "b", "c": band 0 has 12 free rows, band 1 has 5.
    fn two_open_bands() -> Catalog {
        catalog(&[("a", 2, 20), ("b", 5, 14), ("c", 5, 13), ("d", 4, 4)])
    }

    #[test]
    fn test_first_fit_scans_earlier_bands() {
        let placement = pack_merged(
            &two_open_bands(),
            Capacity::from_k(5).unwrap(),
            BandSelection::FirstFit,
        )
        .unwrap();
        // d widens band 0 to 4 lanes, pushing band 1 right
        assert_eq!(xy(&placement, "c"), (4, 14));
        assert_eq!(xy(&placement, "d"), (0, 20));
        assert_eq!(placement.total_width(), 4 + 5);
    }

    #[test]
    fn test_best_fit_prefers_tightest_band() {
        let placement = pack_merged(
            &two_open_bands(),
            Capacity::from_k(5).unwrap(),
            BandSelection::BestFit,
        )
        .unwrap();
        assert_eq!(xy(&placement, "c"), (2, 14));
        assert_eq!(xy(&placement, "d"), (2, 27));
        assert_eq!(placement.total_width(), 2 + 5);
    }

    #[test]
    fn test_min_width_growth_prefers_wide_band() {
        let placement = pack_merged(
            &two_open_bands(),
            Capacity::from_k(5).unwrap(),
            BandSelection::MinWidthGrowth,
        )
        .unwrap();
        assert_eq!(xy(&placement, "c"), (2, 14));
        assert_eq!(xy(&placement, "d"), (2, 27));
        assert_eq!(placement.total_width(), 2 + 5);
        assert_eq!(placement.strategy, Strategy::MinWidthGrowth);
    }

    #[test]
    fn test_widest_catalog_packs_without_overflow() {
        let capacity = Capacity::from_k(3).unwrap();
        let wide = catalog(&[("a", u64::MAX - 11, 8), ("b", 8, 8), ("c", 3, 1)]);
        for selection in [
            BandSelection::FirstFit,
            BandSelection::BestFit,
            BandSelection::MinWidthGrowth,
        ] {
            let placement = pack_merged(&wide, capacity, selection).unwrap();
            assert_eq!(xy(&placement, "b"), (u64::MAX - 11, 0));
            assert_eq!(xy(&placement, "c"), (u64::MAX - 3, 0));
            assert_eq!(placement.total_width(), u64::MAX);
            placement.check_valid(capacity).unwrap();
        }
    }

    #[test]
    fn test_empty_catalog() {
        let placement = pack_merged(
            &Catalog::default(),
            Capacity::from_k(4).unwrap(),
            BandSelection::FirstFit,
        )
        .unwrap();
        assert!(placement.is_empty());
        assert_eq!(placement.band_count(), 0);
        assert_eq!(placement.total_width(), 0);
    }
}
