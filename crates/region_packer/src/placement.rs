use crate::catalog::{Capacity, Region};
use crate::error::{PackError, Result};
use crate::pack::Strategy;
use serde::Serialize;

/// A region together with its lower-left grid coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedRegion {
    pub name: String,
    pub x: u64,
    pub y: u64,
    pub width: u64,
    pub height: u64,
}

impl PlacedRegion {
    pub(crate) fn new(region: &Region, x: u64, y: u64) -> Self {
        Self {
            name: region.name.clone(),
            x,
            y,
            width: region.width,
            height: region.height,
        }
    }

    pub fn right(&self) -> u64 {
        self.x + self.width
    }

    pub fn top(&self) -> u64 {
        self.y + self.height
    }

    /// Rectangles `[x, x+w) x [y, y+h)` share at least one cell
    pub fn overlaps(&self, other: &PlacedRegion) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }
}

/// Result of one packing run. Regions are kept in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub strategy: Strategy,
    regions: Vec<PlacedRegion>,
    total_width: u64,
    total_height: u64,
    band_count: usize,
}

impl Placement {
    pub(crate) fn new(strategy: Strategy, regions: Vec<PlacedRegion>, band_count: usize) -> Self {
        let total_width = regions.iter().map(PlacedRegion::right).max().unwrap_or(0);
        let total_height = regions.iter().map(PlacedRegion::top).max().unwrap_or(0);
        Self {
            strategy,
            regions,
            total_width,
            total_height,
            band_count,
        }
    }

    pub fn regions(&self) -> &[PlacedRegion] {
        &self.regions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedRegion> {
        self.regions.iter()
    }

    pub fn get(&self, name: &str) -> Option<&PlacedRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of lanes (advice columns) the layout needs
    pub fn total_width(&self) -> u64 {
        self.total_width
    }

    pub fn total_height(&self) -> u64 {
        self.total_height
    }

    pub fn band_count(&self) -> usize {
        self.band_count
    }

    /// Cells committed for the whole grid: every lane spans the full capacity
    pub fn area(&self, capacity: Capacity) -> u128 {
        u128::from(self.total_width) * u128::from(capacity.rows())
    }

    pub fn used_cells(&self) -> u128 {
        self.regions
            .iter()
            .map(|r| u128::from(r.width) * u128::from(r.height))
            .sum()
    }

    /// Share of the committed grid actually covered by regions
    pub fn usage_percent(&self, capacity: Capacity) -> f64 {
        let area = self.area(capacity);
        if area == 0 {
            return 0.0;
        }
        self.used_cells() as f64 / area as f64 * 100.0
    }

    /// Checks that every region stays below the capacity and that no two regions
    /// share a cell.
    ///
    /// # Errors
    /// Returns `InvalidPlacement` describing the first violation.
    pub fn check_valid(&self, capacity: Capacity) -> Result<()> {
        let rows = capacity.rows();
        if let Some(region) = self.regions.iter().find(|r| r.top() > rows) {
            return Err(PackError::InvalidPlacement {
                message: format!(
                    "region '{}' reaches row {} above capacity {}",
                    region.name,
                    region.top(),
                    rows
                ),
            });
        }

        for (i, a) in self.regions.iter().enumerate() {
            for b in self.regions.iter().skip(i + 1) {
                if a.overlaps(b) {
                    return Err(PackError::InvalidPlacement {
                        message: format!("regions '{}' and '{}' overlap", a.name, b.name),
                    });
                }
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Placement {
    type Item = &'a PlacedRegion;
    type IntoIter = std::slice::Iter<'a, PlacedRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
