use crate::constants::{MAX_K, MIN_K};
use crate::error::{PackError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A block of `width` lanes by `height` rows owned by one sub-circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub width: u64,
    pub height: u64,
}

impl Region {
    pub fn new(name: impl Into<String>, width: u64, height: u64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// Maximum number of rows a lane-band may expose, always a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Capacity {
    k: u32,
}

impl Capacity {
    pub fn from_k(k: u32) -> Result<Self> {
        if !(MIN_K..=MAX_K).contains(&k) {
            return Err(PackError::InvalidCapacity {
                k,
                min: MIN_K,
                max: MAX_K,
            });
        }
        Ok(Self { k })
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn rows(&self) -> u64 {
        1u64 << self.k
    }
}

/// Validated, read-only ordered collection of regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    regions: Vec<Region>,
}

impl Catalog {
    /// Validates the regions and keeps them in input order.
    ///
    /// # Errors
    /// Returns the first empty name, duplicate name, zero width or zero height
    /// found, or `Overflow` when the widths do not sum to a `u64`.
    pub fn new(regions: Vec<Region>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(regions.len());
        let mut total_width = 0u64;

        for (index, region) in regions.iter().enumerate() {
            if region.name.trim().is_empty() {
                return Err(PackError::EmptyName { index });
            }
            if !seen.insert(region.name.as_str()) {
                return Err(PackError::DuplicateName {
                    name: region.name.clone(),
                });
            }
            if region.width == 0 {
                return Err(PackError::ZeroWidth {
                    name: region.name.clone(),
                });
            }
            if region.height == 0 {
                return Err(PackError::ZeroHeight {
                    name: region.name.clone(),
                });
            }
            total_width = total_width
                .checked_add(region.width)
                .ok_or_else(|| PackError::Overflow {
                    what: format!("total width at region '{}'", region.name),
                })?;
        }

        Ok(Self { regions })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Sum of all region widths, i.e. the width of the one-band-per-region layout.
    /// Every x offset a packer produces is bounded by it.
    pub fn total_width(&self) -> u64 {
        self.regions.iter().map(|r| r.width).sum()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = Catalog::new(vec![
            Region::new("evm", 131, 10),
            Region::new("bytecode", 12, 20),
            Region::new("copy", 26, 5),
        ])
        .unwrap();

        let names: Vec<&str> = catalog.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["evm", "bytecode", "copy"]);
        assert_eq!(catalog.total_width(), 131 + 12 + 26);
        assert_eq!(catalog.get("copy").map(|r| r.height), Some(5));
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.total_width(), 0);
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = Catalog::new(vec![Region::new("a", 1, 1), Region::new("  ", 1, 1)]).unwrap_err();
        assert!(matches!(err, PackError::EmptyName { index: 1 }));
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let err = Catalog::new(vec![Region::new("rw", 63, 8), Region::new("rw", 1, 1)]).unwrap_err();
        match err {
            PackError::DuplicateName { name } => assert_eq!(name, "rw"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let err = Catalog::new(vec![Region::new("tx", 0, 1)]).unwrap_err();
        assert!(matches!(err, PackError::ZeroWidth { .. }));

        let err = Catalog::new(vec![Region::new("tx", 1, 0)]).unwrap_err();
        assert!(matches!(err, PackError::ZeroHeight { .. }));
    }

    #[test]
    fn test_rejects_width_sum_overflow() {
        let half = u64::MAX / 2 + 1;
        let err = Catalog::new(vec![Region::new("a", half, 1), Region::new("b", half, 1)]).unwrap_err();
        assert!(matches!(err, PackError::Overflow { .. }));

        let widest = Catalog::new(vec![Region::new("a", u64::MAX, 1)]).unwrap();
        assert_eq!(widest.total_width(), u64::MAX);
    }

    #[test]
    fn test_capacity_bounds() {
        assert_eq!(Capacity::from_k(26).unwrap().rows(), 67_108_864);
        assert_eq!(Capacity::from_k(1).unwrap().rows(), 2);
        assert!(matches!(
            Capacity::from_k(0),
            Err(PackError::InvalidCapacity { k: 0, .. })
        ));
        assert!(Capacity::from_k(MAX_K + 1).is_err());
    }
}
