use crate::catalog::Capacity;
use crate::constants::{EXTRA_COLUMNS, FIELD_BYTES, GIB};
use crate::error::{PackError, Result};
use crate::placement::Placement;
use serde::Serialize;

/// Peak prover memory, counting only fixed and advice columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryModel {
    /// Max constraint degree of the circuit
    pub degree: u64,
    pub capacity: Capacity,
    pub fixed_columns: u64,
    pub field_bytes: u64,
}

impl MemoryModel {
    pub fn new(degree: u64, capacity: Capacity, fixed_columns: u64) -> Self {
        Self {
            degree,
            capacity,
            fixed_columns,
            field_bytes: FIELD_BYTES,
        }
    }

    /// Extended-domain factor: next power of two of `degree - 1`
    pub fn extension(&self) -> Result<u64> {
        self.degree
            .saturating_sub(1)
            .max(1)
            .checked_next_power_of_two()
            .ok_or_else(|| overflow("extension factor"))
    }

    /// # Errors
    /// Returns `Overflow` when the estimate does not fit in a `u64`.
    pub fn estimate_bytes(&self, advice_columns: u64) -> Result<u64> {
        let columns = EXTRA_COLUMNS
            .checked_add(self.fixed_columns)
            .and_then(|c| c.checked_add(advice_columns))
            .ok_or_else(|| overflow("column count"))?;
        self.extension()?
            .checked_mul(columns)
            .and_then(|b| b.checked_mul(self.capacity.rows()))
            .and_then(|b| b.checked_mul(self.field_bytes))
            .ok_or_else(|| overflow("memory estimate"))
    }

    pub fn estimate_placement_bytes(&self, placement: &Placement) -> Result<u64> {
        self.estimate_bytes(placement.total_width())
    }

    /// Bytes of the advice cells the layout actually spans
    pub fn cell_bytes(&self, placement: &Placement) -> Result<u64> {
        placement
            .total_width()
            .checked_mul(placement.total_height())
            .and_then(|cells| cells.checked_mul(self.field_bytes))
            .ok_or_else(|| overflow("cell bytes"))
    }
}

fn overflow(what: &str) -> PackError {
    PackError::Overflow {
        what: what.to_string(),
    }
}

pub fn to_gib(bytes: u64) -> u64 {
    bytes / GIB
}
