//! Worst-case sizing of the zkEVM sub-circuits.
//!
//! Each circuit (optionally paired with its lookup table) becomes one region:
//! its width is the advice columns of the circuit plus its table, its height
//! is the rows needed to prove the largest amount of gas that still fits in
//! `2^k` rows for the most row-hungry circuit.

use crate::catalog::{Capacity, Catalog, Region};
use crate::error::Result;
use log::debug;

/// Advice / fixed column counts of one circuit or table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Columns {
    pub advice: u64,
    pub fixed: u64,
}

impl Columns {
    pub const fn new(advice: u64, fixed: u64) -> Self {
        Self { advice, fixed }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircuitSpec {
    pub circuit: Option<&'static str>,
    pub table: Option<&'static str>,
    /// Worst-case rows per unit of gas; `None` when not estimated yet
    pub rows_per_gas: Option<f64>,
    pub min_rows: Option<u64>,
    pub circuit_columns: Columns,
    pub table_columns: Columns,
}

impl CircuitSpec {
    /// Circuit name, or the table name for table-only entries
    pub fn name(&self) -> Option<&'static str> {
        self.circuit.or(self.table)
    }

    pub fn advice(&self) -> u64 {
        self.circuit_columns.advice + self.table_columns.advice
    }

    pub fn fixed(&self) -> u64 {
        self.circuit_columns.fixed + self.table_columns.fixed
    }

    /// Rows-per-gas if the entry produces a region (known and non-zero)
    fn active_rows_per_gas(&self) -> Option<f64> {
        self.rows_per_gas.filter(|r| *r > 0.0)
    }
}

const fn spec(
    circuit: Option<&'static str>,
    table: Option<&'static str>,
    rows_per_gas: Option<f64>,
    min_rows: Option<u64>,
    circuit_columns: Columns,
    table_columns: Columns,
) -> CircuitSpec {
    CircuitSpec {
        circuit,
        table,
        rows_per_gas,
        min_rows,
        circuit_columns,
        table_columns,
    }
}

const NONE: Columns = Columns::new(0, 0);

/// Super-circuit composition. Rows per gas come from the worst-case opcode of
/// each circuit; column counts from the circuit stats binary.
const ZKEVM_CIRCUITS: &[CircuitSpec] = &[
    // PUSH0
    spec(Some("evm"), None, Some(4.5), None, Columns::new(131, 5), NONE),
    // EXTCODESIZE of a contract with MAX_CODESIZE
    spec(
        Some("bytecode"),
        Some("bytecode"),
        Some(9.47),
        None,
        Columns::new(6, 5),
        Columns::new(6, 0),
    ),
    // CODECOPY of a contract with MAX_CODESIZE
    spec(
        Some("copy"),
        Some("copy"),
        Some(21.3),
        None,
        Columns::new(14, 1),
        Columns::new(12, 1),
    ),
    // 7 rows per exponent bit
    spec(
        Some("exp"),
        Some("exp"),
        Some(1.09),
        None,
        Columns::new(10, 0),
        Columns::new(5, 1),
    ),
    spec(
        Some("keccak"),
        Some("keccak"),
        Some(90.5),
        None,
        Columns::new(198, 18),
        Columns::new(5, 0),
    ),
    // hot SLOAD, 11 state levels and 8 storage levels
    spec(
        Some("mpt"),
        Some("mpt"),
        Some(0.95),
        None,
        Columns::new(144, 8),
        Columns::new(12, 0),
    ),
    // RETURNDATASIZE + repeated MLOAD
    spec(
        Some("rw"),
        Some("rw"),
        Some(11.33),
        None,
        Columns::new(49, 3),
        Columns::new(14, 0),
    ),
    // range chip table in SignVerifyChip sets the minimum
    spec(
        Some("tx"),
        Some("tx"),
        Some(8.73),
        Some(295_188),
        Columns::new(6, 13),
        Columns::new(4, 1),
    ),
    spec(
        Some("sig"),
        Some("sig"),
        None,
        None,
        NONE,
        Columns::new(9, 1),
    ),
    spec(Some("ecc"), None, None, None, NONE, NONE),
    // 1 tx with call_data_len = 1_048_576
    spec(Some("pi"), None, Some(0.33), None, Columns::new(10, 3), NONE),
    spec(None, Some("block"), Some(0.0), Some(264), NONE, Columns::new(2, 2)),
    spec(None, Some("u8"), Some(0.0), Some(1 << 8), NONE, Columns::new(0, 1)),
    spec(None, Some("u10"), Some(0.0), Some(1 << 10), NONE, Columns::new(0, 1)),
    spec(None, Some("u16"), Some(0.0), Some(1 << 16), NONE, Columns::new(0, 1)),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    circuits: Vec<CircuitSpec>,
}

impl Default for CostModel {
    fn default() -> Self {
        Self::zkevm()
    }
}

impl CostModel {
    pub fn new(circuits: Vec<CircuitSpec>) -> Self {
        Self { circuits }
    }

    /// The zkEVM super-circuit
    pub fn zkevm() -> Self {
        Self::new(ZKEVM_CIRCUITS.to_vec())
    }

    pub fn circuits(&self) -> &[CircuitSpec] {
        &self.circuits
    }

    pub fn max_rows_per_gas(&self) -> f64 {
        self.circuits
            .iter()
            .filter_map(CircuitSpec::active_rows_per_gas)
            .fold(0.0, f64::max)
    }

    /// Largest gas amount provable in the worst case with `2^k` rows
    pub fn max_gas(&self, capacity: Capacity) -> u64 {
        let max_rows_per_gas = self.max_rows_per_gas();
        if max_rows_per_gas <= 0.0 {
            return 0;
        }
        (capacity.rows() as f64 / max_rows_per_gas).floor() as u64
    }

    /// Builds one region per circuit that has a rows-per-gas estimate.
    pub fn derive_catalog(&self, gas: u64) -> Result<Catalog> {
        let mut regions = Vec::new();
        for circuit in &self.circuits {
            let (Some(name), Some(rows_per_gas)) = (circuit.name(), circuit.active_rows_per_gas())
            else {
                debug!("Skipping {:?}: no rows-per-gas estimate", circuit.name());
                continue;
            };
            let rows = (gas as f64 * rows_per_gas).floor() as u64;
            let height = rows.max(circuit.min_rows.unwrap_or(0));
            regions.push(Region::new(name, circuit.advice(), height));
        }
        Catalog::new(regions)
    }

    /// Fixed columns are never stacked, so every circuit and table adds its own
    pub fn fixed_columns(&self) -> u64 {
        self.circuits.iter().map(CircuitSpec::fixed).sum()
    }
}
