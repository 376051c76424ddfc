pub mod analysis;
pub mod catalog;
pub mod catalog_reader;
pub mod config;
pub mod constants;
pub mod error;
pub mod memory;
pub mod pack;
pub mod placement;
pub mod render;
pub mod report;

pub use analysis::CostModel;
pub use catalog::{Capacity, Catalog, Region};
pub use catalog_reader::{read_catalog_csv, read_catalog_from_reader};
pub use config::Config;
pub use error::PackError;
pub use memory::MemoryModel;
pub use pack::{Strategy, pack, pack_with};
pub use placement::{PlacedRegion, Placement};
pub use render::{RenderOptions, render_comparison, render_placement};
pub use report::{Comparison, ReportFormat};
