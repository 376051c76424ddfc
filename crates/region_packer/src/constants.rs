/// Capacity exponent bounds (capacity = 2^k rows)
pub const MIN_K: u32 = 1;
pub const MAX_K: u32 = 40;
pub const DEFAULT_K: u32 = 26;

/// Memory model defaults
pub const DEFAULT_DEGREE: u64 = 10;
pub const FIELD_BYTES: u64 = 32; // bytes per field element
pub const EXTRA_COLUMNS: u64 = 4; // columns the prover always commits besides fixed/advice
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Expected headers in catalog CSV files
pub const EXPECTED_NAME_HEADER: &str = "Name";
pub const EXPECTED_WIDTH_HEADER: &str = "Width";
pub const EXPECTED_HEIGHT_HEADER: &str = "Height";

/// Rendering (px)
pub const DEFAULT_IMAGE_WIDTH: u32 = 1024;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 1024;
pub const FONT_SIZE: f64 = 16.0;
pub const LABEL_PADDING: f64 = 4.0;
