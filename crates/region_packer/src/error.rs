use thiserror::Error;

pub type Result<T> = std::result::Result<T, PackError>;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Region at index {index} has an empty name")]
    EmptyName { index: usize },

    #[error("Duplicate region name: {name}")]
    DuplicateName { name: String },

    #[error("Region '{name}' has zero width")]
    ZeroWidth { name: String },

    #[error("Region '{name}' has zero height")]
    ZeroHeight { name: String },

    #[error("Invalid capacity exponent k = {k}: must be between {min} and {max}")]
    InvalidCapacity { k: u32, min: u32, max: u32 },

    #[error("Region '{name}' with height {height} exceeds capacity {capacity}")]
    CapacityExceeded {
        name: String,
        height: u64,
        capacity: u64,
    },

    #[error("Arithmetic overflow computing {what}")]
    Overflow { what: String },

    #[error("Invalid placement: {message}")]
    InvalidPlacement { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid CSV Header: {0}")]
    CsvHeader(String),

    #[error("Invalid CSV row {row}: expected at least 3 columns, got {got}")]
    CsvRow { row: usize, got: usize },

    #[error("Invalid {field} at row {row}: {value}")]
    FieldParse {
        row: usize,
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl PackError {
    /// True for the malformed-catalog family, raised before packing begins.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PackError::EmptyName { .. }
                | PackError::DuplicateName { .. }
                | PackError::ZeroWidth { .. }
                | PackError::ZeroHeight { .. }
        )
    }
}

impl From<toml::de::Error> for PackError {
    fn from(err: toml::de::Error) -> Self {
        PackError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<serde_json::Error> for PackError {
    fn from(err: serde_json::Error) -> Self {
        PackError::Json(err.to_string())
    }
}
