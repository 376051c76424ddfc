use crate::{
    analysis::CostModel,
    catalog::{Capacity, Catalog},
    catalog_reader::read_catalog_csv,
    constants::{
        DEFAULT_DEGREE, DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, DEFAULT_K, FIELD_BYTES, MAX_K,
        MIN_K,
    },
    error::{PackError, Result},
    memory::MemoryModel,
    pack::Strategy,
    report::ReportFormat,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub input: InputConfig,
    pub memory: MemoryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// capacity = 2^k rows
    pub k: u32,
    pub strategy: Strategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            strategy: Strategy::FirstFit,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    /// Built-in worst-case cost model
    #[default]
    Analysis,
    Csv,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub source: InputSource,
    pub catalog_path: Option<PathBuf>,
    /// Gas to size regions for; defaults to the maximum provable with 2^k rows
    pub gas: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub degree: u64,
    pub field_bytes: u64,
    /// Fixed columns for CSV catalogs; the cost model counts its own
    pub fixed_columns: Option<u64>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            field_bytes: FIELD_BYTES,
            fixed_columns: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    pub report_format: ReportFormat,
    pub render: bool,
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("figs"),
            report_format: ReportFormat::Html,
            render: true,
            image_width: DEFAULT_IMAGE_WIDTH,
            image_height: DEFAULT_IMAGE_HEIGHT,
        }
    }
}

/// Catalog plus the fixed-column count that goes with it
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub fixed_columns: u64,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PackError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            PackError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            warn!(
                "Config file not found: {}, using default settings",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_K..=MAX_K).contains(&self.layout.k) {
            return Err(PackError::Config(format!(
                "layout.k must be between {} and {}, got {}",
                MIN_K, MAX_K, self.layout.k
            )));
        }

        if self.input.source == InputSource::Csv && self.input.catalog_path.is_none() {
            return Err(PackError::Config(
                "input.catalog_path is required when input.source is 'csv'".to_string(),
            ));
        }

        if self.memory.degree == 0 {
            return Err(PackError::Config("memory.degree must be positive".to_string()));
        }

        if self.memory.field_bytes == 0 {
            return Err(PackError::Config(
                "memory.field_bytes must be positive".to_string(),
            ));
        }

        if self.output.image_width < 2 || self.output.image_height < 2 {
            return Err(PackError::Config(format!(
                "image size too small: {}x{}",
                self.output.image_width, self.output.image_height
            )));
        }

        Ok(())
    }

    pub fn capacity(&self) -> Result<Capacity> {
        Capacity::from_k(self.layout.k)
    }

    /// Builds the catalog from the configured source
    pub fn load_catalog(&self) -> Result<LoadedCatalog> {
        let capacity = self.capacity()?;
        match self.input.source {
            InputSource::Analysis => {
                let model = CostModel::zkevm();
                let gas = self.input.gas.unwrap_or_else(|| model.max_gas(capacity));
                info!("k = {}, gas = {}", capacity.k(), gas);
                Ok(LoadedCatalog {
                    catalog: model.derive_catalog(gas)?,
                    fixed_columns: self
                        .memory
                        .fixed_columns
                        .unwrap_or_else(|| model.fixed_columns()),
                })
            }
            InputSource::Csv => {
                let path = self.input.catalog_path.as_ref().ok_or_else(|| {
                    PackError::Config("input.catalog_path is not set".to_string())
                })?;
                info!("Reading catalog from {}", path.display());
                Ok(LoadedCatalog {
                    catalog: read_catalog_csv(path)?,
                    fixed_columns: self.memory.fixed_columns.unwrap_or(0),
                })
            }
        }
    }

    pub fn memory_model(&self, fixed_columns: u64) -> Result<MemoryModel> {
        Ok(MemoryModel {
            field_bytes: self.memory.field_bytes,
            ..MemoryModel::new(self.memory.degree, self.capacity()?, fixed_columns)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.layout.k, 26);
        assert_eq!(config.layout.strategy, Strategy::FirstFit);
        assert_eq!(config.input.source, InputSource::Analysis);
        assert_eq!(config.output.report_format, ReportFormat::Html);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[layout]
k = 20
strategy = "best-fit"

[output]
report_format = "json"
render = false
"#,
        );

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.layout.k, 20);
        assert_eq!(config.layout.strategy, Strategy::BestFit);
        assert_eq!(config.output.report_format, ReportFormat::Json);
        assert!(!config.output.render);
        assert_eq!(config.memory.degree, DEFAULT_DEGREE);
    }

    #[test]
    fn test_invalid_k_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[layout]\nk = 0\n");
        let err = Config::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("layout.k"));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[layout]\nstrategy = \"next-fit\"\n");
        assert!(matches!(
            Config::load_from_file(&path),
            Err(PackError::Config(_))
        ));
    }

    #[test]
    fn test_image_size_checked_with_render_off() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[output]\nrender = false\nimage_width = 0\nimage_height = 0\n",
        );
        let err = Config::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("image size"));
    }

    #[test]
    fn test_csv_source_requires_path() {
        let mut config = Config::default();
        config.input.source = InputSource::Csv;
        assert!(config.validate().is_err());

        config.input.catalog_path = Some(PathBuf::from("data/regions.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_catalog_from_csv() {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("regions.csv");
        std::fs::write(&csv_path, "Name,Width,Height\na,2,3\nb,4,5\n").unwrap();

        let mut config = Config::default();
        config.input.source = InputSource::Csv;
        config.input.catalog_path = Some(csv_path);
        config.memory.fixed_columns = Some(7);

        let loaded = config.load_catalog().unwrap();
        assert_eq!(loaded.catalog.len(), 2);
        assert_eq!(loaded.fixed_columns, 7);
    }

    #[test]
    fn test_load_catalog_from_analysis() {
        let loaded = Config::default().load_catalog().unwrap();
        assert_eq!(loaded.catalog.len(), 9);
        assert_eq!(loaded.fixed_columns, 65);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = Config::load_or_default("does/not/exist.toml").unwrap();
        assert_eq!(config.layout.k, DEFAULT_K);
    }
}
