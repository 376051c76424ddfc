use crate::catalog::{Capacity, Catalog};
use crate::error::Result;
use crate::memory::{MemoryModel, to_gib};
use crate::pack::{Strategy, pack_with};
use crate::placement::Placement;

use csv::WriterBuilder;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Json,
    Csv,
}

/// Per-strategy figures shown in the report
#[derive(Debug, Clone, Serialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub advice_columns: u64,
    pub fixed_columns: u64,
    pub band_count: usize,
    pub memory_bytes: u64,
    pub memory_gib: u64,
    pub usage_percent: f64,
    pub solve_time_us: u64,
}

impl StrategySummary {
    fn new(placement: &Placement, memory: &MemoryModel, solve_time_us: u64) -> Result<Self> {
        let memory_bytes = memory.estimate_placement_bytes(placement)?;
        Ok(Self {
            strategy: placement.strategy,
            advice_columns: placement.total_width(),
            fixed_columns: memory.fixed_columns,
            band_count: placement.band_count(),
            memory_bytes,
            memory_gib: to_gib(memory_bytes),
            usage_percent: placement.usage_percent(memory.capacity),
            solve_time_us,
        })
    }
}

/// Baseline vs. merged layout of one catalog
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub timestamp: String,
    pub k: u32,
    pub capacity_rows: u64,
    pub baseline: Placement,
    pub merged: Placement,
    pub baseline_summary: StrategySummary,
    pub merged_summary: StrategySummary,
    /// Advice-column reduction of the merged layout relative to the baseline
    pub width_improvement_percent: f64,
}

/// Timing helper
pub struct TimedExecution<T> {
    pub result: T,
    pub duration_us: u64,
}

impl<T> TimedExecution<T> {
    pub fn time<F>(f: F) -> TimedExecution<T>
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let result = f();
        let duration_us = start.elapsed().as_micros() as u64;

        TimedExecution {
            result,
            duration_us,
        }
    }
}

impl Comparison {
    /// Packs the catalog with the baseline and with `strategy`, checking both layouts.
    pub fn run(
        catalog: &Catalog,
        capacity: Capacity,
        memory: &MemoryModel,
        strategy: Strategy,
    ) -> Result<Self> {
        let baseline_run =
            TimedExecution::time(|| pack_with(catalog, capacity, Strategy::Baseline));
        let baseline = baseline_run.result?;
        baseline.check_valid(capacity)?;

        let merged_run = TimedExecution::time(|| pack_with(catalog, capacity, strategy));
        let merged = merged_run.result?;
        merged.check_valid(capacity)?;

        let width_improvement_percent = if baseline.total_width() > 0 {
            100.0 * (baseline.total_width() as f64 - merged.total_width() as f64)
                / baseline.total_width() as f64
        } else {
            0.0
        };

        Ok(Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            k: capacity.k(),
            capacity_rows: capacity.rows(),
            baseline_summary: StrategySummary::new(&baseline, memory, baseline_run.duration_us)?,
            merged_summary: StrategySummary::new(&merged, memory, merged_run.duration_us)?,
            baseline,
            merged,
            width_improvement_percent,
        })
    }

    pub fn summaries(&self) -> [&StrategySummary; 2] {
        [&self.baseline_summary, &self.merged_summary]
    }

    /// Writes `comparison_report_<timestamp>.<format>` into `dir`
    pub fn save_report<P: AsRef<Path>>(&self, format: ReportFormat, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("comparison_report_{}.{}", timestamp, format));

        match format {
            ReportFormat::Html => std::fs::write(&path, self.to_html())?,
            ReportFormat::Json => std::fs::write(&path, serde_json::to_string_pretty(self)?)?,
            ReportFormat::Csv => self.write_csv(&path)?,
        }

        info!("Comparison report saved to: {}", path.display());
        Ok(path)
    }

    fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_path(path)?;
        wtr.write_record([
            "strategy",
            "advice_columns",
            "fixed_columns",
            "band_count",
            "memory_gib",
            "usage_percent",
            "solve_time_us",
        ])?;
        for summary in self.summaries() {
            wtr.write_record([
                summary.strategy.to_string(),
                summary.advice_columns.to_string(),
                summary.fixed_columns.to_string(),
                summary.band_count.to_string(),
                summary.memory_gib.to_string(),
                format!("{:.2}", summary.usage_percent),
                summary.solve_time_us.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn to_html(&self) -> String {
        let rows: String = self
            .summaries()
            .iter()
            .map(|summary| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
                    summary.strategy,
                    summary.advice_columns,
                    summary.fixed_columns,
                    summary.band_count,
                    summary.memory_gib,
                    summary.usage_percent,
                    summary.solve_time_us,
                )
            })
            .collect();

        let regions: String = self
            .baseline
            .iter()
            .zip(self.merged.iter())
            .map(|(base, merged)| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>({}, {})</td><td>({}, {})</td></tr>",
                    html_encode(&base.name),
                    base.width,
                    base.height,
                    base.x,
                    base.y,
                    merged.x,
                    merged.y,
                )
            })
            .collect();

        let class = if self.width_improvement_percent > 0.0 {
            "improvement"
        } else {
            "neutral"
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Region Layout Comparison Report</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        .comparison-table {{ border-collapse: collapse; width: 100%; }}
        .comparison-table th, .comparison-table td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
        .improvement {{ color: green; font-weight: bold; }}
        .neutral {{ color: gray; }}
    </style>
</head>
<body>
    <h1>Region Layout: {baseline} vs {merged}</h1>
    <p>Generated: {timestamp}</p>
    <p>k = {k} (capacity {rows} rows)</p>

    <h2>Summary</h2>
    <table class="comparison-table">
        <tr><th>Strategy</th><th>Advice columns</th><th>Fixed columns</th><th>Bands</th><th>Memory (GiB)</th><th>Area usage (%)</th><th>Solve time (us)</th></tr>
        {rows_html}
    </table>
    <p class="{class}">Advice column reduction: {improvement:.2}%</p>

    <h2>Regions</h2>
    <table class="comparison-table">
        <tr><th>Region</th><th>Width</th><th>Height</th><th>{baseline} (x, y)</th><th>{merged} (x, y)</th></tr>
        {regions_html}
    </table>
</body>
</html>
"#,
            baseline = self.baseline.strategy,
            merged = self.merged.strategy,
            timestamp = self.timestamp,
            k = self.k,
            rows = self.capacity_rows,
            rows_html = rows,
            class = class,
            improvement = self.width_improvement_percent,
            regions_html = regions,
        )
    }
}

/// HTML-escape text
fn html_encode(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Region;
    use crate::error::PackError;
    use tempfile::TempDir;

    fn comparison() -> Comparison {
        let catalog = Catalog::new(vec![
            Region::new("keccak", 203, 60),
            Region::new("copy", 26, 30),
            Region::new("mpt", 156, 20),
        ])
        .unwrap();
        let capacity = Capacity::from_k(6).unwrap();
        let memory = MemoryModel::new(10, capacity, 5);
        Comparison::run(&catalog, capacity, &memory, Strategy::FirstFit).unwrap()
    }

    #[test]
    fn test_comparison_figures() {
        let comparison = comparison();
        assert_eq!(comparison.baseline_summary.advice_columns, 203 + 26 + 156);
        assert_eq!(comparison.merged_summary.advice_columns, 203 + 156);
        assert_eq!(comparison.merged_summary.band_count, 2);
        assert_eq!(comparison.capacity_rows, 64);
        let expected = 100.0 * 26.0 / 385.0;
        assert!((comparison.width_improvement_percent - expected).abs() < 1e-9);
        assert!(comparison.merged_summary.memory_bytes < comparison.baseline_summary.memory_bytes);
    }

    #[test]
    fn test_comparison_propagates_capacity_error() {
        let catalog = Catalog::new(vec![Region::new("big", 1, 9)]).unwrap();
        let capacity = Capacity::from_k(3).unwrap();
        let memory = MemoryModel::new(10, capacity, 0);
        let err = Comparison::run(&catalog, capacity, &memory, Strategy::BestFit).unwrap_err();
        assert!(matches!(err, PackError::CapacityExceeded { .. }));
    }

    #[test]
    fn test_comparison_propagates_memory_overflow() {
        let catalog = Catalog::new(vec![Region::new("wide", u64::MAX / 2, 1)]).unwrap();
        let capacity = Capacity::from_k(40).unwrap();
        let memory = MemoryModel::new(10, capacity, 65);
        let err = Comparison::run(&catalog, capacity, &memory, Strategy::FirstFit).unwrap_err();
        assert!(matches!(err, PackError::Overflow { .. }));
    }

    #[test]
    fn test_save_reports() {
        let dir = TempDir::new().unwrap();
        let comparison = comparison();

        let html = comparison.save_report(ReportFormat::Html, dir.path()).unwrap();
        let content = std::fs::read_to_string(&html).unwrap();
        assert!(content.contains("first-fit"));
        assert!(content.contains("<td>keccak</td>"));
        assert!(content.contains(
            "<tr><td>mpt</td><td>156</td><td>20</td><td>(229, 0)</td><td>(203, 30)</td></tr>"
        ));

        let json = comparison.save_report(ReportFormat::Json, dir.path()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(value["merged_summary"]["advice_columns"], 359);
        assert_eq!(value["merged"]["strategy"], "first-fit");

        let csv = comparison.save_report(ReportFormat::Csv, dir.path()).unwrap();
        let content = std::fs::read_to_string(&csv).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("baseline,385,5,3,"));
        assert!(lines[2].starts_with("first-fit,359,5,2,"));
    }

    #[test]
    fn test_report_format_names() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::Csv.to_string(), "csv");
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_html_encode() {
        assert_eq!(html_encode("<a & b>"), "&lt;a &amp; b&gt;");
    }
}
