use region_packer::{
    Comparison, Config, RenderOptions, ReportFormat, Strategy, render_comparison,
    report::StrategySummary,
};
use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Compare the one-band-per-region layout with lane-band merging", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "config/default.toml")]
    config: PathBuf,

    /// Merging strategy to compare against the baseline
    #[arg(short = 's', long = "strategy")]
    strategy: Option<Strategy>,

    /// Report format for comparison results
    #[arg(short = 'r', long = "report")]
    report_format: Option<ReportFormat>,

    /// Output directory for the report and image
    #[arg(short = 'o', long = "output")]
    output_dir: Option<PathBuf>,

    /// Skip the PNG rendering
    #[arg(long = "no-render")]
    no_render: bool,
}

fn log_summary(title: &str, summary: &StrategySummary) {
    info!("= {} ({}) =", title, summary.strategy);
    info!(
        "advice = {}, fixed = {}, bands = {}",
        summary.advice_columns, summary.fixed_columns, summary.band_count
    );
    info!("Mem estimation: {} GiB", summary.memory_gib);
    info!("Area usage: {:.2}%", summary.usage_percent);
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config)?;
    if let Some(strategy) = args.strategy {
        config.layout.strategy = strategy;
    }
    if let Some(format) = args.report_format {
        config.output.report_format = format;
    }
    if let Some(dir) = args.output_dir {
        config.output.output_dir = dir;
    }
    if args.no_render {
        config.output.render = false;
    }
    config.validate()?;

    let capacity = config.capacity()?;
    let loaded = config.load_catalog()?;
    let memory = config.memory_model(loaded.fixed_columns)?;

    let comparison = Comparison::run(&loaded.catalog, capacity, &memory, config.layout.strategy)?;

    log_summary("Current", &comparison.baseline_summary);
    log_summary("Merged", &comparison.merged_summary);
    info!(
        "Advice column reduction: {:.2}%",
        comparison.width_improvement_percent
    );

    comparison.save_report(config.output.report_format, &config.output.output_dir)?;

    if config.output.render {
        let path = config.output.output_dir.join(format!(
            "comparison_k{}_{}.png",
            capacity.k(),
            config.layout.strategy
        ));
        let options = RenderOptions {
            width: config.output.image_width,
            height: config.output.image_height,
            ..Default::default()
        };
        render_comparison(
            &comparison.baseline,
            &comparison.merged,
            capacity,
            &path,
            &options,
        )?;
        info!("Layout image saved to: {}", path.display());
    }

    info!("Comparison completed successfully!");
    Ok(())
}
