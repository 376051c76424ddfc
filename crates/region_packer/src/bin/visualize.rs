use region_packer::{Config, RenderOptions, Strategy, pack_with, render_placement};
use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::{fs, path::PathBuf};
use strum::IntoEnumIterator;

#[derive(Parser)]
#[command(author, version, about = "Render the catalog layout of every strategy", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = Config::load_or_default(&args.config)?;
    config.validate()?;
    if !config.output.render {
        warn!("output.render is false, nothing to visualize");
        return Ok(());
    }

    let capacity = config.capacity()?;
    let loaded = config.load_catalog()?;

    let output_dir = &config.output.output_dir;
    fs::create_dir_all(output_dir)?;

    let options = RenderOptions {
        width: config.output.image_width,
        height: config.output.image_height,
        ..Default::default()
    };

    // same horizontal scale for every image so widths compare visually
    let max_width = loaded.catalog.total_width();

    for strategy in Strategy::iter() {
        let placement = pack_with(&loaded.catalog, capacity, strategy)?;
        placement.check_valid(capacity)?;

        let output_path = output_dir.join(format!("layout_k{}_{}.png", capacity.k(), strategy));
        render_placement(&placement, capacity, max_width, &output_path, &options)?;
        info!(
            "wrote {} (advice = {}, bands = {})",
            output_path.display(),
            placement.total_width(),
            placement.band_count()
        );
    }

    info!("All layout visualizations generated in {}", output_dir.display());
    Ok(())
}
