use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

use region_packer::memory::to_gib;
use region_packer::{Config, Strategy, pack_with};

#[derive(Parser)]
#[command(author, version, about = "Pack circuit regions into a 2^k row grid", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Capacity exponent (overrides layout.k)
    #[arg(short, long)]
    k: Option<u32>,

    /// Placement strategy (overrides layout.strategy)
    #[arg(short, long)]
    strategy: Option<Strategy>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config)?;
    if let Some(k) = args.k {
        config.layout.k = k;
    }
    if let Some(strategy) = args.strategy {
        config.layout.strategy = strategy;
    }
    config.validate()?;

    let capacity = config.capacity()?;
    let loaded = config.load_catalog()?;
    info!(
        "Loaded {} regions, capacity 2^{} = {} rows",
        loaded.catalog.len(),
        capacity.k(),
        capacity.rows()
    );

    let placement = pack_with(&loaded.catalog, capacity, config.layout.strategy)?;
    placement.check_valid(capacity)?;

    info!("= {} =", placement.strategy);
    for region in &placement {
        info!(
            "{:<10} x = {:>5}, y = {:>9}, w = {:>4}, h = {:>9}",
            region.name, region.x, region.y, region.width, region.height
        );
    }

    let memory = config.memory_model(loaded.fixed_columns)?;
    info!(
        "advice = {}, fixed = {}, bands = {}",
        placement.total_width(),
        loaded.fixed_columns,
        placement.band_count()
    );
    info!(
        "Mem estimation: {} GiB",
        to_gib(memory.estimate_placement_bytes(&placement)?)
    );
    info!("Area usage: {:.2}%", placement.usage_percent(capacity));
    debug!("Layout height: {} rows", placement.total_height());

    Ok(())
}
