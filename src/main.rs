use accent_color::data::config::Config;
use accent_color::data::image_loader::load_rgba;
use accent_color::render::format::{format_color, OutputFormat};
use accent_color::utils::hash::hash_file_identity;
use accent_color::{AccentExtractor, AccentHandle, Color};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;

/// Print the accent color of each image.
#[derive(Debug, Parser)]
#[command(name = "accent-color", version)]
struct Args {
    /// Image files (png, jpeg, gif, bmp, webp)
    #[arg(required_unless_present = "write_config")]
    images: Vec<PathBuf>,

    /// Sample every n-th pixel within each chunk
    #[arg(short, long)]
    downsample: Option<i64>,

    /// Histogram threads (default: 3/4 of the CPUs)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    write_config: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match args.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default()?,
    };
    if let Some(d) = args.downsample {
        config.downsample_factor = d;
    }
    if let Some(w) = args.workers {
        config.workers = Some(w);
    }
    if let Some(f) = args.format {
        config.format = f;
    }

    if args.write_config {
        let path = config.save(args.config.as_deref())?;
        println!("{}", path.display());
        return Ok(());
    }

    let extractor = AccentExtractor::new(config.concurrency_hint()).context("start histogram pool")?;
    let mut handle = AccentHandle::spawn(extractor, config.cache_capacity)?;

    let mut results: Vec<Option<Result<Color>>> = Vec::with_capacity(args.images.len());
    let mut slots: HashMap<u64, usize> = HashMap::new();

    for (slot, path) in args.images.iter().enumerate() {
        match load_rgba(path) {
            Ok(img) => {
                let id = match hash_file_identity(path) {
                    Some(key) => handle.submit_image_keyed(img, config.downsample(), key)?,
                    None => handle.submit_image(img, config.downsample())?,
                };
                slots.insert(id, slot);
                results.push(None);
            }
            Err(e) => results.push(Some(Err(e.into()))),
        }
    }

    while !slots.is_empty() {
        let outcome = handle
            .recv()
            .ok_or_else(|| anyhow!("accent worker exited with {} images pending", slots.len()))?;
        if let Some(slot) = slots.remove(&outcome.id()) {
            results[slot] = Some(outcome.into_result().map_err(Into::into));
        }
    }

    let mut failed = 0usize;
    for (path, result) in args.images.iter().zip(results) {
        match result.unwrap_or_else(|| Err(anyhow!("no outcome received"))) {
            Ok(color) => println!("{}: {}", path.display(), format_color(color, config.format)),
            Err(e) => {
                failed += 1;
                log::warn!("{}: {e:#}", path.display());
                eprintln!("{}: error: {e:#}", path.display());
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}
