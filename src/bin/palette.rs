use anyhow::{Context, Result};
use clap::Parser;
use image_to_palette_wasm::{
    ColorInfo, ColorPalette, ExportDocument, ExtractorConfig, ImageSource, PaletteExtractor,
    export_palette,
};
use rand::{SeedableRng, rngs::StdRng};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Extract a categorized color palette from images and export it as a design system.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more image paths or http(s) URLs
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Seed for centroid initialization (reproducible palettes)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON config file (defaults to $PALETTE_EXTRACTOR_CONFIG, then built-ins)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of dominant colors
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Write a design-system JSON export next to each palette
    #[arg(short, long)]
    export: bool,

    /// Display name used for the export file name (defaults to the input's stem)
    #[arg(short, long)]
    name: Option<String>,

    /// Output directory for exports
    #[arg(short = 'd', long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the palette as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_row(label: &str, colors: &[&ColorInfo]) {
    let cells: Vec<String> = colors
        .iter()
        .map(|c| format!("{} {:<10}", c.hex(), c.name()))
        .collect();
    println!("  {label:<10} {}", cells.join("  "));
}

fn print_palette(source: &str, palette: &ColorPalette) {
    println!("{source}");
    print_row("primary", &palette.primary.iter().collect::<Vec<_>>());
    print_row("secondary", &palette.secondary.iter().collect::<Vec<_>>());
    print_row("brand", &palette.brand.iter().collect::<Vec<_>>());
    let semantic: Vec<&ColorInfo> = palette.semantic.entries().map(|(_, c)| c).to_vec();
    print_row("semantic", &semantic);
}

fn write_export(dir: &Path, document: &ExportDocument) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(document.download_name());
    let w = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(w, document)?;
    Ok(path)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ExtractorConfig::load(path),
        None => ExtractorConfig::from_env(),
    };
    if let Some(k) = args.clusters.filter(|k| *k > 0) {
        config.clusters = k;
    }
    let extractor = PaletteExtractor::new(config);
    let mut seeded = args.seed.map(StdRng::seed_from_u64);

    for input in &args.inputs {
        let source = ImageSource::parse(input);
        let palette = match &mut seeded {
            Some(rng) => extractor.extract_with_rng(&source, rng),
            None => extractor.extract(&source),
        }
        .with_context(|| format!("palette extraction failed for {input}"))?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&palette)?);
        } else {
            print_palette(input, &palette);
        }

        if args.export {
            let display_name = args.name.clone().or_else(|| source.display_name());
            match export_palette(&palette, display_name.as_deref()) {
                Ok(document) => {
                    let out_path = write_export(&args.out_dir, &document)?;
                    info!(path = %out_path.display(), "saved design-system export");
                }
                Err(err) => {
                    error!(code = err.code.as_str(), details = ?err.details, "export failed");
                    anyhow::bail!("export failed for {input}: {err}");
                }
            }
        }
    }

    Ok(())
}
