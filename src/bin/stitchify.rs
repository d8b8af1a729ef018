use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use image_to_cross_stitch_wasm::{
    FabricOptions, ImportOptions, Palette, PatternGrid, RenderOptions, pattern_from_image_bytes,
    pattern_stats, reduce, render_png, usage,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Turn photos into cross-stitch patterns (native wrapper around the WASM library).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quantize an image to the DMC palette and write the grid as JSON
    Import(ImportArgs),
    /// Reduce a saved grid to fewer colors
    Reduce(ReduceArgs),
    /// Print thread legend, skeins and time estimate as JSON
    Stats(StatsArgs),
    /// Render a saved grid to PNG
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Input image path
    input: PathBuf,

    /// Grid width in stitches
    #[arg(short = 'W', long, default_value_t = 100)]
    width: usize,

    /// Grid height in stitches
    #[arg(short = 'H', long, default_value_t = 100)]
    height: usize,

    /// Reduce to at most this many colors
    #[arg(short = 'k', long)]
    colors: Option<usize>,

    /// Zoom into the centered crop (1.0 = largest crop that fits)
    #[arg(short, long, default_value_t = 1.0)]
    zoom: f32,

    /// Horizontal pan of the crop, in source pixels
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pan_x: i64,

    /// Vertical pan of the crop, in source pixels
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pan_y: i64,

    /// Comma-separated list of hex colors to match against instead of DMC
    #[arg(short = 'c', long)]
    palette: Option<String>,

    /// Output grid JSON
    #[arg(short, long)]
    output: PathBuf,

    /// Also write a PNG preview
    #[arg(long)]
    png: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReduceArgs {
    /// Grid JSON to read
    input: PathBuf,

    /// Target color count
    #[arg(short = 'k', long)]
    colors: usize,

    /// Output grid JSON (defaults to overwriting the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Grid JSON to read
    input: PathBuf,

    /// Fabric count (stitches per inch)
    #[arg(short, long, default_value_t = 14)]
    fabric_count: u32,

    /// Strands of floss per stitch
    #[arg(short, long, default_value_t = 2)]
    strands: u32,

    /// Stitching speed
    #[arg(long, default_value_t = 120)]
    stitches_per_hour: u32,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Grid JSON to read
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Pixel size of one stitch
    #[arg(long, default_value_t = 10)]
    cell_size: u32,

    /// Draw grid lines
    #[arg(long)]
    show_grid: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Import(args) => import(args),
        Command::Reduce(args) => reduce_cmd(args),
        Command::Stats(args) => stats(args),
        Command::Render(args) => render(args),
    }
}

fn read_grid(path: &Path) -> Result<PatternGrid> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    PatternGrid::from_json(&json).with_context(|| format!("parsing grid in {}", path.display()))
}

fn write_file(path: &Path, bytes: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn import(args: ImportArgs) -> Result<()> {
    let custom = match &args.palette {
        Some(list) => {
            let hex: Vec<&str> = list.split(',').map(str::trim).collect();
            Some(Palette::from_hex_list(&hex).context("invalid --palette")?)
        }
        None => None,
    };
    let palette = custom.as_ref().unwrap_or_else(|| Palette::dmc());

    let options = ImportOptions {
        width: args.width,
        height: args.height,
        zoom: args.zoom,
        pan_x: args.pan_x,
        pan_y: args.pan_y,
        max_colors: args.colors,
    };
    let bytes = fs::read(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let grid = pattern_from_image_bytes(&bytes, &options, palette).context("pattern import failed")?;

    write_file(&args.output, grid.to_json()?)?;
    tracing::info!(
        path = %args.output.display(),
        width = grid.width(),
        height = grid.height(),
        colors = usage(&grid).len(),
        "saved pattern"
    );

    if let Some(png_path) = &args.png {
        write_file(png_path, render_png(&grid, &RenderOptions::default())?)?;
        tracing::info!(path = %png_path.display(), "saved preview");
    }
    Ok(())
}

fn reduce_cmd(args: ReduceArgs) -> Result<()> {
    let grid = read_grid(&args.input)?;
    let before = usage(&grid).len();
    let reduced = reduce(&grid, args.colors);
    let out = args.output.as_ref().unwrap_or(&args.input);
    write_file(out, reduced.to_json()?)?;
    tracing::info!(from = before, to = usage(&reduced).len(), path = %out.display(), "reduced colors");
    Ok(())
}

fn stats(args: StatsArgs) -> Result<()> {
    let grid = read_grid(&args.input)?;
    let options = FabricOptions {
        fabric_count: args.fabric_count,
        strands: args.strands,
        stitches_per_hour: args.stitches_per_hour,
        ..FabricOptions::default()
    };
    let stats = pattern_stats(&grid, Palette::dmc(), &options);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn render(args: RenderArgs) -> Result<()> {
    let grid = read_grid(&args.input)?;
    let options = RenderOptions {
        cell_size: args.cell_size,
        show_grid: args.show_grid,
    };
    write_file(&args.output, render_png(&grid, &options)?)?;
    tracing::info!(path = %args.output.display(), "saved png");
    Ok(())
}
