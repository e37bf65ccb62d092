use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::info;
use md_core::{PixelBuffer, codec};
use md_decomp::{Partition, PartitionQueue, decompose, disc_se};
use md_morph::Replayer;
use md_window::EngineConfig;
use serde::Serialize;

const DEFAULT_RADIUS: usize = 9;

#[derive(Parser, Debug)]
#[command(name = "sedecomp")]
#[command(about = "Open or close an image by a decomposed disc structuring element")]
struct Cli {
    /// Input image; grayscale or colour (converted to luma).
    input: Option<PathBuf>,
    /// Disc radius in pixels.
    #[arg(default_value_t = DEFAULT_RADIUS)]
    radius: usize,
    #[arg(long, value_enum, default_value_t = Op::Opening)]
    op: Op,
    /// Binarise the input first: samples below the threshold become 0.
    #[arg(long)]
    threshold: Option<u8>,
    /// Open/close by each partition in turn instead of by the whole element.
    #[arg(long)]
    cascade: bool,
    /// Worker threads; defaults to the available parallelism.
    #[arg(long)]
    workers: Option<usize>,
    /// Output directory; defaults to the input's directory.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print the structuring element before decomposing it.
    #[arg(long)]
    show_se: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Opening,
    Closing,
    Both,
}

impl Op {
    fn filters(self) -> &'static [Filter] {
        match self {
            Op::Opening => &[Filter::Opening],
            Op::Closing => &[Filter::Closing],
            Op::Both => &[Filter::Opening, Filter::Closing],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    Opening,
    Closing,
}

impl Filter {
    fn name(self) -> &'static str {
        match self {
            Filter::Opening => "opening",
            Filter::Closing => "closing",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Report {
    input: PathBuf,
    width: usize,
    height: usize,
    radius: usize,
    replay: &'static str,
    threshold: Option<u8>,
    engine: EngineConfig,
    partitions: Vec<Partition>,
    decompose_ms: f64,
    outputs: Vec<OutputDto>,
}

#[derive(Debug, Clone, Serialize)]
struct OutputDto {
    operation: &'static str,
    path: PathBuf,
    elapsed_ms: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let Some(input) = cli.input.clone() else {
        println!("Image name not provided on the command line, nothing to do.");
        println!("usage: sedecomp <INPUT> [RADIUS] [--op opening|closing|both]");
        return Ok(());
    };

    run(&cli, &input)
}

fn run(cli: &Cli, input: &Path) -> Result<()> {
    ensure_file_exists(input, "input")?;
    let img = load_gray(input, cli.threshold)?;

    let mut engine = EngineConfig::default();
    if let Some(workers) = cli.workers {
        engine.worker_count = workers;
    }
    let replayer = Replayer::new(engine).context("building worker pool")?;

    let se = disc_se(cli.radius);
    if cli.show_se {
        println!("structuring element (radius {}):", cli.radius);
        print!("{}", render_se(&se));
    }

    let start = Instant::now();
    let queue = decompose(&se)
        .with_context(|| format!("decomposing disc of radius {}", cli.radius))?;
    let decompose_ms = elapsed_ms(start);
    info!(
        "disc r={} -> {} partitions in {decompose_ms:.3} ms",
        cli.radius,
        queue.len()
    );

    let out_dir = match &cli.out {
        Some(dir) => dir.clone(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input path has no file name")?;

    let filters = cli.op.filters();
    let mut outputs = Vec::with_capacity(filters.len());
    for &f in filters {
        let operation = f.name();
        let start = Instant::now();
        let filtered = apply(&replayer, &img, &queue, f, cli.cascade)?;
        let ms = elapsed_ms(start);
        info!(
            "{operation} ({}) of {}x{} in {ms:.3} ms",
            replay_name(cli.cascade),
            img.width(),
            img.height()
        );

        let path = out_dir.join(format!("{stem}_{operation}.png"));
        codec::write_image(&filtered, &path)
            .with_context(|| format!("saving image {}", path.display()))?;
        outputs.push(OutputDto {
            operation,
            path,
            elapsed_ms: ms,
        });
    }

    write_json(
        out_dir.join(format!("{stem}_decomposition.json")),
        &Report {
            input: input.to_path_buf(),
            width: img.width(),
            height: img.height(),
            radius: cli.radius,
            replay: replay_name(cli.cascade),
            threshold: cli.threshold,
            engine: *replayer.engine().config(),
            partitions: queue.iter().copied().collect(),
            decompose_ms,
            outputs,
        },
    )
}

fn apply(
    replayer: &Replayer,
    img: &PixelBuffer,
    queue: &PartitionQueue,
    filter: Filter,
    cascade: bool,
) -> Result<PixelBuffer> {
    let out = match (filter, cascade) {
        (Filter::Opening, false) => replayer.opening(img, queue)?,
        (Filter::Closing, false) => replayer.closing(img, queue)?,
        (Filter::Opening, true) => {
            let mut out = img.clone();
            replayer.cascade_opening(&mut out, queue.clone())?;
            out
        }
        (Filter::Closing, true) => {
            let mut out = img.clone();
            replayer.cascade_closing(&mut out, queue.clone())?;
            out
        }
    };
    Ok(out)
}

fn load_gray(path: &Path, threshold: Option<u8>) -> Result<PixelBuffer> {
    let img = codec::read_image(path)
        .with_context(|| format!("opening input image {}", path.display()))?
        .to_gray();
    Ok(match threshold {
        Some(t) => img.to_binary(t),
        None => img,
    })
}

fn render_se(se: &PixelBuffer) -> String {
    let mut out = String::with_capacity((se.width() + 1) * se.height());
    for y in 0..se.height() {
        out.extend(se.row(y).iter().map(|&v| if v != 0 { '#' } else { '.' }));
        out.push('\n');
    }
    out
}

fn replay_name(cascade: bool) -> &'static str {
    if cascade { "cascade" } else { "exact" }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1e3
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
