use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::{SeedableRng as _, rngs::StdRng};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "slidewave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a batch of videos (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single slide as a PNG.
    Slide(SlideArgs),
    /// Synthesize one video's waveform track as a WAV (speech is mixed only by `render`).
    Audio(AudioArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Scratch root for intermediate slides and audio. Purged at the start of every run.
    #[arg(long)]
    work_dir: PathBuf,

    /// Directory receiving the finished videos.
    #[arg(long)]
    out_dir: PathBuf,

    /// Batch seed; overrides `seed` from the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the batch report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SlideArgs {
    /// Configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Slide index (0-based).
    #[arg(long, default_value_t = 0)]
    index: u32,

    /// Video tag drawn in the corner.
    #[arg(long, default_value = "preview")]
    tag: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct AudioArgs {
    /// Configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output WAV path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slidewave=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Slide(args) => cmd_slide(args),
        Command::Audio(args) => cmd_audio(args),
    }
}

fn read_config(path: &Path) -> anyhow::Result<slidewave::Config> {
    let cfg = slidewave::Config::load(path)?;
    cfg.validate()
        .with_context(|| format!("config '{}'", path.display()))?;
    Ok(cfg)
}

fn resolve_seed(arg: Option<u64>, cfg: &slidewave::Config) -> u64 {
    let seed = arg.or(cfg.seed).unwrap_or_else(rand::random);
    tracing::info!(seed, "using seed");
    seed
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.config)?;
    let scratch = slidewave::ScratchDirs::acquire(&args.work_dir)?;
    let mut pipeline = slidewave::Pipeline::new(cfg)?;
    let report = pipeline.run(&scratch, &args.out_dir, args.seed)?;

    for video in &report.videos {
        println!("{}", video.status_line());
    }
    if let Some(path) = &args.report {
        report.write_json(path)?;
    }

    let failed = report.videos.iter().filter(|v| v.path().is_none()).count();
    if failed > 0 {
        anyhow::bail!(
            "{failed} of {} videos failed (seed {})",
            report.videos.len(),
            report.seed
        );
    }
    Ok(())
}

fn cmd_slide(args: SlideArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.config)?;
    let mut rng = StdRng::seed_from_u64(resolve_seed(args.seed, &cfg));
    let mut composer = slidewave::SceneComposer::from_config(&cfg)?;
    let slide = composer.compose(args.index, &args.tag, &mut rng)?;

    slidewave::ensure_parent_dir(&args.out)?;
    slide.save_as(&args.out)?;
    eprintln!(
        "wrote {} ({} shapes, {} overlays)",
        args.out.display(),
        slide.shapes.len(),
        slide.overlays.len()
    );
    Ok(())
}

fn cmd_audio(args: AudioArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.config)?;
    let mut rng = StdRng::seed_from_u64(resolve_seed(args.seed, &cfg));
    let synth = slidewave::Synthesizer::from_config(&cfg);
    let track = slidewave::AudioTrack::synthesize(&synth, &cfg.slide_durations_ms(), &mut rng);

    slidewave::ensure_parent_dir(&args.out)?;
    track.write_wav(&args.out)?;
    eprintln!(
        "wrote {} ({} samples, {:.3}s at {} Hz)",
        args.out.display(),
        track.len(),
        track.duration_secs(),
        track.sample_rate
    );
    Ok(())
}
