use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollguide::{
    CapabilityDecision, JsonLines, PlatformSignals, Scheduler, Script, Stage, StageConfig,
    Viewport,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(name = "scrollguide", version)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the guide's target pose for one progress value.
    Sample(SampleArgs),
    /// Evaluate the capability gate for a JSON file of platform signals.
    Capability(CapabilityArgs),
    /// Replay a scripted browsing session and emit one display list per frame (JSONL).
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 1440.0)]
    width: f64,

    /// Viewport height in CSS pixels.
    #[arg(long, default_value_t = 900.0)]
    height: f64,

    /// Stage configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CapabilityArgs {
    /// Platform signals JSON.
    #[arg(long)]
    signals: PathBuf,

    /// Stage configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Session script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Stage configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Display refresh rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Output JSONL path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Sample(args) => cmd_sample(args),
        Command::Capability(args) => cmd_capability(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StageConfig> {
    match path {
        Some(p) => StageConfig::from_path(p)
            .with_context(|| format!("load stage config '{}'", p.display())),
        None => Ok(StageConfig::default()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {what} JSON"))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("write JSON")?;
    writeln!(stdout).context("write JSON")?;
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be in [0, 1], got {}", args.progress);
    }
    let cfg = load_config(args.config.as_deref())?;
    let viewport = Viewport::new(args.width, args.height)?;
    let pose = cfg.guide.interpolator.target_pose(args.progress, viewport);
    print_json(&pose)
}

fn cmd_capability(args: CapabilityArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let signals: PlatformSignals = read_json(&args.signals, "signals")?;
    let decision = CapabilityDecision::evaluate(&cfg.capability, &signals);
    print_json(&decision)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be > 0");
    }
    let cfg = load_config(args.config.as_deref())?;
    let script: Script = read_json(&args.script, "script")?;

    let out: Box<dyn Write> = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let mut presenter = JsonLines::new(out);

    let mut sched = Scheduler::new();
    let mut stage = Stage::mount(
        cfg,
        script.signals,
        script.session,
        script.metrics,
        script.offset_px,
        &mut sched,
    )?;

    let frame_ms = (1000 / u64::from(args.fps)).max(1);
    let frames = scrollguide::replay(
        &mut stage,
        &script.events,
        script.duration_ms,
        frame_ms,
        &mut sched,
        &mut presenter,
    )?;
    stage.unmount(&mut sched);

    presenter.into_inner().flush().context("flush display lists")?;
    tracing::info!(
        frames,
        live = sched.live().total(),
        ledger = ?sched.ledger(),
        "simulation finished"
    );
    Ok(())
}
