mod display;
mod input;
mod play;
mod policy;
mod reports;
mod simulate;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write, stdin, stdout};
use std::path::{Path, PathBuf};

use foodtruck_game::{FileSource, ScenarioCatalog, ScenarioSource, catalog};
use policy::GameplayStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Play interactively in the terminal
    Play,
    /// Run automated strategies and report on the outcomes
    Simulate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "foodtruck", version)]
#[command(about = "Food Truck Manager - survive 15 days of running a food truck")]
struct Args {
    /// Play interactively or simulate automated strategies
    #[arg(long, value_enum, default_value_t = RunMode::Play)]
    mode: RunMode,

    /// Seed for reproducible scenario draws (base seed in simulate mode)
    #[arg(long)]
    seed: Option<String>,

    /// Session identifier for the interactive game
    #[arg(long)]
    session_id: Option<String>,

    /// Load scenarios from a JSON catalog instead of the built-in set
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Strategies to simulate (comma-separated, default all)
    #[arg(long, value_enum, value_delimiter = ',')]
    strategies: Vec<GameplayStrategy>,

    /// Number of runs per strategy (simulate mode only)
    #[arg(long, default_value_t = 25)]
    iterations: usize,

    /// Output report format (simulate mode only)
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Never wait for Enter between turns
    #[arg(long)]
    no_pause: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(&args) {
        eprintln!("{} {err:#}", "❌ Error:".bright_red().bold());
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(args: &Args) -> Result<()> {
    if args.list_strategies {
        return list_strategies(args.output.clone());
    }

    let loaded;
    let catalog: &ScenarioCatalog = if let Some(path) = &args.catalog {
        loaded = load_catalog(path)?;
        &loaded
    } else {
        catalog()
    };

    match args.mode {
        RunMode::Play => run_play(args, catalog),
        RunMode::Simulate => run_simulate(args, catalog),
    }
}

fn list_strategies(output: Option<PathBuf>) -> Result<()> {
    let mut output_target = OutputTarget::new(output)?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in GameplayStrategy::ALL {
        let key = strategy
            .to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_default();
        writeln!(
            output_target.writer(),
            "  {key:10} - {}",
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(())
}

fn load_catalog(path: &Path) -> Result<ScenarioCatalog> {
    let source = FileSource::new(path);
    let json = source.load_scenarios()?;
    // Rejected entries are already logged one by one while loading.
    let (loaded, report) = ScenarioCatalog::from_json(&json)
        .with_context(|| format!("failed to load {}", path.display()))?;
    if loaded.is_empty() {
        bail!("{} contains no usable scenarios", path.display());
    }
    log::info!(
        "Using catalog {} | accepted:{} rejected:{}",
        path.display(),
        report.accepted,
        report.rejected.len()
    );
    Ok(loaded)
}

fn run_play(args: &Args, catalog: &ScenarioCatalog) -> Result<()> {
    let interactive = stdin().is_terminal();
    let mut input = stdin().lock();
    let mut out = stdout().lock();
    play::run_sitting(
        catalog,
        args.session_id.as_deref(),
        args.seed.as_deref(),
        &mut input,
        &mut out,
        interactive && !args.no_pause,
    )?;
    out.flush()?;
    Ok(())
}

fn run_simulate(args: &Args, catalog: &ScenarioCatalog) -> Result<()> {
    let strategies = if args.strategies.is_empty() {
        GameplayStrategy::ALL.to_vec()
    } else {
        args.strategies.clone()
    };
    let base_seed = args.seed.as_deref().unwrap_or("foodtruck");

    if args.report == ReportFormat::Console && args.output.is_none() {
        println!("{}", "🚚 Food Truck Manager Simulator".bright_cyan().bold());
        println!("{}", "===============================".cyan());
    }

    let report = simulate::run_batch(catalog, &strategies, args.iterations, base_seed);

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, &report)?,
        ReportFormat::Markdown => reports::generate_markdown_report(&mut output_target, &report)?,
        ReportFormat::Console => reports::generate_console_report(&mut output_target, &report)?,
    }
    output_target.flush_inner()?;

    if !report.all_passed() {
        bail!("one or more simulated runs failed their checks");
    }
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
