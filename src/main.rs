#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::convert::Infallible;
use std::process::ExitCode;

use clap::Parser;
use torus_life::LifeError;
use torus_life::torus::{
    DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_TIME_STEPS, KernelBackend, Renderer, TokenStyle,
    TorusLife, TorusLifeConfig,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::LevelFilter};

/// Read a count the way C's `atoi` does: leading whitespace, an optional
/// sign, then as many digits as follow. No digits reads as 0, so malformed
/// input is reported by config validation rather than by the parser.
fn parse_count(s: &str) -> Result<i64, Infallible> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value = 0i64;
    for d in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(d - b'0'));
    }
    Ok(if negative { -value } else { value })
}

/// Conway's Game of Life on a torus, printed one generation at a time
#[derive(Parser, Debug)]
#[command(name = "torus-life")]
#[command(long_about = None)]
struct Args {
    /// Number of grid rows
    #[arg(
        short = 'r',
        long,
        default_value_t = DEFAULT_ROWS,
        value_parser = parse_count,
        allow_negative_numbers = true
    )]
    rows: i64,

    /// Number of grid columns
    #[arg(
        short = 'c',
        long,
        default_value_t = DEFAULT_COLUMNS,
        value_parser = parse_count,
        allow_negative_numbers = true
    )]
    cols: i64,

    /// Number of generations to simulate
    #[arg(
        short = 't',
        long,
        default_value_t = DEFAULT_TIME_STEPS,
        value_parser = parse_count,
        allow_negative_numbers = true
    )]
    steps: i64,

    /// Seed for the initial state (random from the OS if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads for the parallel kernel
    #[arg(long)]
    threads: Option<usize>,

    /// Kernel backend (scalar, parallel); chosen by grid size if omitted
    #[arg(long)]
    kernel: Option<KernelBackend>,

    /// Print `#`/`.` instead of `1`/`0`
    #[arg(long)]
    markers: bool,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> TorusLifeConfig {
        let mut config = TorusLifeConfig::default()
            .rows(self.rows)
            .cols(self.cols)
            .steps(self.steps);
        if let Some(seed) = self.seed {
            config = config.seed(seed);
        }
        if let Some(n) = self.threads {
            config = config.thread_count(n);
        }
        if let Some(backend) = self.kernel {
            config = config.kernel(backend);
        }
        config
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
    }
}

fn run(args: &Args) -> Result<(), LifeError> {
    let mut engine = TorusLife::with_config(args.config())?;
    engine.seed_from_config();

    let style = if args.markers {
        TokenStyle::Markers
    } else {
        TokenStyle::Digits
    };
    let mut renderer = Renderer::stdout(style);
    engine.run_with(|frame| renderer.write_frame(frame))?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "run aborted");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
