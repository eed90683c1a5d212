#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::num::ParseIntError;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use rand::SeedableRng;
use torus_life::LifeError;
use torus_life::torus::{KernelBackend, TorusLife, TorusLifeConfig};

/// Time the scalar and parallel kernels on the same seeded torus
#[derive(Parser, Clone, Debug)]
#[command(name = "bench_kernel")]
struct BenchArgs {
    /// Side length of the square grid
    #[arg(long, default_value_t = 1024)]
    size: i64,

    /// Untimed generations before measuring
    #[arg(long, default_value_t = 3)]
    warmup: u64,

    /// Timed generations
    #[arg(long, default_value_t = 30)]
    iters: u64,

    /// RNG seed, decimal or `0x`-prefixed hex
    #[arg(long, default_value = "0xA5A55EED77881122", value_parser = parse_seed)]
    seed: u64,

    /// Worker threads for the parallel kernel
    #[arg(long)]
    threads: Option<usize>,
}

fn parse_seed(s: &str) -> Result<u64, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    }
}

#[derive(Clone, Copy, Debug)]
struct RunResult {
    total_ms: f64,
    avg_ms: f64,
    population: u64,
}

fn run_backend(cfg: &BenchArgs, backend: KernelBackend) -> Result<RunResult, LifeError> {
    let total = cfg.warmup + cfg.iters;
    let mut config = TorusLifeConfig::default()
        .rows(cfg.size)
        .cols(cfg.size)
        .steps(total.max(1) as i64)
        .kernel(backend);
    if let Some(t) = cfg.threads {
        config = config.thread_count(t);
    }
    let mut engine = TorusLife::with_config(config)?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(cfg.seed);
    engine.seed_random(&mut rng);

    engine.step_n(cfg.warmup);

    let start = Instant::now();
    engine.step_n(cfg.iters);
    let elapsed = start.elapsed();
    let total_ms = elapsed.as_secs_f64() * 1000.0;
    let avg_ms = total_ms / cfg.iters.max(1) as f64;

    Ok(RunResult {
        total_ms,
        avg_ms,
        population: engine.population(),
    })
}

fn main() -> ExitCode {
    let cfg = BenchArgs::parse();

    let mut results = Vec::new();
    for backend in [KernelBackend::Scalar, KernelBackend::Parallel] {
        match run_backend(&cfg, backend) {
            Ok(result) => results.push((backend, result)),
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        }
    }

    println!(
        "{:<10} {:>12} {:>12} {:>12}",
        "Kernel", "Total(ms)", "Avg(ms)", "Population"
    );
    println!("{}", "-".repeat(50));
    for (backend, r) in &results {
        println!(
            "{:<10} {:>12.2} {:>12.4} {:>12}",
            backend.name(),
            r.total_ms,
            r.avg_ms,
            r.population
        );
    }

    let (_, scalar) = results[0];
    let (_, parallel) = results[1];
    let match_status = if scalar.population == parallel.population {
        "MATCH"
    } else {
        "MISMATCH"
    };
    println!(
        "\nSpeedup (scalar / parallel): {:.2}x [{match_status}]",
        scalar.total_ms / parallel.total_ms
    );
    ExitCode::SUCCESS
}
