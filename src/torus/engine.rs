use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::grid::Grid;
use super::kernel::{self, KernelBackend};
use super::rules::RuleTable;
use crate::error::{ConfigError, LifeError};

pub const MINIMUM_ROWS: i64 = 1;
pub const MINIMUM_COLUMNS: i64 = 1;
pub const MINIMUM_TIME_STEPS: i64 = 1;

pub const DEFAULT_ROWS: i64 = 5;
pub const DEFAULT_COLUMNS: i64 = 5;
pub const DEFAULT_TIME_STEPS: i64 = 5;

/// Grids with at least this many real cells default to the parallel kernel.
const PARALLEL_CELL_THRESHOLD: usize = 64 * 1024;

/// Configuration for a TorusLife run.
///
/// Dimensions are kept signed so that out-of-range input from the command
/// line reaches [`TorusLifeConfig::validate`] and is reported there.
#[derive(Clone, Debug)]
pub struct TorusLifeConfig {
    pub rows: i64,
    pub cols: i64,
    pub steps: i64,
    /// Seed for the random initial state. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Worker threads for the parallel kernel.
    /// `None` means one per available core.
    pub thread_count: Option<usize>,
    /// Kernel backend selection.
    /// `None` picks scalar for small grids and parallel above
    /// `PARALLEL_CELL_THRESHOLD` cells.
    pub kernel: Option<KernelBackend>,
}

impl Default for TorusLifeConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLUMNS,
            steps: DEFAULT_TIME_STEPS,
            seed: None,
            thread_count: None,
            kernel: None,
        }
    }
}

/// Validated run dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
    pub steps: u64,
}

impl TorusLifeConfig {
    pub fn rows(mut self, n: i64) -> Self {
        self.rows = n;
        self
    }

    pub fn cols(mut self, n: i64) -> Self {
        self.cols = n;
        self
    }

    pub fn steps(mut self, n: i64) -> Self {
        self.steps = n;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = Some(n.max(1));
        self
    }

    pub fn kernel(mut self, backend: KernelBackend) -> Self {
        self.kernel = Some(backend);
        self
    }

    /// Check every minimum, reporting all violations at once.
    pub fn validate(&self) -> Result<Dimensions, ConfigError> {
        let mut violations = Vec::new();
        ConfigError::check(&mut violations, "row", self.rows, MINIMUM_ROWS);
        ConfigError::check(&mut violations, "column", self.cols, MINIMUM_COLUMNS);
        ConfigError::check(&mut violations, "time step", self.steps, MINIMUM_TIME_STEPS);
        if !violations.is_empty() {
            return Err(ConfigError { violations });
        }

        // Positive i64 always fits u64; usize may be narrower.
        let rows = usize::try_from(self.rows).unwrap_or(usize::MAX);
        let cols = usize::try_from(self.cols).unwrap_or(usize::MAX);
        Ok(Dimensions {
            rows,
            cols,
            steps: self.steps as u64,
        })
    }
}

fn resolve_thread_count(config: &TorusLifeConfig) -> usize {
    config
        .thread_count
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
        .max(1)
}

fn resolve_kernel_backend(config: &TorusLifeConfig, dims: &Dimensions) -> KernelBackend {
    config.kernel.unwrap_or_else(|| {
        if dims.rows.saturating_mul(dims.cols) >= PARALLEL_CELL_THRESHOLD {
            KernelBackend::Parallel
        } else {
            KernelBackend::Scalar
        }
    })
}

/// Where a run is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    /// `step` generations have been computed so far.
    Running { step: u64 },
    Done,
}

/// A synced generation handed to the observer before it is advanced.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub step: u64,
    pub grid: &'a Grid,
}

/// Totals reported when a run finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub generations: u64,
    pub population: u64,
}

pub struct TorusLife {
    /// Generation buffers. `current` indexes the one holding the live state;
    /// the other is scratch for the next generation.
    buffers: [Grid; 2],
    current: usize,
    rule_table: RuleTable,
    dims: Dimensions,
    seed: Option<u64>,
    generation: u64,
    phase: Phase,
    backend: KernelBackend,
    /// Only built for the parallel backend.
    pool: Option<rayon::ThreadPool>,
}

impl TorusLife {
    /// Create an engine with default dimensions.
    pub fn new() -> Result<Self, LifeError> {
        Self::with_config(TorusLifeConfig::default())
    }

    /// Validate `config` and allocate both generation buffers.
    ///
    /// Nothing is allocated when validation fails.
    pub fn with_config(config: TorusLifeConfig) -> Result<Self, LifeError> {
        let dims = config.validate()?;
        let backend = resolve_kernel_backend(&config, &dims);

        let current = Grid::allocate(dims.rows, dims.cols, "malloc(current_grid)")?;
        let next = Grid::allocate(dims.rows, dims.cols, "malloc(next_grid)")?;

        let pool = match backend {
            KernelBackend::Parallel => {
                let threads = resolve_thread_count(&config);
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                Some(pool)
            }
            KernelBackend::Scalar => None,
        };

        debug!(
            rows = dims.rows,
            cols = dims.cols,
            steps = dims.steps,
            backend = backend.name(),
            threads = pool.as_ref().map_or(1, |p| p.current_num_threads()),
            "created torus"
        );

        Ok(Self {
            buffers: [current, next],
            current: 0,
            rule_table: RuleTable::new(),
            dims,
            seed: config.seed,
            generation: 0,
            phase: Phase::Initializing,
            backend,
            pool,
        })
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn backend(&self) -> KernelBackend {
        self.backend
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Generations computed so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn current(&self) -> &Grid {
        &self.buffers[self.current]
    }

    /// Mutable access to the live generation, for seeding patterns.
    #[inline]
    pub fn current_mut(&mut self) -> &mut Grid {
        &mut self.buffers[self.current]
    }

    pub fn population(&self) -> u64 {
        self.current().population()
    }

    /// Fill the live generation 50/50 from `rng`.
    pub fn seed_random<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current_mut().randomize(rng);
    }

    /// Fill the live generation from the configured seed, or from OS
    /// entropy when none was given.
    pub fn seed_from_config(&mut self) {
        let mut rng = match self.seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_os_rng(),
        };
        debug!(seed = ?self.seed, "seeding initial generation");
        self.seed_random(&mut rng);
    }

    fn advance_buffers(&mut self) -> u64 {
        let Self {
            buffers,
            current,
            rule_table,
            backend,
            pool,
            ..
        } = self;
        let [first, second] = buffers;
        let (src, dst) = if *current == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        };

        let backend = *backend;
        let changed = match pool {
            Some(pool) => pool.install(|| kernel::advance(src, dst, rule_table, backend)),
            None => kernel::advance(src, dst, rule_table, backend),
        };
        *current ^= 1;
        changed
    }

    /// Run one iteration: sync, show the generation to `observer`, then
    /// advance. Returns `false` without doing anything once the configured
    /// number of steps has been reached.
    pub fn step_with<F>(&mut self, mut observer: F) -> Result<bool, LifeError>
    where
        F: FnMut(Frame<'_>) -> Result<(), LifeError>,
    {
        if self.phase == Phase::Done {
            return Ok(false);
        }
        if self.phase == Phase::Initializing {
            self.phase = Phase::Running { step: 0 };
        }

        self.current_mut().sync_boundary();
        observer(Frame {
            step: self.generation,
            grid: self.current(),
        })?;

        let changed = self.advance_buffers();
        self.generation += 1;
        trace!(generation = self.generation, changed, "advanced");

        self.phase = if self.generation >= self.dims.steps {
            Phase::Done
        } else {
            Phase::Running {
                step: self.generation,
            }
        };
        Ok(true)
    }

    /// One iteration without an observer.
    pub fn step(&mut self) -> bool {
        let result: Result<bool, LifeError> = self.step_with(|_| Ok(()));
        matches!(result, Ok(true))
    }

    /// Up to `n` iterations without an observer. Returns how many ran.
    pub fn step_n(&mut self, n: u64) -> u64 {
        let mut ran = 0;
        while ran < n && self.step() {
            ran += 1;
        }
        ran
    }

    /// Drive the remaining iterations, rendering each generation through
    /// `observer` before it is advanced. The generation produced by the
    /// final iteration is never shown.
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<RunSummary, LifeError>
    where
        F: FnMut(Frame<'_>) -> Result<(), LifeError>,
    {
        while self.step_with(&mut observer)? {}

        let summary = RunSummary {
            generations: self.generation,
            population: self.population(),
        };
        info!(
            generations = summary.generations,
            population = summary.population,
            "simulation complete"
        );
        Ok(summary)
    }
}
