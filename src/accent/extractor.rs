use crate::accent::color::Color;
use crate::accent::histogram::build_histogram;
use crate::accent::request::AccentRequest;
use crate::accent::select::select_accent;
use crate::error::Result;

/// Fraction of the machine's parallelism handed to histogram workers.
pub const DEFAULT_WORKER_FRACTION: f32 = 0.75;

/// `max(1, round(available * fraction))`.
pub fn concurrency_hint_for(available: usize, fraction: f32) -> usize {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { DEFAULT_WORKER_FRACTION };
    ((available as f32 * fraction).round() as usize).max(1)
}

pub fn default_concurrency_hint() -> usize {
    concurrency_hint_for(num_cpus::get(), DEFAULT_WORKER_FRACTION)
}

/// Clamps a requested worker count to `1..=cpus`.
pub fn bounded_concurrency_hint(requested: usize) -> usize {
    requested.clamp(1, num_cpus::get().max(1))
}

/// Runs the full pipeline on the current rayon pool.
pub fn extract_accent(request: &AccentRequest<'_>, concurrency_hint: usize) -> Result<Color> {
    let histogram = build_histogram(request.pixels(), request.downsample_factor(), concurrency_hint)?;
    select_accent(&histogram)
}

/// Owns a rayon pool with `concurrency_hint` threads, never more than the
/// machine has CPUs, so histogram work never spreads past that bound.
pub struct AccentExtractor {
    pool: rayon::ThreadPool,
    concurrency_hint: usize,
}

impl AccentExtractor {
    pub fn new(concurrency_hint: usize) -> Result<Self> {
        let concurrency_hint = bounded_concurrency_hint(concurrency_hint);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency_hint)
            .thread_name(|i| format!("accent-hist-{i}"))
            .build()?;
        log::debug!("accent extractor: {concurrency_hint} histogram threads");
        Ok(Self { pool, concurrency_hint })
    }

    pub fn with_default_hint() -> Result<Self> {
        Self::new(default_concurrency_hint())
    }

    pub fn concurrency_hint(&self) -> usize {
        self.concurrency_hint
    }

    pub fn extract(&self, request: &AccentRequest<'_>) -> Result<Color> {
        self.pool.install(|| extract_accent(request, self.concurrency_hint))
    }
}
