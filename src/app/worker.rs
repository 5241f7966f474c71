use crate::accent::color::Color;
use crate::accent::extractor::AccentExtractor;
use crate::accent::request::AccentRequest;
use crate::app::accent_cache::{AccentCache, CacheKey};
use crate::error::{AccentError, Result};
use image::RgbaImage;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

pub const WORKER_THREAD_NAME: &str = "accent-worker";

/// Pixels handed to the worker thread. Owns its buffer so it can cross threads.
#[derive(Debug, Clone)]
pub struct AccentJob {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub downsample_factor: usize,
    /// Caller's identity for the pixel source (e.g. path and mtime). Jobs
    /// without one are always extracted and never cached.
    pub cache_key: Option<u64>,
}

/// Exactly one of these comes back per job.
#[derive(Debug)]
pub enum AccentOutcome {
    Success { id: u64, color: Color, cached: bool },
    Failed { id: u64, error: AccentError },
}

impl AccentOutcome {
    pub fn id(&self) -> u64 {
        match self {
            AccentOutcome::Success { id, .. } | AccentOutcome::Failed { id, .. } => *id,
        }
    }

    pub fn into_result(self) -> Result<Color> {
        match self {
            AccentOutcome::Success { color, .. } => Ok(color),
            AccentOutcome::Failed { error, .. } => Err(error),
        }
    }
}

pub fn start_accent_worker(
    extractor: AccentExtractor,
    cache_capacity: usize,
) -> Result<(Sender<AccentJob>, Receiver<AccentOutcome>, JoinHandle<()>)> {
    let (tx, rx) = mpsc::channel::<AccentJob>();
    let (res_tx, res_rx) = mpsc::channel::<AccentOutcome>();

    let thread = std::thread::Builder::new()
        .name(WORKER_THREAD_NAME.into())
        .spawn(move || worker_loop(extractor, AccentCache::new(cache_capacity), rx, res_tx))
        .map_err(AccentError::WorkerSpawn)?;
    Ok((tx, res_rx, thread))
}

fn worker_loop(
    extractor: AccentExtractor,
    mut cache: AccentCache,
    rx: Receiver<AccentJob>,
    res_tx: Sender<AccentOutcome>,
) {
    log::info!(
        "accent worker started ({} histogram threads)",
        extractor.concurrency_hint()
    );

    // Runs until every job sender is gone; a job in flight always finishes.
    while let Ok(job) = rx.recv() {
        let id = job.id;
        let outcome = match process_job(&extractor, &mut cache, &job) {
            Ok((color, cached)) => AccentOutcome::Success { id, color, cached },
            Err(error) => {
                log::warn!("accent job {id} failed: {error}");
                AccentOutcome::Failed { id, error }
            }
        };
        if res_tx.send(outcome).is_err() {
            break;
        }
    }

    log::info!("accent worker stopped");
}

fn process_job(extractor: &AccentExtractor, cache: &mut AccentCache, job: &AccentJob) -> Result<(Color, bool)> {
    let request = AccentRequest::new(&job.pixels, job.width, job.height, job.downsample_factor)?;
    let key = job.cache_key.map(|source| CacheKey {
        source,
        downsample_factor: request.downsample_factor(),
    });

    if let Some(color) = key.and_then(|k| cache.get(k)) {
        log::debug!("accent job {}: cache hit", job.id);
        return Ok((color, true));
    }

    let color = extractor.extract(&request)?;
    if let Some(k) = key {
        cache.insert(k, color);
    }
    Ok((color, false))
}

/// Both ends of a running accent worker, plus job numbering.
pub struct AccentHandle {
    jobs: Sender<AccentJob>,
    outcomes: Receiver<AccentOutcome>,
    thread: JoinHandle<()>,
    next_id: u64,
}

impl AccentHandle {
    pub fn spawn(extractor: AccentExtractor, cache_capacity: usize) -> Result<Self> {
        let (jobs, outcomes, thread) = start_accent_worker(extractor, cache_capacity)?;
        Ok(Self {
            jobs,
            outcomes,
            thread,
            next_id: 0,
        })
    }

    pub fn worker_name(&self) -> Option<&str> {
        self.thread.thread().name()
    }

    /// Queues pixels for extraction and returns the id the outcome will carry.
    pub fn submit(&mut self, pixels: Vec<u8>, width: u32, height: u32, downsample_factor: usize) -> Result<u64> {
        self.send(pixels, width, height, downsample_factor, None)
    }

    /// Like `submit`, but results are cached under `cache_key` so a later job
    /// with the same key and stride skips extraction.
    pub fn submit_keyed(
        &mut self,
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        downsample_factor: usize,
        cache_key: u64,
    ) -> Result<u64> {
        self.send(pixels, width, height, downsample_factor, Some(cache_key))
    }

    pub fn submit_image(&mut self, image: RgbaImage, downsample_factor: usize) -> Result<u64> {
        let (width, height) = image.dimensions();
        self.send(image.into_raw(), width, height, downsample_factor, None)
    }

    pub fn submit_image_keyed(&mut self, image: RgbaImage, downsample_factor: usize, cache_key: u64) -> Result<u64> {
        let (width, height) = image.dimensions();
        self.send(image.into_raw(), width, height, downsample_factor, Some(cache_key))
    }

    fn send(
        &mut self,
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        downsample_factor: usize,
        cache_key: Option<u64>,
    ) -> Result<u64> {
        let id = self.next_id;
        self.jobs
            .send(AccentJob {
                id,
                width,
                height,
                pixels,
                downsample_factor,
                cache_key,
            })
            .map_err(|_| AccentError::WorkerGone)?;
        self.next_id += 1;
        Ok(id)
    }

    /// Finished outcomes, without blocking.
    pub fn try_drain(&self) -> Vec<AccentOutcome> {
        let mut out = Vec::new();
        loop {
            match self.outcomes.try_recv() {
                Ok(msg) => out.push(msg),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    pub fn recv(&self) -> Option<AccentOutcome> {
        self.outcomes.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<AccentOutcome> {
        match self.outcomes.recv_timeout(timeout) {
            Ok(msg) => Some(msg),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
