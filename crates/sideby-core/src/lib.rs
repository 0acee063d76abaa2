pub mod collect;
pub mod compositor;
pub mod config;
pub mod dedup;
pub mod error;
pub mod imaging;
pub mod media;
pub mod metadata;
pub mod naming;
pub mod pairer;
pub mod sync;

#[cfg(test)]
mod test_support;

use std::cell::Cell;
use std::fs;
use std::time::{Duration, Instant};

use anyhow::Context;
use rand::Rng;
use serde::Serialize;
use tracing::{error, info};

pub use config::{FrameConfig, ProcessOptions};
pub use dedup::DuplicateDetector;
pub use imaging::{ImageBackend, Imaging};
pub use media::ImageRecord;
pub use sync::ProcessedFileSet;

use compositor::Compositor;
use metadata::MetadataCollector;

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    /// JPEG paths gathered from the inputs
    pub candidates: u64,
    /// Portrait images accepted for pairing
    pub images_found: u64,
    pub rejected: u64,
    pub generated: u64,
    /// Pairs whose output already existed and overwrite was off
    pub skipped_existing: u64,
    pub failed: u64,
    pub duplicates_skipped: u64,
    pub unpaired: u64,
    /// Composites deleted before the run
    pub cleaned: u64,
    /// Stale composites deleted after the run
    pub mirrored: u64,
    /// Composites that clean or mirror could not delete
    pub delete_failed: u64,
}

impl ProcessResult {
    pub fn skipped(&self) -> u64 {
        self.skipped_existing + self.failed + self.duplicates_skipped + self.unpaired
    }
}

/// Type alias for progress callback. The callback may borrow from the caller.
pub type ProgressCallback<'a> = dyn Fn(&str, u64, u64, &str) + Send + Sync + 'a;

/// Progress reporter that emits at most every 200ms, plus the final step.
pub struct ThrottledProgress<'a> {
    inner: &'a ProgressCallback<'a>,
    last_emit: Cell<Instant>,
}

impl<'a> ThrottledProgress<'a> {
    pub fn new(inner: &'a ProgressCallback<'a>) -> Self {
        let now = Instant::now();
        Self {
            inner,
            last_emit: Cell::new(now.checked_sub(Duration::from_secs(1)).unwrap_or(now)),
        }
    }

    pub fn report(&self, stage: &str, current: u64, total: u64, message: &str) {
        let is_done = current + 1 >= total;
        if !is_done {
            if self.last_emit.get().elapsed().as_millis() < 200 {
                return;
            }
            self.last_emit.set(Instant::now());
        }
        (self.inner)(stage, current, total, message);
    }
}

/// State owned by a single run and threaded through the pairing loop.
#[derive(Debug, Default)]
pub struct RunContext {
    pub detector: DuplicateDetector,
    pub processed: ProcessedFileSet,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Run the full pipeline with the `image` backend and a thread-local RNG.
pub fn process(options: &ProcessOptions, progress_callback: &ProgressCallback<'_>) -> anyhow::Result<ProcessResult> {
    process_with(options, &ImageBackend, &mut rand::rng(), progress_callback)
}

/// Run the full pipeline: clean, collect, inspect, order, pair and compose, mirror.
pub fn process_with<B, R>(
    options: &ProcessOptions,
    backend: &B,
    rng: &mut R,
    progress_callback: &ProgressCallback<'_>,
) -> anyhow::Result<ProcessResult>
where
    B: Imaging,
    R: Rng + ?Sized,
{
    let frame = options.frame()?;
    let tp = ThrottledProgress::new(progress_callback);
    let output_dir = &options.output;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create output directory {}", output_dir.display()))?;

    let mut result = ProcessResult::default();

    // Stage 1: Clean
    if options.delete_existing {
        let report = sync::clean(output_dir);
        result.cleaned = report.deleted;
        result.delete_failed += report.failed;
    }

    // Stage 2: Collect and inspect
    let candidates = collect::collect_candidates(&options.inputs, options.file_list.as_deref(), options.recursive)?;
    result.candidates = candidates.len() as u64;

    let (mut records, rejected) = MetadataCollector::new(backend).collect(&candidates, &tp);
    result.images_found = records.len() as u64;
    result.rejected = rejected;

    // Stage 3: Order
    pairer::order(&mut records, options.randomise_sorting, rng);

    // Stage 4: Pair and compose
    let compositor = Compositor::new(backend, frame, !options.randomise_sorting);
    let mut ctx = RunContext::new();
    let total_pairs = (records.len() / 2).max(1) as u64;
    let mut done = 0u64;

    let summary = pairer::walk_pairs(&records, &mut ctx.detector, |a, b| {
        let name = match naming::generate_filename(&a.file_name, &b.file_name) {
            Ok(name) => name,
            Err(e) => {
                error!("Cannot pair {} with {}: {}", a.full_path.display(), b.full_path.display(), e);
                result.failed += 1;
                return;
            }
        };
        let output = output_dir.join(&name);

        if output.exists() && !options.overwrite_existing {
            info!("{} already exists, skipping {} + {}", name, a.file_name, b.file_name);
            result.skipped_existing += 1;
            ctx.processed.insert(output);
        } else {
            match compositor.composite(a, b, &output) {
                Ok(()) => {
                    info!("Created {} from {} + {}", name, a.file_name, b.file_name);
                    result.generated += 1;
                    ctx.processed.insert(output);
                }
                Err(e) => {
                    error!("Skipping {} + {}: {}", a.file_name, b.file_name, e);
                    result.failed += 1;
                }
            }
        }

        tp.report("compose", done, total_pairs, &name);
        done += 1;
    });
    result.duplicates_skipped = summary.duplicates_skipped;
    result.unpaired = summary.unpaired;

    // Stage 5: Mirror
    if options.mirror_mode {
        let report = sync::mirror(output_dir, &ctx.processed);
        result.mirrored = report.deleted;
        result.delete_failed += report.failed;
    }

    info!(
        "{} composite(s) generated, {} skipped",
        result.generated,
        result.skipped()
    );
    Ok(result)
}
