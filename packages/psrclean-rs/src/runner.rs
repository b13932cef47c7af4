use crate::denoise::Denoiser;
use crate::error::{CleanError, Result};
use crate::io::{cleaned_output_path, is_already_cleaned, read_samples, write_samples};
use crate::types::{CleanReport, CleanStatus, DenoiseConfig};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-file cleaning runner
///
/// Reads a raw file, runs the [`Denoiser`] and writes the cleaned samples.
/// Outputs that already exist are skipped without reading the input unless
/// `force` is set.
#[derive(Debug, Clone)]
pub struct CleanRunner {
    denoiser: Denoiser,
    output_dir: Option<PathBuf>,
    force: bool,
}

/// Result of one file in a batch
#[derive(Debug)]
pub enum FileOutcome {
    Done(CleanReport),
    Failed(CleanError),
    /// An earlier failure stopped the batch before this file started
    NotAttempted,
}

impl CleanRunner {
    pub fn new(config: DenoiseConfig) -> Result<Self> {
        Ok(Self {
            denoiser: Denoiser::new(config)?,
            output_dir: None,
            force: false,
        })
    }

    pub fn with_output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn config(&self) -> &DenoiseConfig {
        self.denoiser.config()
    }

    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        cleaned_output_path(input, self.output_dir.as_deref())
    }

    /// Clean `input` into its default output path.
    pub fn run_file(&self, input: &Path) -> Result<CleanReport> {
        let output = self.output_path_for(input);
        self.run_file_to(input, &output)
    }

    /// Clean `input` into `output`.
    pub fn run_file_to(&self, input: &Path, output: &Path) -> Result<CleanReport> {
        if !input.exists() {
            return Err(CleanError::FileNotFound(input.display().to_string()));
        }

        let report = |status| {
            CleanReport::new(
                input.display().to_string(),
                output.display().to_string(),
                status,
                self.config().clone(),
            )
        };

        if !self.force && is_already_cleaned(output) {
            log::info!(
                "Skipping {}: {} already exists",
                input.display(),
                output.display()
            );
            return Ok(report(CleanStatus::Skipped));
        }

        log::info!("Cleaning {} -> {}", input.display(), output.display());

        let raw = read_samples(input)?;
        let (cleaned, summary) = self.denoiser.clean_with_summary(&raw);

        if cleaned.is_empty() {
            log::warn!(
                "{} holds {} samples, less than one {}-sample minute; writing empty output",
                input.display(),
                raw.len(),
                self.config().minute_window()
            );
        }
        if summary.degenerate_windows > 0 {
            log::warn!(
                "{}: {} window(s) had no defined spread and were not clipped",
                input.display(),
                summary.degenerate_windows
            );
        }

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        write_samples(output, &cleaned)?;

        log::info!(
            "Cleaned {}: {} samples kept, {} dropped, {} clipped",
            input.display(),
            summary.trimmed_len,
            summary.dropped_samples,
            summary.clipped_samples
        );

        Ok(report(CleanStatus::Cleaned).with_summary(summary))
    }

    /// For each input, the earlier input that maps to the same output path.
    pub fn output_collisions<'a>(&self, inputs: &'a [PathBuf]) -> Vec<Option<&'a Path>> {
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::with_capacity(inputs.len());
        inputs
            .iter()
            .map(|input| {
                let output = self.output_path_for(input);
                match claimed.get(&output) {
                    Some(&first) => Some(first),
                    None => {
                        claimed.insert(output, input.as_path());
                        None
                    }
                }
            })
            .collect()
    }

    /// Clean many files in parallel on the global rayon pool.
    ///
    /// Outcomes are returned in input order. Inputs whose output path is
    /// already taken by an earlier input fail with `OutputCollision` before
    /// anything runs. With `stop_on_error`, files not yet started when a
    /// failure occurs are reported as `NotAttempted`.
    pub fn run_batch(&self, inputs: &[PathBuf], stop_on_error: bool) -> Vec<FileOutcome> {
        let collisions = self.output_collisions(inputs);
        let has_collision = collisions.iter().any(Option::is_some);
        if has_collision {
            log::error!("Batch maps several inputs to the same output path");
        }
        let abort = AtomicBool::new(stop_on_error && has_collision);

        inputs
            .par_iter()
            .zip(collisions.par_iter())
            .map(|(input, collision)| {
                if let Some(first) = collision {
                    let e = CleanError::OutputCollision {
                        input: input.display().to_string(),
                        output: self.output_path_for(input).display().to_string(),
                        claimed_by: first.display().to_string(),
                    };
                    log::error!("Failed to clean {}: {}", input.display(), e);
                    return FileOutcome::Failed(e);
                }
                if abort.load(Ordering::Relaxed) {
                    return FileOutcome::NotAttempted;
                }
                match self.run_file(input) {
                    Ok(report) => FileOutcome::Done(report),
                    Err(e) => {
                        log::error!("Failed to clean {}: {}", input.display(), e);
                        if stop_on_error {
                            abort.store(true, Ordering::Relaxed);
                        }
                        FileOutcome::Failed(e)
                    }
                }
            })
            .collect()
    }

    /// Like [`run_batch`](Self::run_batch) on a dedicated pool of `jobs` threads.
    pub fn run_batch_with_jobs(
        &self,
        inputs: &[PathBuf],
        stop_on_error: bool,
        jobs: usize,
    ) -> Result<Vec<FileOutcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("psrclean-worker-{}", i))
            .build()
            .map_err(|e| CleanError::WorkerPool(e.to_string()))?;

        Ok(pool.install(|| self.run_batch(inputs, stop_on_error)))
    }
}
