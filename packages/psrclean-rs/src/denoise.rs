//! Denoising pipeline
//!
//! Four stages applied in order to a raw series:
//! 1. Trim to a whole number of one-minute windows
//! 2. Subtract the median of the whole series
//! 3. Subtract the median of every one-second window
//! 4. Sigma clip every one-minute window, replacing outliers with 0.0
//!
//! Every stage is a pure function of its input and returns a new series.
//! Windows are back-to-back and non-overlapping, starting at offset 0.

use crate::error::Result;
use crate::profile_scope;
use crate::stats;
use crate::types::{ClipParams, ClipStats, CleanSummary, DenoiseConfig};
use std::ops::Range;

/// Value written in place of clipped samples.
pub const FILL_VALUE: f32 = 0.0;

/// Back-to-back windows of `window` samples covering `0..len`.
///
/// When `len` is not a multiple of `window` the last range is shorter.
/// A zero window length yields no ranges.
pub fn window_ranges(len: usize, window: usize) -> impl Iterator<Item = Range<usize>> {
    let count = if window == 0 { 0 } else { len.div_ceil(window) };
    (0..count).map(move |i| {
        let start = i * window;
        start..(start + window).min(len)
    })
}

/// Keep the longest prefix made of whole `minute_window`-sample windows.
pub fn trim(samples: &[f32], minute_window: usize) -> Vec<f32> {
    if minute_window == 0 {
        return Vec::new();
    }
    let whole = samples.len() / minute_window * minute_window;
    if whole < samples.len() {
        log::debug!(
            "Trim: dropping {} trailing samples ({} -> {})",
            samples.len() - whole,
            samples.len(),
            whole
        );
    }
    samples[..whole].to_vec()
}

/// Subtract the median of the entire series from every sample.
///
/// Returns the centred series and the median that was removed. A series
/// without finite samples is returned unchanged with a median of 0.0.
pub fn global_center(samples: &[f32]) -> (Vec<f32>, f64) {
    let median = stats::median(samples).unwrap_or(0.0);
    let centred = samples
        .iter()
        .map(|&x| (x as f64 - median) as f32)
        .collect();
    (centred, median)
}

/// Subtract from each `second_window`-sample window its own median.
///
/// A zero window length leaves the series unchanged.
pub fn local_median_subtract(samples: &[f32], second_window: usize) -> Vec<f32> {
    if second_window == 0 {
        return samples.to_vec();
    }

    let mut out = Vec::with_capacity(samples.len());
    for range in window_ranges(samples.len(), second_window) {
        let window = &samples[range];
        let median = stats::median(window).unwrap_or(0.0);
        out.extend(window.iter().map(|&x| (x as f64 - median) as f32));
    }
    out
}

/// Outlier classification of one window
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierMask {
    /// `true` for samples to be replaced
    pub mask: Vec<bool>,
    pub center: Option<f64>,
    /// `None` when the window has fewer than two finite samples
    pub spread: Option<f64>,
}

impl OutlierMask {
    pub fn is_degenerate(&self) -> bool {
        self.spread.is_none()
    }

    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

/// Classify the samples of one window in a single pass.
///
/// A sample is an outlier when it is not finite or when its distance from
/// the window center is strictly greater than `sigma * spread`. Without a
/// defined spread only non-finite samples are flagged.
pub fn outlier_mask(window: &[f32], params: &ClipParams) -> OutlierMask {
    let center = stats::center(window, params.center);
    let spread = center.and_then(|c| stats::spread(window, c, params.spread));

    let mask = match (center, spread) {
        (Some(c), Some(s)) => {
            let limit = params.sigma * s;
            window
                .iter()
                .map(|&x| !x.is_finite() || (x as f64 - c).abs() > limit)
                .collect()
        }
        _ => window.iter().map(|x| !x.is_finite()).collect(),
    };

    OutlierMask {
        mask,
        center,
        spread,
    }
}

/// Replace masked samples with `fill`, passing the rest through.
pub fn apply_mask<'a>(
    window: &'a [f32],
    mask: &'a [bool],
    fill: f32,
) -> impl Iterator<Item = f32> + 'a {
    window
        .iter()
        .zip(mask)
        .map(move |(&x, &masked)| if masked { fill } else { x })
}

/// Sigma clip each `minute_window`-sample window once, replacing outliers
/// with [`FILL_VALUE`].
pub fn local_sigma_clip(
    samples: &[f32],
    minute_window: usize,
    params: &ClipParams,
) -> (Vec<f32>, ClipStats) {
    let mut clip_stats = ClipStats::default();
    if minute_window == 0 {
        return (samples.to_vec(), clip_stats);
    }

    let mut out = Vec::with_capacity(samples.len());
    for range in window_ranges(samples.len(), minute_window) {
        let start = range.start;
        let window = &samples[range];
        let outliers = outlier_mask(window, params);

        clip_stats.windows += 1;
        if outliers.is_degenerate() {
            clip_stats.degenerate_windows += 1;
            log::warn!(
                "Window at sample {} has fewer than 2 finite samples; spread undefined, nothing clipped",
                start
            );
        }
        clip_stats.clipped_samples += outliers.count();

        out.extend(apply_mask(window, &outliers.mask, FILL_VALUE));
    }
    (out, clip_stats)
}

/// Runs the full pipeline with one configuration
#[derive(Debug, Clone, Default)]
pub struct Denoiser {
    config: DenoiseConfig,
}

impl Denoiser {
    pub fn new(config: DenoiseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DenoiseConfig {
        &self.config
    }

    /// Clean a raw series. Empty or sub-minute input gives empty output.
    pub fn clean(&self, raw: &[f32]) -> Vec<f32> {
        self.clean_with_summary(raw).0
    }

    pub fn clean_with_summary(&self, raw: &[f32]) -> (Vec<f32>, CleanSummary) {
        profile_scope!("denoise::clean");

        let second = self.config.second_window();
        let minute = self.config.minute_window();

        let trimmed = trim(raw, minute);
        let (centred, global_median) = {
            profile_scope!("denoise::global_center");
            global_center(&trimmed)
        };
        let detrended = {
            profile_scope!("denoise::local_median_subtract");
            local_median_subtract(&centred, second)
        };
        let (cleaned, clip_stats) = {
            profile_scope!("denoise::local_sigma_clip");
            local_sigma_clip(&detrended, minute, &self.config.clip_params())
        };

        let summary = CleanSummary {
            raw_len: raw.len(),
            trimmed_len: trimmed.len(),
            dropped_samples: raw.len() - trimmed.len(),
            second_windows: trimmed.len() / second,
            minute_windows: clip_stats.windows,
            global_median,
            clipped_samples: clip_stats.clipped_samples,
            degenerate_windows: clip_stats.degenerate_windows,
        };

        log::debug!(
            "Cleaned {} samples: {} kept, median {:.4}, {} clipped in {} windows",
            summary.raw_len,
            summary.trimmed_len,
            summary.global_median,
            summary.clipped_samples,
            summary.minute_windows
        );

        (cleaned, summary)
    }
}

/// Clean a raw series with the default 2 ms / 5 sigma / median setup.
pub fn clean(raw: &[f32]) -> Vec<f32> {
    Denoiser::default().clean(raw)
}
