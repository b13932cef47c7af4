use crate::error::{CleanError, Result};
use crate::stats::{CenterStatistic, SpreadStatistic};
use serde::{Deserialize, Serialize};

/// Sampling period of the raw recordings in seconds (2 ms).
pub const DEFAULT_SAMPLING_PERIOD_S: f64 = 2e-3;

/// Default sigma-clipping threshold.
pub const DEFAULT_SIGMA: f64 = 5.0;

/// Number of one-second windows in a one-minute window.
pub const SECONDS_PER_MINUTE: usize = 60;

/// Denoising parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenoiseConfig {
    /// Time between consecutive samples in seconds
    #[serde(default = "default_sampling_period")]
    pub sampling_period_s: f64,

    /// Clip threshold in units of the window spread
    #[serde(default = "default_sigma")]
    pub sigma: f64,

    /// Center statistic for sigma clipping
    #[serde(default)]
    pub center: CenterStatistic,

    /// Spread statistic for sigma clipping
    #[serde(default)]
    pub spread: SpreadStatistic,
}

fn default_sampling_period() -> f64 {
    DEFAULT_SAMPLING_PERIOD_S
}
fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            sampling_period_s: DEFAULT_SAMPLING_PERIOD_S,
            sigma: DEFAULT_SIGMA,
            center: CenterStatistic::default(),
            spread: SpreadStatistic::default(),
        }
    }
}

impl DenoiseConfig {
    /// Samples per second, i.e. the local median window length.
    pub fn second_window(&self) -> usize {
        (1.0 / self.sampling_period_s).round() as usize
    }

    /// Samples per minute, i.e. the sigma-clipping window length.
    ///
    /// Saturates at `usize::MAX`; [`validate`](Self::validate) rejects
    /// periods that get there.
    pub fn minute_window(&self) -> usize {
        self.second_window().saturating_mul(SECONDS_PER_MINUTE)
    }

    /// Clipping parameters derived from this configuration.
    pub fn clip_params(&self) -> ClipParams {
        ClipParams {
            sigma: self.sigma,
            center: self.center,
            spread: self.spread,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sampling_period_s.is_finite() || self.sampling_period_s <= 0.0 {
            return Err(CleanError::InvalidParameter(format!(
                "Sampling period must be a positive number of seconds, got {}",
                self.sampling_period_s
            )));
        }
        if self.second_window() == 0 {
            return Err(CleanError::InvalidParameter(format!(
                "Sampling period {}s leaves less than one sample per second",
                self.sampling_period_s
            )));
        }
        if self
            .second_window()
            .checked_mul(SECONDS_PER_MINUTE)
            .is_none()
        {
            return Err(CleanError::InvalidParameter(format!(
                "Sampling period {}s is too small: a one-minute window would not fit in memory",
                self.sampling_period_s
            )));
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(CleanError::InvalidParameter(format!(
                "Sigma must be a positive number, got {}",
                self.sigma
            )));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CleanError::ConfigError(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Sigma-clipping parameters for a single pass over a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipParams {
    pub sigma: f64,
    pub center: CenterStatistic,
    pub spread: SpreadStatistic,
}

impl Default for ClipParams {
    fn default() -> Self {
        DenoiseConfig::default().clip_params()
    }
}

/// Counters gathered while sigma clipping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipStats {
    pub windows: usize,
    pub clipped_samples: usize,
    /// Windows with fewer than two finite samples, where no spread exists
    pub degenerate_windows: usize,
}

/// What the pipeline did to one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanSummary {
    pub raw_len: usize,
    pub trimmed_len: usize,
    pub dropped_samples: usize,
    pub second_windows: usize,
    pub minute_windows: usize,
    pub global_median: f64,
    pub clipped_samples: usize,
    pub degenerate_windows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanStatus {
    Cleaned,
    /// Output already existed; the pipeline was not run
    Skipped,
}

/// Per-file result of a cleaning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanReport {
    pub id: String,
    pub input: String,
    pub output: String,
    pub status: CleanStatus,
    pub summary: Option<CleanSummary>,
    pub config: DenoiseConfig,
    pub created_at: String,
}

impl CleanReport {
    pub fn new(
        input: String,
        output: String,
        status: CleanStatus,
        config: DenoiseConfig,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            input,
            output,
            status,
            summary: None,
            config,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_summary(mut self, summary: CleanSummary) -> Self {
        self.summary = Some(summary);
        self
    }
}
