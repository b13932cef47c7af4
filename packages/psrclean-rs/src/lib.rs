pub mod denoise;
pub mod error;
pub mod io;
pub mod profiling;
pub mod runner;
pub mod stats;
pub mod types;

pub use denoise::{clean, Denoiser};
pub use error::{CleanError, Result};
pub use runner::{CleanRunner, FileOutcome};
pub use stats::{CenterStatistic, SpreadStatistic};
pub use types::*;
