use clap::{Args, Parser, Subcommand, ValueEnum};
use psrclean_rs::{CenterStatistic, SpreadStatistic};

#[derive(Parser)]
#[command(
    name = "psrclean",
    version,
    about = "Clean raw pulsar time series by median subtraction and sigma clipping",
    long_about = "Remove baseline drift and outlier spikes from raw pulsar recordings.\n\
                  Input files hold native-endian 32-bit float samples with no header.\n\
                  Each file is trimmed to whole minutes, centred on its median, has every\n\
                  one-second median removed and is sigma clipped per minute."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a single raw sample file
    Clean(CleanArgs),
    /// Clean many raw sample files in parallel
    Batch(BatchArgs),
    /// Check that a file is a well-formed raw sample file
    Validate(ValidateArgs),
    /// Show version and effective denoising parameters
    Info(InfoArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CenterArg {
    Median,
    Mean,
}

impl From<CenterArg> for CenterStatistic {
    fn from(arg: CenterArg) -> Self {
        match arg {
            CenterArg::Median => CenterStatistic::Median,
            CenterArg::Mean => CenterStatistic::Mean,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpreadArg {
    /// 1.4826 x median absolute deviation
    MadStd,
    /// Standard deviation
    Std,
}

impl From<SpreadArg> for SpreadStatistic {
    fn from(arg: SpreadArg) -> Self {
        match arg {
            SpreadArg::MadStd => SpreadStatistic::MadStd,
            SpreadArg::Std => SpreadStatistic::Std,
        }
    }
}

/// Denoising parameters shared by all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct DenoiseArgs {
    /// JSON file with denoising parameters; flags below override it
    #[arg(long, env = "PSRCLEAN_CONFIG")]
    pub config: Option<String>,

    /// Sampling period in seconds [default: 0.002]
    #[arg(long)]
    pub sampling_period: Option<f64>,

    /// Clip threshold in units of the window spread [default: 5]
    #[arg(long)]
    pub sigma: Option<f64>,

    /// Center statistic for clipping [default: median]
    #[arg(long, value_enum)]
    pub center: Option<CenterArg>,

    /// Spread statistic for clipping [default: mad-std]
    #[arg(long, value_enum)]
    pub spread: Option<SpreadArg>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Raw sample file
    #[arg(long)]
    pub file: String,

    /// Output file (default: <stem>-cleaned.<ext> next to the input)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Overwrite an existing cleaned file
    #[arg(long, default_value_t = false)]
    pub force: bool,

    #[command(flatten)]
    pub denoise: DenoiseArgs,

    /// Compact JSON report (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files (e.g. "raw/*-PSRB0329-2ms-sampling-dd.dat")
    #[arg(long, conflicts_with = "files")]
    pub glob: Option<String>,

    /// Explicit list of input files
    #[arg(long, num_args = 1..)]
    pub files: Option<Vec<String>>,

    /// Directory for cleaned files (default: next to each input)
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Number of worker threads (default: one per core)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Keep going after a file fails
    #[arg(long, default_value_t = false)]
    pub continue_on_error: bool,

    /// List the files that would be cleaned and exit
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Overwrite existing cleaned files
    #[arg(long, default_value_t = false)]
    pub force: bool,

    #[command(flatten)]
    pub denoise: DenoiseArgs,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Raw sample file
    #[arg(long)]
    pub file: String,

    #[command(flatten)]
    pub denoise: DenoiseArgs,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub denoise: DenoiseArgs,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
