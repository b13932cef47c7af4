use crate::cli::DenoiseArgs;
use crate::exit_codes;
use psrclean_rs::{CleanError, CleanRunner, DenoiseConfig};
use std::path::Path;

/// Build the effective configuration: defaults, then the JSON file, then flags.
pub fn resolve_config(args: &DenoiseArgs) -> Result<DenoiseConfig, String> {
    let mut config = match args.config {
        Some(ref path) => DenoiseConfig::from_json_file(Path::new(path))
            .map_err(|e| format!("Failed to load config '{}': {}", path, e))?,
        None => DenoiseConfig::default(),
    };

    if let Some(period) = args.sampling_period {
        config.sampling_period_s = period;
    }
    if let Some(sigma) = args.sigma {
        config.sigma = sigma;
    }
    if let Some(center) = args.center {
        config.center = center.into();
    }
    if let Some(spread) = args.spread {
        config.spread = spread.into();
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

pub fn resolve_runner(
    args: &DenoiseArgs,
    output_dir: Option<&str>,
    force: bool,
) -> Result<CleanRunner, String> {
    let config = resolve_config(args)?;
    let mut runner = CleanRunner::new(config).map_err(|e| e.to_string())?;
    if let Some(dir) = output_dir {
        runner = runner.with_output_dir(dir);
    }
    Ok(runner.with_force(force))
}

/// Validate a single input path: it must exist and be a regular file.
pub fn validate_file(file_path: &str) -> Result<(), String> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("Input file not found: {}", file_path));
    }
    if !path.is_file() {
        return Err(format!("Input is not a regular file: {}", file_path));
    }
    Ok(())
}

/// Exit code for a library error.
pub fn exit_code_for(error: &CleanError) -> i32 {
    match error {
        CleanError::FileNotFound(_)
        | CleanError::MalformedInput { .. }
        | CleanError::InvalidParameter(_)
        | CleanError::ConfigError(_)
        | CleanError::OutputCollision { .. } => exit_codes::INPUT_ERROR,
        CleanError::WorkerPool(_) | CleanError::IoError(_) => exit_codes::EXECUTION_ERROR,
    }
}
