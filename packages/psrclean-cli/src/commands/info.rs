use crate::cli::InfoArgs;
use crate::config_args;
use crate::exit_codes;
use crate::output;
use psrclean_rs::io::{CLEANED_SUFFIX, SAMPLE_SIZE};
use psrclean_rs::DenoiseConfig;
use serde::Serialize;

#[derive(Serialize)]
struct InfoOutput {
    cli_version: String,
    platform: String,
    arch: String,
    sample_size_bytes: usize,
    cleaned_suffix: &'static str,
    second_window: usize,
    minute_window: usize,
    config: DenoiseConfig,
}

pub fn execute(args: InfoArgs) -> i32 {
    let config = match config_args::resolve_config(&args.denoise) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let info = InfoOutput {
        cli_version: env!("CARGO_PKG_VERSION").to_string(),
        platform: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        sample_size_bytes: SAMPLE_SIZE,
        cleaned_suffix: CLEANED_SUFFIX,
        second_window: config.second_window(),
        minute_window: config.minute_window(),
        config,
    };

    if args.json {
        if let Err(e) = output::print_json(&info, false) {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    } else {
        println!("psrclean CLI v{}", info.cli_version);
        println!("Platform: {} ({})", info.platform, info.arch);
        println!();
        println!(
            "Samples: {}-byte native-endian floats, period {}s",
            info.sample_size_bytes, info.config.sampling_period_s
        );
        println!(
            "Windows: {} samples (1 s median), {} samples (1 min clip)",
            info.second_window, info.minute_window
        );
        println!(
            "Clipping: sigma={}, center={:?}, spread={:?}",
            info.config.sigma, info.config.center, info.config.spread
        );
        println!("Output name: <stem>{}.<ext>", info.cleaned_suffix);
    }

    exit_codes::SUCCESS
}
