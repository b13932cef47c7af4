use crate::cli::CleanArgs;
use crate::config_args;
use crate::exit_codes;
use crate::output;
use psrclean_rs::CleanStatus;
use std::path::{Path, PathBuf};

pub fn execute(args: CleanArgs) -> i32 {
    // Validate input file
    if let Err(msg) = config_args::validate_file(&args.file) {
        eprintln!("Error: {}", msg);
        return exit_codes::INPUT_ERROR;
    }

    let runner = match config_args::resolve_runner(&args.denoise, None, args.force) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    // Explicit --output wins over the default naming
    let input = Path::new(&args.file);
    let output_path = match args.output {
        Some(ref path) => PathBuf::from(path),
        None => runner.output_path_for(input),
    };

    if !args.quiet {
        let config = runner.config();
        eprintln!("Cleaning {}...", args.file);
        eprintln!(
            "  Windows: {} samples/s, {} samples/min",
            config.second_window(),
            config.minute_window()
        );
        eprintln!(
            "  Clip: sigma={}, center={:?}, spread={:?}",
            config.sigma, config.center, config.spread
        );
    }

    // Clean and print the JSON report
    match runner.run_file_to(input, &output_path) {
        Ok(report) => {
            if let Err(e) = output::print_json(&report, args.compact) {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
            if !args.quiet {
                match report.status {
                    CleanStatus::Cleaned => {
                        eprintln!("Cleaned samples written to {}", output_path.display())
                    }
                    CleanStatus::Skipped => eprintln!(
                        "Skipped: {} already exists (use --force to overwrite)",
                        output_path.display()
                    ),
                }
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            eprintln!("Cleaning failed: {}", e);
            config_args::exit_code_for(&e)
        }
    }
}
