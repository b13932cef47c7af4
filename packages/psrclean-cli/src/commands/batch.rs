use crate::cli::BatchArgs;
use crate::config_args;
use crate::exit_codes;
use crate::output;
use psrclean_rs::{CleanStatus, FileOutcome};
use std::path::PathBuf;
use std::time::Instant;

pub fn execute(args: BatchArgs) -> i32 {
    // Resolve file list
    let files = match resolve_files(&args) {
        Ok(f) => f,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if files.is_empty() {
        eprintln!("Error: No matching files found");
        return exit_codes::INPUT_ERROR;
    }

    let runner =
        match config_args::resolve_runner(&args.denoise, args.output_dir.as_deref(), args.force) {
            Ok(r) => r,
            Err(msg) => {
                eprintln!("Error: {}", msg);
                return exit_codes::INPUT_ERROR;
            }
        };

    // Dry-run mode: list input -> output pairs without cleaning
    if args.dry_run {
        let collisions = runner.output_collisions(&files);
        for (f, collision) in files.iter().zip(&collisions) {
            match collision {
                Some(first) => println!(
                    "{} -> {} (collides with {})",
                    f.display(),
                    runner.output_path_for(f).display(),
                    first.display()
                ),
                None => println!("{} -> {}", f.display(), runner.output_path_for(f).display()),
            }
        }
        if !args.quiet {
            eprintln!("Found {} file(s)", files.len());
        }
        return exit_codes::SUCCESS;
    }

    // Create output directory if specified
    if let Some(ref dir) = args.output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Error: Failed to create output directory '{}': {}", dir, e);
            return exit_codes::EXECUTION_ERROR;
        }
    }

    let total = files.len();
    if !args.quiet {
        eprintln!("Cleaning {} file(s)...", total);
    }
    let start_time = Instant::now();

    // Run on the global pool unless a job count was given
    let stop_on_error = !args.continue_on_error;
    let outcomes = match args.jobs {
        Some(jobs) => match runner.run_batch_with_jobs(&files, stop_on_error, jobs) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
        },
        None => runner.run_batch(&files, stop_on_error),
    };

    // Tally outcomes
    let mut cleaned = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    let mut not_attempted = 0usize;

    for (file, outcome) in files.iter().zip(&outcomes) {
        match outcome {
            FileOutcome::Done(report) => {
                match report.status {
                    CleanStatus::Cleaned => cleaned += 1,
                    CleanStatus::Skipped => skipped += 1,
                }
                // JSONL to stdout
                if let Err(e) = output::print_json(report, true) {
                    eprintln!("  Error writing report for {}: {}", file.display(), e);
                    failed += 1;
                }
            }
            FileOutcome::Failed(e) => {
                eprintln!("  {}: {}", file.display(), e);
                failed += 1;
            }
            FileOutcome::NotAttempted => not_attempted += 1,
        }
    }

    if !args.quiet {
        eprintln!(
            "Batch complete: {} cleaned, {} skipped, {} failed, {} not attempted of {}, {:.1}s",
            cleaned,
            skipped,
            failed,
            not_attempted,
            total,
            start_time.elapsed().as_secs_f64()
        );
    }

    let succeeded = cleaned + skipped;
    if failed == 0 && not_attempted == 0 {
        exit_codes::SUCCESS
    } else if succeeded > 0 {
        exit_codes::PARTIAL_FAILURE
    } else {
        exit_codes::EXECUTION_ERROR
    }
}

fn resolve_files(args: &BatchArgs) -> Result<Vec<PathBuf>, String> {
    if let Some(ref pattern) = args.glob {
        resolve_glob(pattern)
    } else if let Some(ref files) = args.files {
        Ok(files.iter().map(PathBuf::from).collect())
    } else {
        Err("One of --glob or --files must be specified".to_string())
    }
}

/// Expand a glob into regular files, sorted, leaving out previous outputs.
fn resolve_glob(pattern: &str) -> Result<Vec<PathBuf>, String> {
    let paths =
        glob::glob(pattern).map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() && !is_cleaned_output(&path) {
                    files.push(path);
                }
            }
            Err(e) => {
                log::warn!("glob error: {}", e);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn is_cleaned_output(path: &std::path::Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with(psrclean_rs::io::CLEANED_SUFFIX))
        .unwrap_or(false)
}
