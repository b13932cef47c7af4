use crate::cli::ValidateArgs;
use crate::config_args;
use crate::exit_codes;
use crate::output;
use psrclean_rs::io::{inspect_sample_file, SampleFileInfo};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ValidateOutput {
    file: String,
    exists: bool,
    readable: bool,
    well_formed: bool,
    #[serde(flatten)]
    info: Option<SampleFileInfo>,
    error: Option<String>,
}

pub fn execute(args: ValidateArgs) -> i32 {
    let config = match config_args::resolve_config(&args.denoise) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let path = Path::new(&args.file);
    let exists = path.exists();
    let readable = path.is_file() && std::fs::File::open(path).is_ok();

    let (info, error) = if !exists {
        (None, Some(format!("File not found: {}", args.file)))
    } else if !readable {
        (None, Some(format!("File is not readable: {}", args.file)))
    } else {
        match inspect_sample_file(path, &config) {
            Ok(info) => (Some(info), None),
            Err(e) => (None, Some(e.to_string())),
        }
    };

    let result = ValidateOutput {
        file: args.file.clone(),
        exists,
        readable,
        well_formed: info.is_some(),
        info,
        error,
    };

    if args.json {
        if let Err(e) = output::print_json(&result, false) {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    } else if let Some(ref err) = result.error {
        eprintln!("Error: {}", err);
    } else if let Some(ref info) = result.info {
        println!(
            "File '{}' is valid ({} samples, {:.1}s, {} whole minute(s), {} trailing samples dropped by trim)",
            args.file, info.samples, info.duration_s, info.whole_minutes, info.trailing_samples
        );
        if info.whole_minutes == 0 {
            eprintln!("Warning: shorter than one minute; cleaning will produce an empty output");
        }
    }

    if result.error.is_some() {
        exit_codes::INPUT_ERROR
    } else {
        exit_codes::SUCCESS
    }
}
