use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Write a string to stdout or a file, newline terminated.
pub fn write_output(text: &str, output_path: Option<&Path>) -> Result<(), String> {
    match output_path {
        Some(path) => std::fs::write(path, format!("{}\n", text))
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e)),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", text).map_err(|e| format!("Failed to write to stdout: {}", e))
        }
    }
}

/// Serialize a value to JSON (pretty or compact).
pub fn to_json<T: Serialize>(value: &T, compact: bool) -> Result<String, String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.map_err(|e| format!("JSON serialization failed: {}", e))
}

/// Serialize and print a value on stdout.
pub fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<(), String> {
    write_output(&to_json(value, compact)?, None)
}
