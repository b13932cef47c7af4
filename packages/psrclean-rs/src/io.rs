//! Raw sample files: native-endian `f32` values with no header.

use crate::error::{CleanError, Result};
use crate::types::DenoiseConfig;
use memmap2::Mmap;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Size in bytes of one stored sample.
pub const SAMPLE_SIZE: usize = std::mem::size_of::<f32>();

/// Suffix appended to the file stem of cleaned outputs.
pub const CLEANED_SUFFIX: &str = "-cleaned";

/// Open a file and map it into memory (read-only)
pub fn mmap_file(path: &Path) -> Result<Mmap> {
    let file = File::open(path).map_err(CleanError::IoError)?;
    let mmap = unsafe { Mmap::map(&file).map_err(CleanError::IoError)? };
    Ok(mmap)
}

/// Decode a byte buffer into samples.
///
/// Fails with `MalformedInput` when the length is not a whole number of
/// samples; trailing bytes are never dropped silently.
pub fn decode_samples(bytes: &[u8], source: &str) -> Result<Vec<f32>> {
    if bytes.len() % SAMPLE_SIZE != 0 {
        return Err(CleanError::MalformedInput {
            path: source.to_string(),
            byte_len: bytes.len() as u64,
            element_size: SAMPLE_SIZE,
        });
    }

    Ok(bytes
        .chunks_exact(SAMPLE_SIZE)
        .map(|chunk| {
            let mut raw = [0u8; SAMPLE_SIZE];
            raw.copy_from_slice(chunk);
            f32::from_ne_bytes(raw)
        })
        .collect())
}

pub fn encode_samples(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
}

/// Read all samples of a raw file.
pub fn read_samples(path: &Path) -> Result<Vec<f32>> {
    if !path.exists() {
        return Err(CleanError::FileNotFound(path.display().to_string()));
    }

    let byte_len = std::fs::metadata(path)?.len();
    if byte_len == 0 {
        return Ok(Vec::new());
    }

    let mmap = mmap_file(path)?;
    let samples = decode_samples(&mmap, &path.display().to_string())?;
    log::debug!("Read {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Write samples in the same layout they are read in.
///
/// Data goes to a temporary sibling first and is renamed into place, so an
/// interrupted write never leaves a partial file under the final name.
pub fn write_samples(path: &Path, samples: &[f32]) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".partial");
    let tmp_path = PathBuf::from(tmp_name);

    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&encode_samples(samples))?;
        writer.flush()?;
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(CleanError::IoError(e));
    }

    log::debug!("Wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}

/// Where the cleaned version of `input` is written.
///
/// `<stem>-cleaned.<ext>` in `output_dir`, or next to the input when no
/// directory is given.
pub fn cleaned_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, CLEANED_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, CLEANED_SUFFIX),
    };

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// A cleaned output counts as done once it exists.
pub fn is_already_cleaned(output: &Path) -> bool {
    output.is_file()
}

/// Layout facts about a raw sample file, without reading the samples
#[derive(Debug, Clone, Serialize)]
pub struct SampleFileInfo {
    pub byte_len: u64,
    pub samples: u64,
    pub duration_s: f64,
    pub whole_minutes: u64,
    /// Samples Trim will drop
    pub trailing_samples: u64,
}

pub fn inspect_sample_file(path: &Path, config: &DenoiseConfig) -> Result<SampleFileInfo> {
    if !path.exists() {
        return Err(CleanError::FileNotFound(path.display().to_string()));
    }

    let byte_len = std::fs::metadata(path)?.len();
    if byte_len % SAMPLE_SIZE as u64 != 0 {
        return Err(CleanError::MalformedInput {
            path: path.display().to_string(),
            byte_len,
            element_size: SAMPLE_SIZE,
        });
    }

    let samples = byte_len / SAMPLE_SIZE as u64;
    let minute = config.minute_window().max(1) as u64;
    Ok(SampleFileInfo {
        byte_len,
        samples,
        duration_s: samples as f64 * config.sampling_period_s,
        whole_minutes: samples / minute,
        trailing_samples: samples % minute,
    })
}
