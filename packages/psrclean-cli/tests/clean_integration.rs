use assert_cmd::Command;
use predicates::prelude::*;
use psrclean_rs::io::{read_samples, write_samples};
use std::path::{Path, PathBuf};

const MINUTE: usize = 30_000;

fn psrclean() -> Command {
    Command::cargo_bin("psrclean").unwrap()
}

/// One minute at a constant baseline with a single spike, plus a short tail.
fn write_spiky_minute(dir: &Path, name: &str) -> PathBuf {
    let mut samples = vec![10.0f32; MINUTE + 17];
    samples[4_321] = 10_000.0;
    let path = dir.join(name);
    write_samples(&path, &samples).unwrap();
    path
}

// =============================================================================
// CLEAN SUBCOMMAND
// =============================================================================

#[test]
fn test_clean_writes_output_and_report() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_spiky_minute(tmp.path(), "obs-PSRB0329-2ms-sampling-dd.dat");

    let output = psrclean()
        .args(["clean", "--quiet", "--compact", "--file", input.to_str().unwrap()])
        .assert()
        .success()
        .code(0);

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["status"], "cleaned");
    assert_eq!(report["summary"]["trimmed_len"], MINUTE);
    assert_eq!(report["summary"]["dropped_samples"], 17);
    assert_eq!(report["summary"]["clipped_samples"], 1);

    let cleaned =
        read_samples(&tmp.path().join("obs-PSRB0329-2ms-sampling-dd-cleaned.dat")).unwrap();
    assert_eq!(cleaned.len(), MINUTE);
    assert!(cleaned.iter().all(|&x| x == 0.0));
}

#[test]
fn test_clean_explicit_output_and_skip() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_spiky_minute(tmp.path(), "obs.dat");
    let out = tmp.path().join("custom.f32");

    psrclean()
        .args(["clean", "--file", input.to_str().unwrap()])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Cleaned samples written to"));
    assert_eq!(std::fs::metadata(&out).unwrap().len(), (MINUTE * 4) as u64);

    psrclean()
        .args(["clean", "--file", input.to_str().unwrap()])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"skipped\""))
        .stderr(predicate::str::contains("--force"));

    psrclean()
        .args(["clean", "--quiet", "--force", "--file", input.to_str().unwrap()])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cleaned\""));
}

#[test]
fn test_clean_short_file_gives_empty_output() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("short.dat");
    write_samples(&input, &[1.0, 2.0, 3.0]).unwrap();

    psrclean()
        .args(["clean", "--quiet", "--file", input.to_str().unwrap()])
        .assert()
        .success();

    let out = tmp.path().join("short-cleaned.dat");
    assert_eq!(std::fs::metadata(out).unwrap().len(), 0);
}

#[test]
fn test_clean_malformed_input() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("bad.dat");
    std::fs::write(&input, [0u8; 5]).unwrap();

    psrclean()
        .args(["clean", "--quiet", "--file", input.to_str().unwrap()])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Malformed"));
    assert!(!tmp.path().join("bad-cleaned.dat").exists());
}

#[test]
fn test_clean_missing_input() {
    psrclean()
        .args(["clean", "--file", "/nonexistent_dir_12345/a.dat"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_clean_with_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tmp.path().join("config.json");
    // 100 ms sampling: 600-sample minutes
    std::fs::write(&config, r#"{"sampling_period_s": 0.1}"#).unwrap();
    let input = tmp.path().join("slow.dat");
    write_samples(&input, &vec![3.0; 1_500]).unwrap();

    let output = psrclean()
        .args(["clean", "--quiet", "--compact", "--file", input.to_str().unwrap()])
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["summary"]["trimmed_len"], 1_200);
    assert_eq!(report["config"]["sampling_period_s"], 0.1);
}

// =============================================================================
// BATCH SUBCOMMAND
// =============================================================================

#[test]
fn test_batch_glob_to_output_dir() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["a.dat", "b.dat", "c.dat"] {
        write_spiky_minute(tmp.path(), name);
    }
    let out_dir = tmp.path().join("cleaned");
    let pattern = format!("{}/*.dat", tmp.path().to_str().unwrap());

    let output = psrclean()
        .args(["batch", "--quiet", "--jobs", "2", "--glob", &pattern])
        .args(["--output-dir", out_dir.to_str().unwrap()])
        .assert()
        .success()
        .code(0);

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let reports: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r["status"] == "cleaned"));

    for name in ["a", "b", "c"] {
        let cleaned = read_samples(&out_dir.join(format!("{}-cleaned.dat", name))).unwrap();
        assert_eq!(cleaned.len(), MINUTE);
    }
}

#[test]
fn test_batch_second_run_skips() {
    let tmp = tempfile::tempdir().unwrap();
    write_spiky_minute(tmp.path(), "a.dat");
    let pattern = format!("{}/*.dat", tmp.path().to_str().unwrap());

    psrclean()
        .args(["batch", "--quiet", "--glob", &pattern])
        .assert()
        .success();

    // The cleaned output matches the glob too but is not picked up as input.
    psrclean()
        .args(["batch", "--glob", &pattern])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"skipped\""))
        .stderr(predicate::str::contains("0 cleaned, 1 skipped"));
}

#[test]
fn test_batch_dry_run() {
    let tmp = tempfile::tempdir().unwrap();
    write_spiky_minute(tmp.path(), "a.dat");
    let pattern = format!("{}/*.dat", tmp.path().to_str().unwrap());

    psrclean()
        .args(["batch", "--dry-run", "--glob", &pattern])
        .assert()
        .success()
        .stdout(predicate::str::contains("a-cleaned.dat"))
        .stderr(predicate::str::contains("Found 1 file(s)"));
    assert!(!tmp.path().join("a-cleaned.dat").exists());
}

#[test]
fn test_batch_partial_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let good = write_spiky_minute(tmp.path(), "good.dat");
    let bad = tmp.path().join("bad.dat");
    std::fs::write(&bad, [0u8; 3]).unwrap();

    psrclean()
        .args(["batch", "--quiet", "--continue-on-error", "--files"])
        .args([bad.to_str().unwrap(), good.to_str().unwrap()])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Malformed"));
    assert!(tmp.path().join("good-cleaned.dat").exists());
}

#[test]
fn test_batch_same_name_into_output_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let d1 = tmp.path().join("d1");
    let d2 = tmp.path().join("d2");
    std::fs::create_dir_all(&d1).unwrap();
    std::fs::create_dir_all(&d2).unwrap();
    let first = write_spiky_minute(&d1, "obs.dat");
    let second = write_spiky_minute(&d2, "obs.dat");
    let out_dir = tmp.path().join("out");

    psrclean()
        .args(["batch", "--quiet", "--continue-on-error", "--files"])
        .args([first.to_str().unwrap(), second.to_str().unwrap()])
        .args(["--output-dir", out_dir.to_str().unwrap()])
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("\"cleaned\""))
        .stdout(predicate::str::contains("\"skipped\"").not())
        .stderr(predicate::str::contains("already claimed"));
    assert!(out_dir.join("obs-cleaned.dat").exists());
}

#[test]
fn test_batch_dry_run_reports_collisions() {
    let tmp = tempfile::tempdir().unwrap();
    let input = write_spiky_minute(tmp.path(), "a.dat");

    psrclean()
        .args(["batch", "--dry-run", "--files"])
        .args([input.to_str().unwrap(), input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("collides with"));
}

#[test]
fn test_batch_no_matches() {
    psrclean()
        .args(["batch", "--glob", "/nonexistent_dir_12345/*.dat"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No matching files"));
}
