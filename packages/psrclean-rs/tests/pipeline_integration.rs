use psrclean_rs::denoise::{global_center, local_median_subtract, local_sigma_clip, trim};
use psrclean_rs::io::{read_samples, write_samples};
use psrclean_rs::{
    clean, CenterStatistic, CleanRunner, CleanStatus, DenoiseConfig, Denoiser, SpreadStatistic,
};

const SECOND: usize = 500;
const MINUTE: usize = 30_000;

/// Slow sinusoidal drift plus a short periodic pulse, like a pulsar on a
/// wandering baseline.
fn synthetic_observation(minutes: usize, extra: usize) -> Vec<f32> {
    (0..minutes * MINUTE + extra)
        .map(|i| {
            let t = i as f64 * 2e-3;
            let drift = 40.0 + 3.0 * (t / 20.0).sin();
            let pulse = if i % 357 < 3 { 1.0 } else { 0.0 };
            let jitter = ((i * 7919) % 101) as f64 / 100.0 - 0.5;
            (drift + pulse + jitter) as f32
        })
        .collect()
}

#[test]
fn test_clean_empty_is_empty() {
    assert!(clean(&[]).is_empty());
}

#[test]
fn test_stage_lengths() {
    for extra in [0, 1, MINUTE - 1] {
        let raw = synthetic_observation(2, extra);
        let trimmed = trim(&raw, MINUTE);
        assert_eq!(trimmed.len(), raw.len() / MINUTE * MINUTE);

        let (centred, _) = global_center(&trimmed);
        let detrended = local_median_subtract(&centred, SECOND);
        assert_eq!(detrended.len(), trimmed.len());

        let (cleaned, stats) = local_sigma_clip(&detrended, MINUTE, &Default::default());
        assert_eq!(cleaned.len(), trimmed.len());
        assert_eq!(stats.windows, 2);
    }
}

#[test]
fn test_drive_jump_is_removed() {
    let mut raw = vec![5.0f32; MINUTE];
    raw.extend(vec![-5.0f32; MINUTE]);

    let (centred, median) = global_center(&raw);
    assert_eq!(median, 0.0);
    let detrended = local_median_subtract(&centred, SECOND);
    assert!(detrended.iter().all(|&x| x == 0.0));
}

#[test]
fn test_spike_in_constant_minute() {
    let mut raw = vec![10.0f32; MINUTE];
    raw[29_999] = 10_000.0;

    let cleaned = clean(&raw);
    assert_eq!(cleaned.len(), MINUTE);
    assert_eq!(cleaned[29_999], 0.0);
    assert!(cleaned.iter().all(|x| x.abs() < 1e-6));
}

#[test]
fn test_pulses_survive_cleaning() {
    let mut raw = synthetic_observation(1, 0);
    raw[20_000] = 5_000.0;

    let cleaned = clean(&raw);
    assert_eq!(cleaned[20_000], 0.0);

    // Pulses sit inside 5 sigma of the jitter and stay.
    let pulse_mean: f64 = (0..MINUTE)
        .filter(|i| i % 357 < 3)
        .map(|i| cleaned[i] as f64)
        .sum::<f64>()
        / (0..MINUTE).filter(|i| i % 357 < 3).count() as f64;
    assert!(pulse_mean > 0.8, "pulse mean {}", pulse_mean);
}

#[test]
fn test_mean_std_configuration() {
    let config = DenoiseConfig {
        center: CenterStatistic::Mean,
        spread: SpreadStatistic::Std,
        ..Default::default()
    };
    let denoiser = Denoiser::new(config).unwrap();

    let mut raw = vec![0.0f32; MINUTE];
    for (i, v) in raw.iter_mut().enumerate() {
        *v = ((i % 10) as f32) - 4.5;
    }
    raw[100] = 1_000.0;

    let (cleaned, summary) = denoiser.clean_with_summary(&raw);
    assert_eq!(cleaned[100], 0.0);
    assert_eq!(summary.clipped_samples, 1);
}

#[test]
fn test_file_round_trip_through_runner() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("20190101-PSRB0329-2ms-sampling-dd.dat");
    let raw = synthetic_observation(2, 123);
    write_samples(&input, &raw).unwrap();

    let runner = CleanRunner::new(DenoiseConfig::default()).unwrap();
    let report = runner.run_file(&input).unwrap();
    assert_eq!(report.status, CleanStatus::Cleaned);

    let written = read_samples(&runner.output_path_for(&input)).unwrap();
    assert_eq!(written, clean(&raw));

    // Second run is a no-op.
    let again = runner.run_file(&input).unwrap();
    assert_eq!(again.status, CleanStatus::Skipped);
}
