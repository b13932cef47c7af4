//! Window statistics used by the denoising stages.
//!
//! All estimators work on the finite samples of a window only; NaN and
//! infinite samples never contribute to a center or spread. Accumulation is
//! done in `f64` regardless of the `f32` storage type.

use serde::{Deserialize, Serialize};

/// Scale factor turning a median absolute deviation into a standard
/// deviation estimate for normally distributed data (1 / Φ⁻¹(3/4)).
pub const MAD_TO_STD: f64 = 1.482_602_218_505_602;

/// Statistic used as the center of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterStatistic {
    #[default]
    Median,
    Mean,
}

/// Statistic used as the spread of a window around its center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadStatistic {
    /// `1.4826 * median(|x - center|)`
    #[default]
    MadStd,
    /// Population standard deviation about the center.
    Std,
}

/// Copy the finite samples of `values` into an `f64` buffer.
pub fn finite_values(values: &[f32]) -> Vec<f64> {
    values
        .iter()
        .filter(|v| v.is_finite())
        .map(|&v| v as f64)
        .collect()
}

/// Median of a scratch buffer, reordering it in the process.
///
/// For even-length data the two middle values are averaged.
pub fn median_in_place(buf: &mut [f64]) -> Option<f64> {
    let n = buf.len();
    if n == 0 {
        return None;
    }

    let mid = n / 2;
    let (lower, upper, _) = buf.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    let upper = *upper;

    if n % 2 == 1 {
        Some(upper)
    } else {
        // Largest element of the lower half is the other middle value.
        let lower_max = lower
            .iter()
            .copied()
            .max_by(|a, b| a.total_cmp(b))
            .unwrap_or(upper);
        Some((lower_max + upper) / 2.0)
    }
}

/// Median of the finite samples, or `None` if there are none.
pub fn median(values: &[f32]) -> Option<f64> {
    median_in_place(&mut finite_values(values))
}

/// Arithmetic mean of the finite samples, or `None` if there are none.
pub fn mean(values: &[f32]) -> Option<f64> {
    let finite = finite_values(values);
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// Center of the finite samples under the given statistic.
pub fn center(values: &[f32], statistic: CenterStatistic) -> Option<f64> {
    match statistic {
        CenterStatistic::Median => median(values),
        CenterStatistic::Mean => mean(values),
    }
}

/// Spread of the finite samples about `center`.
///
/// Returns `None` when fewer than two finite samples exist, in which case
/// the spread is undefined.
pub fn spread(values: &[f32], center: f64, statistic: SpreadStatistic) -> Option<f64> {
    let mut finite = finite_values(values);
    if finite.len() < 2 {
        return None;
    }

    match statistic {
        SpreadStatistic::MadStd => {
            for v in finite.iter_mut() {
                *v = (*v - center).abs();
            }
            median_in_place(&mut finite).map(|mad| mad * MAD_TO_STD)
        }
        SpreadStatistic::Std => {
            let n = finite.len() as f64;
            let variance = finite.iter().map(|v| (v - center).powi(2)).sum::<f64>() / n;
            Some(variance.sqrt())
        }
    }
}
