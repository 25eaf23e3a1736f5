use crate::error::AnalyzerError;
use bench_analyzer_report::series::{MergedSeries, SmoothedPoint, SmoothedSeries};
use std::collections::VecDeque;

/// Derives the smoothed series from a merged one: trailing moving average of
/// the throughput column, exponential reconstruction of the unsupported
/// window head, and the smoothed absolute change rate used for steady-state
/// detection.
///
/// Rows with a non-positive instantaneous rate are dropped first; fewer than
/// `window` surviving rows leave the moving average undefined and fail the
/// run. All accumulation happens in the insertion order of the filtered
/// series, so a given input always produces bit-identical output.
pub fn smooth(series: &MergedSeries, window: usize) -> Result<SmoothedSeries, AnalyzerError> {
    debug_assert!(window >= 2);

    let retained: Vec<_> = series
        .points
        .iter()
        .filter(|p| p.n > 0.0)
        .cloned()
        .collect();
    if retained.len() < window {
        return Err(AnalyzerError::InsufficientSamples {
            found: retained.len(),
            required: window,
        });
    }

    let rates: Vec<f64> = retained.iter().map(|p| p.n).collect();
    let naive = trailing_mean(&rates, window);
    let throughput_ma = back_extrapolate(&rates, &naive, window);

    // Change detection only trusts genuinely measured averages: diffs start
    // at the first index whose predecessor lies past the reconstructed head,
    // and the smoothed change rate needs a full window of them.
    let mut throughput_ma_diff: Vec<Option<f64>> = vec![None; retained.len()];
    let mut acc: VecDeque<f64> = VecDeque::with_capacity(window);
    for i in window..retained.len() {
        acc.push_back((throughput_ma[i] - throughput_ma[i - 1]).abs());
        if acc.len() > window {
            acc.pop_front();
        }
        if acc.len() == window {
            throughput_ma_diff[i] = Some(acc.iter().sum::<f64>() / window as f64);
        }
    }

    let points = retained
        .into_iter()
        .zip(throughput_ma.into_iter().zip(throughput_ma_diff))
        .map(|(p, (ma, diff))| SmoothedPoint {
            elapsed: p.elapsed,
            n: p.n,
            errors: p.errors,
            latency: p.latency,
            throughput_ma: ma,
            throughput_ma_diff: diff,
        })
        .collect();
    Ok(SmoothedSeries { points })
}

/// Mean over the trailing `window` values; `None` until the window fills.
fn trailing_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut acc: VecDeque<f64> = VecDeque::with_capacity(window);
    for value in values {
        acc.push_back(*value);
        if acc.len() > window {
            acc.pop_front();
        }
        if acc.len() == window {
            out.push(Some(acc.iter().sum::<f64>() / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Replaces the undefined head of the trailing window with the decay model
/// `alpha * e^(-beta * i)`: `alpha` is the peak observed rate and `beta` is
/// solved so the model meets the first real moving-average value at index
/// `window - 1`, leaving no discontinuity at the seam.
fn back_extrapolate(rates: &[f64], naive: &[Option<f64>], window: usize) -> Vec<f64> {
    let alpha = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // The caller guarantees at least `window` rates, so the seam exists.
    let seam = naive[window - 1].unwrap_or(alpha);
    let beta = -(seam / alpha).ln() / (window - 1) as f64;

    naive
        .iter()
        .enumerate()
        .map(|(i, value)| match value {
            Some(v) => *v,
            None => alpha * (-beta * i as f64).exp(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::series_from_rates;

    #[test]
    fn too_few_filtered_rows_fail() {
        let series = series_from_rates(&[100.0; 19]);
        let err = smooth(&series, 20).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::InsufficientSamples {
                found: 19,
                required: 20
            }
        ));
    }

    #[test]
    fn non_positive_rates_are_filtered_before_smoothing() {
        let mut rates = vec![100.0; 25];
        rates[3] = 0.0;
        rates[7] = -1.0;
        let smoothed = smooth(&series_from_rates(&rates), 20).unwrap();
        assert_eq!(smoothed.points.len(), 23);
        assert!(smoothed.points.iter().all(|p| p.n > 0.0));
    }

    #[test]
    fn moving_average_is_fully_defined_and_non_negative() {
        let rates: Vec<f64> = (1..=40).map(|i| 50.0 + i as f64 * 10.0).collect();
        let smoothed = smooth(&series_from_rates(&rates), 20).unwrap();
        assert_eq!(smoothed.points.len(), 40);
        assert!(smoothed
            .points
            .iter()
            .all(|p| p.throughput_ma.is_finite() && p.throughput_ma >= 0.0));
    }

    #[test]
    fn reconstructed_head_is_continuous_at_the_seam() {
        let rates: Vec<f64> = (0..40)
            .map(|i| if i < 20 { 100.0 + 45.0 * i as f64 } else { 1000.0 })
            .collect();
        let smoothed = smooth(&series_from_rates(&rates), 20).unwrap();

        let naive_seam = rates[..20].iter().sum::<f64>() / 20.0;
        assert_eq!(smoothed.points[19].throughput_ma, naive_seam);

        // The model value extended to the seam index matches the naive
        // trailing average it was solved against.
        let alpha = 1000.0_f64;
        let beta = -(naive_seam / alpha).ln() / 19.0;
        let model_at_seam = alpha * (-beta * 19.0).exp();
        assert!((model_at_seam - naive_seam).abs() < 1e-9);
        assert!((smoothed.points[0].throughput_ma - alpha).abs() < 1e-9);
    }

    #[test]
    fn constant_series_has_flat_average_and_zero_change_rate() {
        let smoothed = smooth(&series_from_rates(&[250.0; 45]), 20).unwrap();
        assert!(smoothed
            .points
            .iter()
            .all(|p| (p.throughput_ma - 250.0).abs() < 1e-9));

        // Change rate undefined until a full window of measured diffs, zero
        // afterwards.
        assert!(smoothed.points[..39]
            .iter()
            .all(|p| p.throughput_ma_diff.is_none()));
        assert!(smoothed.points[39..]
            .iter()
            .all(|p| p.throughput_ma_diff == Some(0.0)));
    }
}
