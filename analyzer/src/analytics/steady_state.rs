use bench_analyzer_report::series::SmoothedSeries;

/// Fraction of the series tail assumed representative of steady-state noise.
pub const TAIL_FRACTION: f64 = 0.7;

/// Scalar reduction of one smoothed series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyStateEstimate {
    /// Index of the first tick judged to be past the warm-up transient.
    pub measuring_point: usize,
    pub throughput: f64,
    pub latency: f64,
}

/// Reduces a smoothed series to its steady-state estimate: throughput as the
/// mean smoothed rate past the measuring point, latency as the mean of the
/// mean-latency column over the same tail. Percentile columns stay in the
/// audit artifact only.
pub fn estimate(series: &SmoothedSeries, tail_fraction: f64) -> SteadyStateEstimate {
    let measuring_point = measuring_point(series, tail_fraction);
    let tail = &series.points[measuring_point..];
    let throughput = tail.iter().map(|p| p.throughput_ma).sum::<f64>() / tail.len() as f64;
    let latency = tail.iter().map(|p| p.latency.mean).sum::<f64>() / tail.len() as f64;
    SteadyStateEstimate {
        measuring_point,
        throughput,
        latency,
    }
}

/// First index whose smoothed change rate has dropped to the steady-state
/// noise level, falling back to the last index when the run never settles.
/// Always yields a valid index.
fn measuring_point(series: &SmoothedSeries, tail_fraction: f64) -> usize {
    let last = series.points.len() - 1;
    match diff_threshold(series, tail_fraction) {
        Some(threshold) => series
            .points
            .iter()
            .position(|p| matches!(p.throughput_ma_diff, Some(d) if d <= threshold))
            .unwrap_or(last),
        None => last,
    }
}

/// Acceptance bound for "no longer changing": the mean smoothed change rate
/// over the trailing `tail_fraction` of the series. `None` when no change
/// rate is defined there.
pub fn diff_threshold(series: &SmoothedSeries, tail_fraction: f64) -> Option<f64> {
    let len = series.points.len();
    let tail_len = (tail_fraction * len as f64).floor() as usize;
    let defined: Vec<f64> = series.points[len - tail_len..]
        .iter()
        .filter_map(|p| p.throughput_ma_diff)
        .collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}
