pub mod smoothing;
pub mod steady_state;

#[cfg(test)]
pub(crate) mod testutil {
    use bench_analyzer_report::series::{LatencySummary, MergedPoint, MergedSeries};

    /// Synthetic merged series with the given rates, one tick apart, with a
    /// fixed 5 ms mean latency.
    pub fn series_from_rates(rates: &[f64]) -> MergedSeries {
        MergedSeries {
            points: rates
                .iter()
                .enumerate()
                .map(|(i, n)| MergedPoint {
                    elapsed: i as u64 + 1,
                    n: *n,
                    errors: 0,
                    latency: LatencySummary {
                        min: 1.0,
                        mean: 5.0,
                        median: 4.0,
                        p95: 8.0,
                        p99: 9.0,
                        p999: 10.0,
                        max: 12.0,
                    },
                })
                .collect(),
        }
    }
}
