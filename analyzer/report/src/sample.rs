use crate::series::LatencySummary;
use derive_new::new;
use serde::Deserialize;

/// One reporting-window measurement emitted by a load-generating client for
/// a single operation type. Field values are as they appear on disk: raw
/// cumulative-style `count` and latency statistics in microseconds.
#[derive(Debug, Clone, PartialEq, Deserialize, new)]
pub struct SampleRow {
    pub window: u64,
    pub elapsed: f64,
    #[serde(rename = "n", alias = "count")]
    pub count: f64,
    pub errors: u64,
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    #[serde(rename = "95th")]
    pub p95: f64,
    #[serde(rename = "99th")]
    pub p99: f64,
    #[serde(rename = "99_9th")]
    pub p999: f64,
    pub max: f64,
}

impl SampleRow {
    /// Elapsed wall-clock tick, truncated downward to whole seconds. Used as
    /// the join key when merging files of the same run.
    pub fn tick(&self) -> u64 {
        self.elapsed.floor() as u64
    }

    /// Instantaneous per-report rate: the raw count scaled back by the row's
    /// own window index.
    pub fn rate(&self) -> f64 {
        self.count / self.window as f64
    }

    /// Latency statistics converted from microseconds to milliseconds.
    pub fn latency_ms(&self) -> LatencySummary {
        LatencySummary {
            min: self.min / 1_000.0,
            mean: self.mean / 1_000.0,
            median: self.median / 1_000.0,
            p95: self.p95 / 1_000.0,
            p99: self.p99 / 1_000.0,
            p999: self.p999 / 1_000.0,
            max: self.max / 1_000.0,
        }
    }

    pub fn has_negative_latency(&self) -> bool {
        [
            self.min,
            self.mean,
            self.median,
            self.p95,
            self.p99,
            self.p999,
            self.max,
        ]
        .iter()
        .any(|v| *v < 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SampleRow {
        SampleRow::new(
            9, 10.7, 900.0, 2, 100.0, 2_000.0, 1_800.0, 3_000.0, 4_000.0, 5_000.0, 6_000.0,
        )
    }

    #[test]
    fn tick_truncates_downward() {
        assert_eq!(row().tick(), 10);
    }

    #[test]
    fn rate_divides_by_own_window() {
        assert_eq!(row().rate(), 100.0);
    }

    #[test]
    fn latencies_convert_to_milliseconds() {
        let latency = row().latency_ms();
        assert_eq!(latency.mean, 2.0);
        assert_eq!(latency.p999, 5.0);
    }

    #[test]
    fn negative_latency_is_detected() {
        let mut bad = row();
        bad.p99 = -1.0;
        assert!(bad.has_negative_latency());
        assert!(!row().has_negative_latency());
    }
}
