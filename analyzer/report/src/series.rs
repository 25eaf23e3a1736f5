use std::path::Path;

/// Latency statistics for one elapsed tick, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatencySummary {
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    pub p95: f64,
    pub p99: f64,
    pub p999: f64,
    pub max: f64,
}

impl LatencySummary {
    pub fn accumulate(&mut self, other: &LatencySummary) {
        self.min += other.min;
        self.mean += other.mean;
        self.median += other.median;
        self.p95 += other.p95;
        self.p99 += other.p99;
        self.p999 += other.p999;
        self.max += other.max;
    }

    pub fn divided_by(&self, divisor: f64) -> LatencySummary {
        LatencySummary {
            min: self.min / divisor,
            mean: self.mean / divisor,
            median: self.median / divisor,
            p95: self.p95 / divisor,
            p99: self.p99 / divisor,
            p999: self.p999 / divisor,
            max: self.max / divisor,
        }
    }
}

/// One row per distinct elapsed tick, aggregated across every sample file of
/// a run: summed rates and errors, averaged latency statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPoint {
    pub elapsed: u64,
    pub n: f64,
    pub errors: u64,
    pub latency: LatencySummary,
}

/// Ordered by `elapsed`, ascending. Ticks without any contributing row are
/// simply absent, never gap-filled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedSeries {
    pub points: Vec<MergedPoint>,
}

/// A merged point plus the derived smoothing columns. `throughput_ma_diff`
/// is `None` where the smoothed change rate has no full window of measured
/// values behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedPoint {
    pub elapsed: u64,
    pub n: f64,
    pub errors: u64,
    pub latency: LatencySummary,
    pub throughput_ma: f64,
    pub throughput_ma_diff: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SmoothedSeries {
    pub points: Vec<SmoothedPoint>,
}

impl SmoothedSeries {
    pub const AUDIT_HEADER: [&'static str; 12] = [
        "elapsed",
        "n",
        "errors",
        "min",
        "mean",
        "median",
        "95th",
        "99th",
        "99_9th",
        "max",
        "throughput_ma",
        "throughput_ma_diff",
    ];

    /// Writes the audit table, one row per retained tick, ascending.
    /// Undefined change-rate cells are left empty.
    pub fn write_audit_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(Self::AUDIT_HEADER)?;
        for point in &self.points {
            writer.write_record(&[
                point.elapsed.to_string(),
                point.n.to_string(),
                point.errors.to_string(),
                point.latency.min.to_string(),
                point.latency.mean.to_string(),
                point.latency.median.to_string(),
                point.latency.p95.to_string(),
                point.latency.p99.to_string(),
                point.latency.p999.to_string(),
                point.latency.max.to_string(),
                point.throughput_ma.to_string(),
                point
                    .throughput_ma_diff
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}
