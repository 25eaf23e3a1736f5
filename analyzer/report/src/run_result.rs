use crate::run_params::RunParams;
use derive_new::new;
use std::path::Path;

/// Scalar steady-state estimate for one benchmark run. Produced once per
/// run, appended to the results table and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, new)]
pub struct RunResult {
    pub params: RunParams,
    /// Sustained operations per second past the measuring point.
    pub throughput: f64,
    /// Sustained mean latency in milliseconds past the measuring point.
    pub latency: f64,
}

/// Writes the batch-wide results table. Rows are written in the order given;
/// the caller sorts. The `n_dc` column is only present when at least one run
/// carries a datacenter count.
pub fn write_results_csv(path: &Path, results: &[RunResult]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    let has_dc = results.iter().any(|r| r.params.n_dc.is_some());

    let mut header = Vec::with_capacity(6);
    if has_dc {
        header.push("n_dc");
    }
    header.extend([
        "n_nodes",
        "concurrent_clients",
        "iteration",
        "throughput",
        "latency",
    ]);
    writer.write_record(&header)?;

    for result in results {
        let mut record = Vec::with_capacity(6);
        if has_dc {
            record.push(
                result
                    .params
                    .n_dc
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        record.push(result.params.n_nodes.to_string());
        record.push(result.params.concurrency.to_string());
        record.push(result.params.iteration.to_string());
        record.push(result.throughput.to_string());
        record.push(result.latency.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
