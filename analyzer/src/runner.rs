use crate::analytics::{smoothing, steady_state};
use crate::args::Args;
use crate::error::AnalyzerError;
use crate::loader;
use bench_analyzer_report::run_params::RunParams;
use bench_analyzer_report::run_result::{self, RunResult};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

const AUDIT_FILE_NAME: &str = "combine.csv";
const RESULTS_FILE_NAME: &str = "result.csv";

/// Processes every benchmark run under the results root and writes the
/// batch-wide results table. Failed runs are logged and excluded from the
/// table; they never abort the batch.
pub fn run(args: Args) -> Result<(), AnalyzerError> {
    let runs = discover_runs(&args.results_dir)?;
    if runs.is_empty() {
        warn!(
            "No benchmark-run directories under {}",
            args.results_dir.display()
        );
    } else {
        info!("Found {} benchmark runs", runs.len());
    }

    // Runs are independent: map them in parallel, collect, sort once. No
    // shared accumulator.
    let mut results: Vec<RunResult> = runs
        .into_par_iter()
        .filter_map(|(params, path)| {
            match process_run(&params, &path, args.moving_average_window) {
                Ok(result) => Some(result),
                Err(e) => {
                    error!("Skipping run {}: {e}", params.dirname);
                    None
                }
            }
        })
        .collect();
    results.sort_by_key(|r| r.params.sort_key());

    for result in &results {
        info!("{}", result.formatted_string());
    }

    let results_path = args.results_dir.join(RESULTS_FILE_NAME);
    run_result::write_results_csv(&results_path, &results)?;
    info!(
        "Wrote {} run results to {}",
        results.len(),
        results_path.display()
    );
    Ok(())
}

fn discover_runs(root: &Path) -> Result<Vec<(RunParams, PathBuf)>, AnalyzerError> {
    let mut runs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        match RunParams::from_dir_name(&name) {
            Some(params) => runs.push((params, entry.path())),
            None => debug!("Ignoring non-run directory {name}"),
        }
    }
    runs.sort_by(|a, b| a.0.dirname.cmp(&b.0.dirname));
    Ok(runs)
}

fn process_run(params: &RunParams, path: &Path, window: usize) -> Result<RunResult, AnalyzerError> {
    info!("Working on {}", params.dirname);
    let loaded = loader::load_run(path)?;
    let smoothed = smoothing::smooth(&loaded.series, window)?;
    let estimate = steady_state::estimate(&smoothed, steady_state::TAIL_FRACTION);
    debug!(
        "{}: measuring point {} of {} ticks",
        params.dirname,
        estimate.measuring_point,
        smoothed.points.len()
    );
    smoothed.write_audit_csv(&loaded.audit_dir.join(AUDIT_FILE_NAME))?;
    Ok(RunResult::new(
        params.clone(),
        estimate.throughput,
        estimate.latency,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn write_run_dir(root: &Path, dirname: &str, windows: usize) {
        let dir = root.join(dirname);
        fs::create_dir_all(&dir).unwrap();
        let mut contents =
            String::from("window, elapsed, n, errors, min, mean, median, 95th, 99th, 99_9th, max\n");
        for i in 0..windows {
            let window = i as u64 + 1;
            // Constant 100 ops/s once scaled back by the window index.
            writeln!(
                contents,
                "{window}, {window}.0, {}, 0, 100, 5000, 4000, 8000, 9000, 10000, 12000",
                window * 100
            )
            .unwrap();
        }
        fs::write(dir.join("ops_latencies.csv"), contents).unwrap();
    }

    #[test]
    fn batch_excludes_failed_runs_and_sorts_results() {
        let root = tempfile::tempdir().unwrap();
        let good_a = "n_nodes_per_dc-5-n_fmke_client_per_dc-2-concurrent_clients-8-iteration-1";
        let good_b = "n_nodes_per_dc-3-n_fmke_client_per_dc-2-concurrent_clients-8-iteration-1";
        let empty = "n_nodes_per_dc-3-n_fmke_client_per_dc-2-concurrent_clients-8-iteration-2";
        write_run_dir(root.path(), good_a, 55);
        write_run_dir(root.path(), good_b, 55);
        fs::create_dir_all(root.path().join(empty)).unwrap();
        fs::create_dir_all(root.path().join("plots")).unwrap();

        let args = Args {
            results_dir: root.path().to_path_buf(),
            moving_average_window: 20,
        };
        run(args).unwrap();

        let contents = fs::read_to_string(root.path().join(RESULTS_FILE_NAME)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "n_nodes,concurrent_clients,iteration,throughput,latency"
        );
        // The run without sample files is visibly absent, and rows are
        // sorted by node count.
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "3,16,1,100,5");
        assert_eq!(lines[2], "5,16,1,100,5");

        // Each processed run got its audit artifact next to the raw data.
        assert!(root.path().join(good_a).join(AUDIT_FILE_NAME).is_file());
        assert!(root.path().join(good_b).join(AUDIT_FILE_NAME).is_file());
        assert!(!root.path().join(empty).join(AUDIT_FILE_NAME).exists());
    }
}
