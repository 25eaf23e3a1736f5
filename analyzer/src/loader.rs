use crate::error::AnalyzerError;
use bench_analyzer_report::sample::SampleRow;
use bench_analyzer_report::series::{LatencySummary, MergedPoint, MergedSeries};
use csv::{ReaderBuilder, Trim};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Filename stem suffix marking a latency sample file (`*_latencies.*`).
const SAMPLE_FILE_SUFFIX: &str = "_latencies";

/// Reporting windows before this index are never trusted, regardless of
/// their measured values.
const MIN_TRUSTED_WINDOW: u64 = 9;

#[derive(Debug)]
pub struct LoadedRun {
    pub series: MergedSeries,
    /// Directory holding the raw sample files, where the audit artifact is
    /// written next to them. Parent of the last discovered sample file.
    pub audit_dir: PathBuf,
}

/// Discovers every latency sample file under `dir`, parses and normalizes
/// the rows, and merges all files into one per-tick series.
pub fn load_run(dir: &Path) -> Result<LoadedRun, AnalyzerError> {
    let files = discover_sample_files(dir);
    let audit_dir = files
        .last()
        .and_then(|f| f.parent())
        .map(Path::to_path_buf)
        .ok_or_else(|| AnalyzerError::NoSamplesFound(dir.to_path_buf()))?;

    let mut ticks: BTreeMap<u64, TickAccumulator> = BTreeMap::new();
    for path in &files {
        let rows = read_sample_file(path)?;
        debug!("{}: {} usable sample rows", path.display(), rows.len());
        for row in &rows {
            ticks.entry(row.tick()).or_default().add(row);
        }
    }

    let points = ticks
        .into_iter()
        .map(|(elapsed, acc)| acc.into_point(elapsed))
        .collect();
    Ok(LoadedRun {
        series: MergedSeries { points },
        audit_dir,
    })
}

fn discover_sample_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| stem.ends_with(SAMPLE_FILE_SUFFIX))
        })
        .collect();
    files.sort();
    files
}

/// Reads one sample file. Headers and fields are trimmed before use since
/// the client harness emits inconsistently padded headers. Malformed rows
/// (unparsable, negative latency or count, non-increasing window index) are
/// skipped with a warning, never fatal to the file.
fn read_sample_file(path: &Path) -> Result<Vec<SampleRow>, AnalyzerError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    let mut last_window: Option<u64> = None;
    for result in reader.deserialize() {
        let row: SampleRow = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("{}: skipping unparsable row: {e}", path.display());
                continue;
            }
        };
        if last_window.is_some_and(|last| row.window <= last) {
            warn!(
                "{}: skipping row with non-increasing window index {}",
                path.display(),
                row.window
            );
            continue;
        }
        last_window = Some(row.window);
        if row.window < MIN_TRUSTED_WINDOW {
            continue;
        }
        if row.has_negative_latency() || row.count < 0.0 {
            warn!(
                "{}: skipping row with negative values at window {}",
                path.display(),
                row.window
            );
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

#[derive(Default)]
struct TickAccumulator {
    n: f64,
    errors: u64,
    latency_sum: LatencySummary,
    contributions: u64,
}

impl TickAccumulator {
    fn add(&mut self, row: &SampleRow) {
        self.n += row.rate();
        self.errors += row.errors;
        self.latency_sum.accumulate(&row.latency_ms());
        self.contributions += 1;
    }

    fn into_point(self, elapsed: u64) -> MergedPoint {
        MergedPoint {
            elapsed,
            n: self.n,
            errors: self.errors,
            latency: self.latency_sum.divided_by(self.contributions as f64),
        }
    }
}
