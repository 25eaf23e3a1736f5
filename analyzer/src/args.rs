use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 20;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Root directory containing one subdirectory per benchmark-run combination
    pub results_dir: PathBuf,

    /// Window size for moving average calculations in time series data
    #[arg(long, default_value_t = DEFAULT_MOVING_AVERAGE_WINDOW)]
    pub moving_average_window: usize,
}

impl Args {
    pub fn validate(&self) {
        if self.moving_average_window < 2 {
            Args::command()
                .error(
                    ErrorKind::InvalidValue,
                    "moving average window must be at least 2",
                )
                .exit();
        }
        if !self.results_dir.is_dir() {
            Args::command()
                .error(
                    ErrorKind::InvalidValue,
                    format!(
                        "results directory '{}' does not exist",
                        self.results_dir.display()
                    ),
                )
                .exit();
        }
    }
}
