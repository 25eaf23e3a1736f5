use crate::run_result::RunResult;
use colored::{ColoredString, Colorize};

impl RunResult {
    pub fn formatted_string(&self) -> ColoredString {
        let dc = self
            .params
            .n_dc
            .map(|v| format!("{v} DCs, "))
            .unwrap_or_default();

        format!(
            "{}: {}{} nodes, {} connections, iteration {}: throughput: {:.2} ops/s, latency: {:.2} ms",
            self.params.dirname,
            dc,
            self.params.n_nodes,
            self.params.concurrency,
            self.params.iteration,
            self.throughput,
            self.latency,
        )
        .green()
    }
}
