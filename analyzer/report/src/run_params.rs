/// Topology and load parameters of one benchmark run, recovered from its
/// result-directory name. Run directories are named by the experiment
/// harness as alternating `key-value` tokens, e.g.
/// `n_dc-2-n_nodes_per_dc-3-n_fmke_client_per_dc-1-concurrent_clients-16-iteration-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    /// Datacenter count, when the deployment is geo-distributed.
    pub n_dc: Option<u64>,
    /// Database nodes per datacenter.
    pub n_nodes: u64,
    /// Total concurrent connections across all clients and datacenters.
    pub concurrency: u64,
    /// Repetition index of this parameter combination.
    pub iteration: u64,
    pub dirname: String,
}

impl RunParams {
    /// Parses a run-directory name. Returns `None` for directories that are
    /// not benchmark runs (no `iteration` key, no node-count key, or
    /// non-numeric values).
    pub fn from_dir_name(name: &str) -> Option<Self> {
        let tokens: Vec<&str> = name.split('-').collect();
        let pairs: Vec<(&str, &str)> = tokens.chunks_exact(2).map(|c| (c[0], c[1])).collect();
        if pairs.is_empty() {
            return None;
        }
        let lookup = |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

        let iteration: u64 = lookup("iteration")?.parse().ok()?;
        let n_dc: Option<u64> = match lookup("n_dc") {
            Some(value) => Some(value.parse().ok()?),
            None => None,
        };

        // The node-count key varies with the database under test; it is the
        // per-datacenter key that does not describe the client topology.
        let n_nodes: u64 = pairs
            .iter()
            .find(|(k, _)| k.contains("per_dc") && !k.contains("client"))
            .map(|(_, v)| *v)?
            .parse()
            .ok()?;

        let clients_per_dc: u64 = match pairs.iter().find(|(k, _)| k.contains("client_per_dc")) {
            Some((_, value)) => value.parse().ok()?,
            None => 1,
        };
        let concurrent_clients: u64 = lookup("concurrent_clients")?.parse().ok()?;
        let concurrency = clients_per_dc * concurrent_clients * n_dc.unwrap_or(1);

        Some(Self {
            n_dc,
            n_nodes,
            concurrency,
            iteration,
            dirname: name.to_owned(),
        })
    }

    /// Ordering of the final results table: topology first, iteration last.
    pub fn sort_key(&self) -> (u64, u64, u64, u64) {
        (
            self.n_dc.unwrap_or(0),
            self.n_nodes,
            self.concurrency,
            self.iteration,
        )
    }
}
