//! Configuration for multi-slot processing

use log::warn;

/// Threading configuration for encoding or decoding slot streams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of worker threads (0 = auto-detect)
    pub threads: usize,
    /// Whether to process slots in parallel (false = single-threaded)
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: 0, // Auto-detect CPU cores
            parallel: true,
        }
    }
}

impl BatchConfig {
    pub fn new(threads: usize, parallel: bool) -> Self {
        Self { threads, parallel }
    }

    pub fn from_args(matches: &clap::ArgMatches) -> Self {
        let threads = matches
            .get_one::<String>("threads")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let parallel = !matches.get_flag("no-parallel");

        Self::new(threads, parallel)
    }

    /// Get effective thread count (auto-detect if 0)
    pub fn effective_threads(&self) -> usize {
        match (self.parallel, self.threads) {
            (false, _) => 1,
            (true, 0) => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            (true, n) => n,
        }
    }

    /// Size the global rayon pool. Only the first call in a process takes effect.
    pub fn install_thread_pool(&self) {
        let threads = self.effective_threads();
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            warn!("Could not set thread count to {threads}, using default: {e}");
        }
    }
}
