//! Rayon thread pool configuration for batch resolution.
//!
//! Use [WorkerPool::install] to resolve battles with a fixed number of
//! threads, or rely on Rayon's default (all CPU cores).

use std::env;

use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};

/// Overrides the worker count when no explicit count is given.
pub const WORKERS_ENV: &str = "SIEGELINE_WORKERS";

/// Configures how many worker threads are used for parallel batch execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    /// Use all available CPU cores (Rayon default).
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Explicit count, else `SIEGELINE_WORKERS`, else Rayon default.
    /// An unparsable env value falls back to the default.
    pub fn from_env(explicit: Option<usize>) -> Self {
        if let Some(n) = explicit {
            return Self::with_workers(n);
        }
        match env::var(WORKERS_ENV) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(n) => Self::with_workers(n),
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring unparsable {WORKERS_ENV}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Run a closure on a thread pool with this worker count. If
    /// [workers](WorkerPool::workers) is 0, uses the global Rayon pool.
    /// Otherwise builds a temporary pool with that many threads.
    pub fn install<F, R>(&self, f: F) -> Result<R, ThreadPoolBuildError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            Ok(f())
        } else {
            let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
            Ok(pool.install(f))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_count_wins() {
        assert_eq!(WorkerPool::from_env(Some(3)).workers, 3);
    }

    #[test]
    fn install_runs_on_requested_pool() {
        let threads = WorkerPool::with_workers(2)
            .install(rayon::current_num_threads)
            .unwrap();
        assert_eq!(threads, 2);
    }

    #[test]
    fn default_pool_runs_inline() {
        assert_eq!(WorkerPool::default_workers().install(|| 7).unwrap(), 7);
    }
}
