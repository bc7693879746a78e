pub mod batch;
pub mod pool;

pub use batch::resolve_batch;
pub use pool::{WorkerPool, WORKERS_ENV};
