//! Parallel resolution of many independent battles.
//!
//! Each battle owns its inputs and reads the catalog by shared reference,
//! so they can run on any worker without locking. Results keep input order.

use rayon::prelude::*;
use rayon::ThreadPoolBuildError;

use crate::combat::battle::BattleInput;
use crate::combat::report::{resolve_report, BattleReport};
use crate::data::catalog::Catalog;
use crate::error::BattleError;
use crate::parallel::pool::WorkerPool;

/// Resolve every battle on `pool`. One failing battle doesn't stop the rest;
/// only a pool that can't be built fails the whole batch.
pub fn resolve_batch(
    catalog: &Catalog,
    inputs: &[BattleInput],
    pool: &WorkerPool,
) -> Result<Vec<Result<BattleReport, BattleError>>, ThreadPoolBuildError> {
    pool.install(|| {
        inputs
            .par_iter()
            .map(|input| resolve_report(catalog, input))
            .collect()
    })
}
