//! Deterministic battle resolution for a multiplayer space-colonization game.
//!
//! Given attacking waves per sector, sector garrisons with their buildings,
//! tools and admirals, and a surface garrison, the engine resolves every
//! sector, the surface stage and the loot into a self-contained
//! [combat::BattleReport]. Every engine entry point takes the
//! [data::Catalog] explicitly and is a pure function of its arguments.

pub mod cli;
pub mod combat;
pub mod data;
pub mod error;
pub mod parallel;

pub use error::{BattleError, CatalogError};
