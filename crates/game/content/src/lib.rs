//! Static arena content on top of `arena-core`.
//!
//! This crate houses the monster roster (stat blocks, specials, tiers) and
//! the round-weighted encounter selection, plus the driver that strings
//! five encounters into one arena run. Content is plain data and pure
//! selection logic; all combat resolution stays in `arena-core`.

pub mod encounter;
pub mod roster;

pub use encounter::{ARENA_ROUNDS, RunOutcome, round_tier, run_arena, select_arena_enemy};
pub use roster::{MonsterKind, TIER_FOUR, TIER_ONE, TIER_THREE, TIER_TWO};
