//! Randomness behind a narrow seam.
//!
//! The engine never touches an RNG directly; every roll flows through the
//! [`Dice`] trait so battles can be replayed deterministically in tests.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};

/// Source of combat randomness.
pub trait Dice {
    /// Roll an integer in `min..=max`.
    fn roll(&mut self, min: i32, max: i32) -> i32;

    /// Returns true with the given percent chance (0..=100).
    fn chance(&mut self, percent: u32) -> bool;

    /// Even-odds flip, used to decide who opens a battle.
    fn coin_flip(&mut self) -> bool {
        self.chance(50)
    }
}

/// Default dice backed by a `rand` RNG.
#[derive(Clone, Debug)]
pub struct RngDice<R> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDice<rand::rngs::StdRng> {
    /// Deterministic dice for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

/// Dice backed by the thread-local RNG.
pub fn thread_dice() -> RngDice<rand::rngs::ThreadRng> {
    RngDice::new(rand::rng())
}

impl<R: Rng> Dice for RngDice<R> {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn chance(&mut self, percent: u32) -> bool {
        self.rng.random_range(0..100u32) < percent
    }
}

/// Scripted dice for deterministic tests and replays.
///
/// Rolls and chance answers are consumed front-to-back. When a queue runs
/// dry, `roll` returns `min` and `chance` returns false.
#[derive(Clone, Debug, Default)]
pub struct SequenceDice {
    rolls: VecDeque<i32>,
    chances: VecDeque<bool>,
}

impl SequenceDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rolls(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            chances: VecDeque::new(),
        }
    }

    pub fn push_roll(&mut self, value: i32) -> &mut Self {
        self.rolls.push_back(value);
        self
    }

    pub fn push_chance(&mut self, value: bool) -> &mut Self {
        self.chances.push_back(value);
        self
    }
}

impl Dice for SequenceDice {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        match self.rolls.pop_front() {
            Some(v) => v.clamp(min, max),
            None => min,
        }
    }

    fn chance(&mut self, _percent: u32) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_dice_are_reproducible() {
        let mut a = RngDice::seeded(7);
        let mut b = RngDice::seeded(7);
        let rolls_a: Vec<i32> = (0..16).map(|_| a.roll(1, 20)).collect();
        let rolls_b: Vec<i32> = (0..16).map(|_| b.roll(1, 20)).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().all(|r| (1..=20).contains(r)));
    }

    #[test]
    fn sequence_dice_clamp_and_exhaust() {
        let mut dice = SequenceDice::with_rolls([10, 2]);
        dice.push_chance(true);
        assert_eq!(dice.roll(1, 5), 5); // clamped to max
        assert_eq!(dice.roll(1, 5), 2);
        assert_eq!(dice.roll(3, 5), 3); // exhausted -> min
        assert!(dice.chance(50));
        assert!(!dice.chance(50)); // exhausted -> false
    }

    #[test]
    fn degenerate_range_returns_min() {
        let mut dice = RngDice::seeded(1);
        assert_eq!(dice.roll(4, 4), 4);
    }
}
