//! Dice sources for movement rolls.
//!
//! The board only depends on the [`Dice`] trait, so production rooms roll
//! with [`RandomDice`] while tests script exact rolls with [`ScriptedDice`].

use std::collections::VecDeque;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces step counts in `1..=max`.
pub trait Dice: Send + fmt::Debug {
    fn roll(&mut self, max: u32) -> u32;
}

/// Uniformly random rolls backed by a seedable RNG.
#[derive(Debug)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Seeds from the operating system.
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    /// Reproducible rolls for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice for RandomDice {
    fn roll(&mut self, max: u32) -> u32 {
        self.rng.random_range(1..=max.max(1))
    }
}

/// Replays a fixed sequence of rolls, then repeats `fallback` forever.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    rolls: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: 1,
        }
    }

    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, max: u32) -> u32 {
        self.rolls
            .pop_front()
            .unwrap_or(self.fallback)
            .clamp(1, max.max(1))
    }
}
