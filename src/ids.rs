//! Record id generation
//!
//! Ids are 128 random bits rendered as 32 lowercase hex digits.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

fn format_id(bits: u128) -> String {
    format!("{:032x}", bits)
}

/// Ids from the thread-local OS-seeded RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        format_id(rand::rng().random())
    }
}

/// Reproducible ids from a seeded PCG stream
#[derive(Debug, Clone)]
pub struct SeededIds {
    rng: Pcg64,
}

impl SeededIds {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl IdGenerator for SeededIds {
    fn next_id(&mut self) -> String {
        format_id(self.rng.random())
    }
}
