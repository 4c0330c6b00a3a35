//! Random sources for procedural placement
//!
//! The simulation only ever asks for a `u16`. Which generator sits behind that
//! call is decided when the session is built:
//! - [`Lfsr16`]: 16-bit linear-feedback shift register, fully reproducible
//! - [`PcgSource`]: PCG32 stream standing in for a hardware generator

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::LFSR_SEED;

/// Anything that can hand out 16-bit random values
pub trait RandomSource {
    /// Advance the generator and return the next value
    fn next_u16(&mut self) -> u16;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u16(&mut self) -> u16 {
        (**self).next_u16()
    }
}

/// Derive a session seed from a free-running clock.
///
/// Mixes the fixed seed constant with the low 16 bits of the clock. An all-zero
/// register would lock the LFSR, so that case falls back to the constant.
pub fn session_seed(clock_ticks: u32) -> u16 {
    let seed = LFSR_SEED ^ (clock_ticks & 0xFFFF) as u16;
    if seed == 0 { LFSR_SEED } else { seed }
}

/// 16-bit Fibonacci LFSR (taps 0, 2, 3, 5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lfsr16 {
    reg: u16,
}

impl Lfsr16 {
    /// Create a register with an explicit seed (zero is remapped, see [`session_seed`])
    pub fn new(seed: u16) -> Self {
        Self {
            reg: if seed == 0 { LFSR_SEED } else { seed },
        }
    }

    /// Seed from a clock reading, as done at session start
    pub fn from_clock(clock_ticks: u32) -> Self {
        Self::new(session_seed(clock_ticks))
    }

    /// Reseed in place
    pub fn seed(&mut self, value: u16) {
        *self = Self::new(value);
    }

    /// Current register contents
    pub fn register(&self) -> u16 {
        self.reg
    }
}

impl Default for Lfsr16 {
    fn default() -> Self {
        Self::new(LFSR_SEED)
    }
}

impl RandomSource for Lfsr16 {
    #[inline]
    fn next_u16(&mut self) -> u16 {
        let r = self.reg;
        let bit = (r ^ (r >> 2) ^ (r >> 3) ^ (r >> 5)) & 1;
        self.reg = (r >> 1) | (bit << 15);
        self.reg
    }
}

/// PCG32-backed source for hosts that want variety over reproducibility
#[derive(Debug, Clone)]
pub struct PcgSource {
    rng: Pcg32,
}

impl PcgSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for PcgSource {
    fn next_u16(&mut self) -> u16 {
        (self.rng.next_u32() >> 16) as u16
    }
}

/// Fixed sequence source for tests and replays; cycles when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<u16>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<u16>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedSource {
    fn next_u16(&mut self) -> u16 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
