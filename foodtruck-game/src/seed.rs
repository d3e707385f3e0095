//! Seedable scenario RNG.
//!
//! Seeds are free-form strings. The string is folded with a 31x rolling hash
//! over UTF-16 code units (32-bit wrapping), then a 32-bit LCG advances the
//! state once per draw. The constants must not change: saved seeds replay
//! the same scenario order only while the generator stays bit-identical.

use rand::RngCore;
use serde::{Deserialize, Serialize};

const LCG_MULTIPLIER: u64 = 1_664_525;
const LCG_INCREMENT: u64 = 1_013_904_223;
const LCG_MODULUS: u64 = 1 << 32;
const UNIT_SCALE: f64 = 4_294_967_296.0;

/// Rolling string hash, absolute value of the 32-bit signed result.
#[must_use]
pub fn hash_seed(seed: &str) -> u64 {
    let mut hash: i32 = 0;
    for unit in seed.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    u64::from(hash.unsigned_abs())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: &str) -> Self {
        Self {
            state: hash_seed(seed),
        }
    }

    /// Generator keyed by a seed and a turn, for one-off draws that must not
    /// depend on how many draws happened earlier in the session.
    #[must_use]
    pub fn for_turn(seed: &str, turn: u32) -> Self {
        Self::new(&format!("{seed}:{turn}"))
    }

    #[must_use]
    pub const fn state(&self) -> u64 {
        self.state
    }

    fn advance(&mut self) -> u32 {
        // Exact modulo 2^32 even for a deserialized state above 32 bits.
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT)
            % LCG_MODULUS;
        // state < 2^32 after the modulus
        u32::try_from(self.state).unwrap_or(u32::MAX)
    }

    /// Next value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.advance()) / UNIT_SCALE
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.advance());
        let low = u64::from(self.advance());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
