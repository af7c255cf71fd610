//! Differential oracle: counts right pairs under one fixed schedule.

use rand::RngCore;
use serde::Serialize;

use crate::block::Block;
use crate::cipher::encrypt;
use crate::error::Result;
use crate::tweakey::TweakeySchedule;

/// Input/output XOR patterns of the trail under test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Differential {
    pub input: Block,
    pub output: Block,
}

impl Differential {
    pub fn new(input: Block, output: Block) -> Self {
        Differential { input, output }
    }

    /// Validates raw nibble arrays, rejecting values above `0xF`.
    pub fn from_nibbles(input: [u8; 16], output: [u8; 16]) -> Result<Self> {
        Ok(Differential {
            input: Block::new(input)?,
            output: Block::new(output)?,
        })
    }

    /// Six-round CRAFT differential `AA000A00A00A0A00 -> 000A0000A00A0A00`.
    pub fn craft_six_round() -> Self {
        Differential {
            input: Block::from_masked([
                0xA, 0xA, 0x0, 0x0, 0x0, 0xA, 0x0, 0x0, 0xA, 0x0, 0x0, 0xA, 0x0, 0xA, 0x0, 0x0,
            ]),
            output: Block::from_masked([
                0x0, 0x0, 0x0, 0xA, 0x0, 0x0, 0x0, 0x0, 0xA, 0x0, 0x0, 0xA, 0x0, 0xA, 0x0, 0x0,
            ]),
        }
    }
}

impl Default for Differential {
    fn default() -> Self {
        Self::craft_six_round()
    }
}

/// Source of right-pair counts for one bunch of queries.
///
/// Implementations must be shareable across worker threads; all per-call
/// randomness comes from the worker-owned `rng`.
pub trait DifferentialOracle: Sync {
    /// Number of the `queries` sampled pairs whose output difference matches.
    /// Must lie in `0..=queries`.
    fn count_matches(&self, tk: &TweakeySchedule, queries: u64, rng: &mut dyn RngCore) -> u64;
}

/// Oracle backed by the real cipher.
#[derive(Clone, Copy, Debug)]
pub struct CipherOracle {
    pub rounds: usize,
    pub differential: Differential,
}

impl CipherOracle {
    pub fn new(rounds: usize, differential: Differential) -> Self {
        CipherOracle { rounds, differential }
    }
}

impl DifferentialOracle for CipherOracle {
    fn count_matches(&self, tk: &TweakeySchedule, queries: u64, rng: &mut dyn RngCore) -> u64 {
        let Differential { input, output } = self.differential;
        let mut matches = 0u64;
        for _ in 0..queries {
            let p1 = Block::random(rng);
            let p2 = p1 ^ input;
            let c1 = encrypt(self.rounds, &p1, tk);
            let c2 = encrypt(self.rounds, &p2, tk);
            if c1 ^ c2 == output {
                matches += 1;
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tweakey::MasterKey;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn random_schedule(rng: &mut ChaCha20Rng) -> TweakeySchedule {
        let key = MasterKey::random(rng);
        let tweak = Block::random(rng);
        TweakeySchedule::derive(&key, &tweak)
    }

    #[test]
    fn test_zero_difference_always_matches() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let tk = random_schedule(&mut rng);
        let zero = Differential::new(Block::ZERO, Block::ZERO);
        for rounds in [0, 1, 6] {
            let oracle = CipherOracle::new(rounds, zero);
            assert_eq!(oracle.count_matches(&tk, 500, &mut rng), 500);
        }
    }

    #[test]
    fn test_count_is_bounded() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let tk = random_schedule(&mut rng);
        let oracle = CipherOracle::new(2, Differential::craft_six_round());
        let c = oracle.count_matches(&tk, 256, &mut rng);
        assert!(c <= 256);
    }

    #[test]
    fn test_nonzero_input_never_maps_to_zero_output() {
        // The cipher is a permutation, so distinct plaintexts never collide
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let tk = random_schedule(&mut rng);
        let d = Differential::new(Differential::craft_six_round().input, Block::ZERO);
        assert_eq!(CipherOracle::new(3, d).count_matches(&tk, 256, &mut rng), 0);
    }

    #[test]
    fn test_from_nibbles_rejects_wide_values() {
        let mut bad = [0u8; 16];
        bad[15] = 0x1F;
        assert!(Differential::from_nibbles([0; 16], bad).is_err());
        assert!(Differential::from_nibbles([0xF; 16], [0; 16]).is_ok());
    }
}
