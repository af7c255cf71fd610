//! Tweakey schedule
//! ================
//! CRAFT has no key-schedule state: the four round subkeys are the two key
//! halves XORed with the tweak, once as-is and once permuted by `Q`. Rounds
//! cycle through the slots, round `r` uses slot `r mod 4`.
//!
//! The decryption direction wants `MixColumn(TK)` instead of `TK` (the linear
//! layer commutes with the subkey XOR), so every schedule can also emit its
//! decryption-oriented companion.

use rand::Rng;
use serde::Serialize;

use crate::block::Block;
use crate::cipher::mix_columns;
use crate::constants::Q;

/// Public per-encryption tweak.
pub type Tweak = Block;

/// Secret 128-bit key, split into its two 64-bit halves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MasterKey {
    pub key0: Block,
    pub key1: Block,
}

impl MasterKey {
    pub fn new(key0: Block, key1: Block) -> Self {
        MasterKey { key0, key1 }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let key0 = Block::random(rng);
        let key1 = Block::random(rng);
        MasterKey { key0, key1 }
    }
}

/// How round subkeys are produced for each bunch of queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyModel {
    /// CRAFT tweakey schedule from the trial's master key and a fresh tweak.
    #[default]
    Tweakey,
    /// One uniformly random subkey per round, ignoring the master key.
    IndependentSubkeys,
}

/// Round subkeys used by [`crate::cipher::encrypt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TweakeySchedule {
    slots: Vec<Block>,
}

impl TweakeySchedule {
    /// TK0 = K0 ^ T, TK1 = K1 ^ T, TK2 = K0 ^ Q(T), TK3 = K1 ^ Q(T).
    pub fn derive(key: &MasterKey, tweak: &Tweak) -> Self {
        let permuted = tweak.gather(&Q);
        let slots = vec![
            key.key0 ^ *tweak,
            key.key1 ^ *tweak,
            key.key0 ^ permuted,
            key.key1 ^ permuted,
        ];
        TweakeySchedule { slots }
    }

    /// `rounds` independent random subkeys (at least one).
    pub fn independent<R: Rng + ?Sized>(rounds: usize, rng: &mut R) -> Self {
        let slots = (0..rounds.max(1)).map(|_| Block::random(rng)).collect();
        TweakeySchedule { slots }
    }

    /// Draws a schedule under `model` for a single bunch.
    pub fn sample<R: Rng + ?Sized>(
        model: KeyModel,
        key: &MasterKey,
        rounds: usize,
        rng: &mut R,
    ) -> Self {
        match model {
            KeyModel::Tweakey => {
                let tweak = Block::random(rng);
                Self::derive(key, &tweak)
            }
            KeyModel::IndependentSubkeys => Self::independent(rounds, rng),
        }
    }

    /// Subkey XORed in at round `r`.
    #[inline(always)]
    pub fn subkey(&self, r: usize) -> &Block {
        &self.slots[r % self.slots.len()]
    }

    pub fn slots(&self) -> &[Block] {
        &self.slots
    }

    /// Companion schedule for [`crate::cipher::decrypt`]: each slot passed
    /// through the MixColumn layer.
    pub fn decryption_schedule(&self) -> DecryptionSchedule {
        DecryptionSchedule {
            slots: self.slots.iter().map(mix_columns).collect(),
        }
    }

    /// Number of distinct slots; 4 for the CRAFT schedule.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// MixColumn-transformed subkeys, consumed by decryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptionSchedule {
    slots: Vec<Block>,
}

impl DecryptionSchedule {
    #[inline(always)]
    pub fn subkey(&self, r: usize) -> &Block {
        &self.slots[r % self.slots.len()]
    }

    pub fn slots(&self) -> &[Block] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TWEAKEY_SLOTS;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn counting_block(offset: u8) -> Block {
        Block::from_masked(core::array::from_fn(|i| i as u8 + offset))
    }

    #[test]
    fn test_derive_follows_craft_rule() {
        let key = MasterKey::new(counting_block(0), counting_block(3));
        let tweak = counting_block(9);
        let tk = TweakeySchedule::derive(&key, &tweak);
        assert_eq!(tk.len(), TWEAKEY_SLOTS);

        for i in 0..16 {
            assert_eq!(tk.slots()[0][i], key.key0[i] ^ tweak[i]);
            assert_eq!(tk.slots()[1][i], key.key1[i] ^ tweak[i]);
            assert_eq!(tk.slots()[2][i], key.key0[i] ^ tweak[Q[i]]);
            assert_eq!(tk.slots()[3][i], key.key1[i] ^ tweak[Q[i]]);
        }
        assert_eq!(tk.subkey(5), &tk.slots()[1]);
    }

    #[test]
    fn test_decryption_schedule_mixes_each_slot() {
        let key = MasterKey::new(counting_block(1), counting_block(2));
        let tk = TweakeySchedule::derive(&key, &counting_block(5));
        let dec = tk.decryption_schedule();
        for (enc, dec) in tk.slots().iter().zip(dec.slots()) {
            for i in 0..4 {
                assert_eq!(dec[i], enc[i] ^ enc[i + 8] ^ enc[i + 12]);
                assert_eq!(dec[i + 4], enc[i + 4] ^ enc[i + 12]);
                assert_eq!(dec[i + 8], enc[i + 8]);
                assert_eq!(dec[i + 12], enc[i + 12]);
            }
        }
    }

    #[test]
    fn test_schedules_stay_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(0xC0FFEE);
        let key = MasterKey::random(&mut rng);
        for model in [KeyModel::Tweakey, KeyModel::IndependentSubkeys] {
            let tk = TweakeySchedule::sample(model, &key, 6, &mut rng);
            let dec = tk.decryption_schedule();
            for b in tk.slots().iter().chain(dec.slots()) {
                assert!(b.nibbles().iter().all(|&v| v <= 0xF));
            }
        }
    }

    #[test]
    fn test_independent_subkeys_one_per_round() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(TweakeySchedule::independent(9, &mut rng).len(), 9);
        assert_eq!(TweakeySchedule::independent(0, &mut rng).len(), 1);
    }
}
