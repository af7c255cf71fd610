//! CRAFT round function
//! ====================
//! 64-bit state = 16 nibbles, viewed as a 4x4 matrix in row-major order.
//! One encryption round is:
//!
//! MixColumn -> AddConstant -> AddTweakey -> PermuteNibbles -> SubBox
//!
//! Every layer except AddConstant/AddTweakey is an involution, which makes
//! decryption the same layers in a different order (see [`decrypt`]).
//! Round counts are unbounded: the constants repeat with their LFSR periods.

use crate::block::Block;
use crate::constants::{round_constants, NIBBLES, P, SBOX};
use crate::tweakey::{DecryptionSchedule, TweakeySchedule};

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// Column mixing: rows 0 and 1 absorb rows 2 and 3. Involution.
#[inline(always)]
pub fn mix_columns(state: &Block) -> Block {
    let mut out = *state;
    for i in 0..4 {
        out.set(i, state[i] ^ state[i + 8] ^ state[i + 12]);
        out.set(i + 4, state[i + 4] ^ state[i + 12]);
    }
    out
}

#[inline(always)]
fn add_constants(state: &mut Block, r: usize) {
    let (rc4, rc3) = round_constants(r);
    state.set(4, state[4] ^ rc4);
    state.set(5, state[5] ^ rc3);
}

#[inline(always)]
fn sub_nibbles(state: &Block) -> Block {
    let mut out = *state;
    for i in 0..NIBBLES {
        out.set(i, SBOX[state[i] as usize]);
    }
    out
}

// ---------------------------------------------------------------------------
// Public cipher API
// ---------------------------------------------------------------------------

/// Encrypts `plaintext` with `rounds` full CRAFT rounds under `tk`.
///
/// `rounds == 0` returns the plaintext unchanged. Total over all inputs.
pub fn encrypt(rounds: usize, plaintext: &Block, tk: &TweakeySchedule) -> Block {
    let mut state = *plaintext;
    for r in 0..rounds {
        state = mix_columns(&state);
        add_constants(&mut state, r);
        state ^= *tk.subkey(r);
        state = sub_nibbles(&state.scatter(&P));
    }
    state
}

/// Inverts [`encrypt`] using the MixColumn-transformed subkeys.
///
/// Since `MC(x ^ k) = MC(x) ^ MC(k)` and `MC` leaves the constant nibbles
/// untouched, each inverse round is SubBox, PermuteNibbles, MixColumn, then
/// the constant and the decryption subkey.
pub fn decrypt(rounds: usize, ciphertext: &Block, tk: &DecryptionSchedule) -> Block {
    let mut state = *ciphertext;
    for r in (0..rounds).rev() {
        state = mix_columns(&sub_nibbles(&state).scatter(&P));
        add_constants(&mut state, r);
        state ^= *tk.subkey(r);
    }
    state
}
