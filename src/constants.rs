//! CRAFT constant tables
//! =====================
//! S-box, nibble permutation `P`, tweak permutation `Q` and the two round
//! constant sequences, as published by the CRAFT designers;
//! *changing any table changes the cipher*.

/// Number of nibbles in a CRAFT state (64 bits).
pub const NIBBLES: usize = 16;

/// Number of tweakey slots cycled through by the encryption rounds.
pub const TWEAKEY_SLOTS: usize = 4;

/// CRAFT 4-bit S-box (an involution: `SBOX[SBOX[x]] == x`).
/// #        0    1    2    3    4    5    6    7    8    9    a    b    c    d    e    f
pub const SBOX: [u8; 16] = [
    0xC, 0xA, 0xD, 0x3, 0xE, 0xB, 0xF, 0x7, 0x8, 0x9, 0x1, 0x5, 0x0, 0x2, 0x4, 0x6,
];

/// Nibble permutation: nibble at index `i` moves to position `P[i]`.
pub const P: [usize; NIBBLES] = [
    0xF, 0xC, 0xD, 0xE, 0xA, 0x9, 0x8, 0xB, 0x6, 0x5, 0x4, 0x7, 0x1, 0x2, 0x3, 0x0,
];

/// Tweak permutation used for the odd tweakey slots: slot nibble `i` takes
/// `tweak[Q[i]]`.
pub const Q: [usize; NIBBLES] = [
    0xC, 0xA, 0xF, 0x5, 0xE, 0x8, 0x9, 0x2, 0xB, 0x3, 0x7, 0x4, 0x6, 0x0, 0x1, 0xD,
];

/// Period of the 3-bit round-constant LFSR.
pub const RC3_PERIOD: usize = 7;

/// Period of the 4-bit round-constant LFSR.
pub const RC4_PERIOD: usize = 15;

/// 3-bit round constants, XORed into nibble 5. Right-shift LFSR seeded with 1,
/// feedback = bit0 ^ bit1 inserted at bit 2.
pub const RC3: [u8; RC3_PERIOD] = {
    let mut rc = [0u8; RC3_PERIOD];
    let mut state = 1u8;
    let mut i = 0;
    while i < RC3_PERIOD {
        rc[i] = state;
        let bit = (state ^ (state >> 1)) & 1;
        state = (state >> 1) | (bit << 2);
        i += 1;
    }
    rc
};

/// 4-bit round constants, XORed into nibble 4. Right-shift LFSR seeded with 1,
/// feedback = bit0 ^ bit1 inserted at bit 3.
pub const RC4: [u8; RC4_PERIOD] = {
    let mut rc = [0u8; RC4_PERIOD];
    let mut state = 1u8;
    let mut i = 0;
    while i < RC4_PERIOD {
        rc[i] = state;
        let bit = (state ^ (state >> 1)) & 1;
        state = (state >> 1) | (bit << 3);
        i += 1;
    }
    rc
};

/// Round constants `(rc4, rc3)` injected at round `r`.
#[inline(always)]
pub fn round_constants(r: usize) -> (u8, u8) {
    (RC4[r % RC4_PERIOD], RC3[r % RC3_PERIOD])
}
