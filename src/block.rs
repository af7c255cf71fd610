//! 64-bit CRAFT state as 16 nibbles.

use std::fmt;
use std::ops::{BitXor, BitXorAssign, Index};
use std::str::FromStr;

use rand::Rng;
use serde::{Serialize, Serializer};

use crate::constants::NIBBLES;
use crate::error::{Error, Result};

/// Sixteen 4-bit values. Every constructor and every write masks to 4 bits,
/// so an element can never leave `[0, 15]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Block([u8; NIBBLES]);

#[inline(always)]
fn nib(x: u8) -> u8 {
    x & 0xF
}

impl Block {
    pub const ZERO: Block = Block([0; NIBBLES]);

    /// Builds a block, masking each value to its low 4 bits.
    pub fn from_masked(values: [u8; NIBBLES]) -> Self {
        Block(values.map(nib))
    }

    /// Builds a block, rejecting any value above `0xF`.
    pub fn new(values: [u8; NIBBLES]) -> Result<Self> {
        if let Some((position, &value)) = values.iter().enumerate().find(|&(_, &v)| v > 0xF) {
            return Err(Error::NibbleOutOfRange { position, value });
        }
        Ok(Block(values))
    }

    /// 16 uniformly random nibbles.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut values = [0u8; NIBBLES];
        for v in values.iter_mut() {
            *v = rng.gen_range(0..16);
        }
        Block(values)
    }

    #[inline(always)]
    pub fn nibbles(&self) -> &[u8; NIBBLES] {
        &self.0
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, value: u8) {
        self.0[i] = nib(value);
    }

    /// Block with nibble `i` taken from `self[perm[i]]`.
    pub fn gather(&self, perm: &[usize; NIBBLES]) -> Self {
        let mut out = [0u8; NIBBLES];
        for (dst, &src) in out.iter_mut().zip(perm.iter()) {
            *dst = self.0[src];
        }
        Block(out)
    }

    /// Block with nibble `i` moved to position `perm[i]`.
    pub fn scatter(&self, perm: &[usize; NIBBLES]) -> Self {
        let mut out = [0u8; NIBBLES];
        for (i, &dst) in perm.iter().enumerate() {
            out[dst] = self.0[i];
        }
        Block(out)
    }

    /// One hex digit per nibble, nibble 0 first.
    pub fn to_hex(&self) -> String {
        let packed: Vec<u8> = self.0.chunks(2).map(|p| (p[0] << 4) | p[1]).collect();
        hex::encode_upper(packed)
    }

    /// Parses 16 hex digits, nibble 0 first (`0x` prefix optional).
    pub fn from_hex(text: &str) -> Result<Self> {
        let digits = text.trim().trim_start_matches("0x");
        if digits.len() != NIBBLES {
            return Err(Error::InvalidHex(format!(
                "expected {} hex digits, got {} in {:?}",
                NIBBLES,
                digits.len(),
                text
            )));
        }
        let packed = hex::decode(digits).map_err(|e| Error::InvalidHex(e.to_string()))?;
        let mut values = [0u8; NIBBLES];
        for (i, byte) in packed.iter().enumerate() {
            values[2 * i] = byte >> 4;
            values[2 * i + 1] = byte & 0xF;
        }
        Ok(Block(values))
    }
}

impl Index<usize> for Block {
    type Output = u8;

    #[inline(always)]
    fn index(&self, i: usize) -> &u8 {
        &self.0[i]
    }
}

impl BitXor for Block {
    type Output = Block;

    #[inline(always)]
    fn bitxor(mut self, rhs: Block) -> Block {
        self ^= rhs;
        self
    }
}

impl BitXorAssign for Block {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: Block) {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a ^= b;
        }
    }
}

impl FromStr for Block {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Block::from_hex(s)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.to_hex())
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_masking_and_validation() {
        let b = Block::from_masked([0xFF; NIBBLES]);
        assert!(b.nibbles().iter().all(|&v| v == 0xF));

        let mut raw = [0u8; NIBBLES];
        raw[7] = 0x10;
        match Block::new(raw) {
            Err(Error::NibbleOutOfRange { position, value }) => {
                assert_eq!((position, value), (7, 0x10));
            }
            other => panic!("expected NibbleOutOfRange, got {:?}", other),
        }

        let mut b = Block::ZERO;
        b.set(3, 0xAB);
        assert_eq!(b[3], 0xB);
    }

    #[test]
    fn test_hex_text_form() {
        let b: Block = "AA000A00A00A0A00".parse().unwrap();
        assert_eq!(
            b.nibbles(),
            &[0xA, 0xA, 0, 0, 0, 0xA, 0, 0, 0xA, 0, 0, 0xA, 0, 0xA, 0, 0]
        );
        assert_eq!(b.to_string(), "AA000A00A00A0A00");
        assert_eq!(Block::from_hex("0xaa000a00a00a0a00").unwrap(), b);
        assert!(Block::from_hex("AA00").is_err());
        assert!(Block::from_hex("AA000A00A00A0AZZ").is_err());
    }

    #[test]
    fn test_random_block_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..256 {
            let b = Block::random(&mut rng);
            assert!(b.nibbles().iter().all(|&v| v <= 0xF));
        }
    }

    #[test]
    fn test_scatter_inverts_gather() {
        let perm = crate::constants::Q;
        let b = Block::from_masked(core::array::from_fn(|i| i as u8));
        assert_eq!(b.gather(&perm).scatter(&perm), b);
    }
}
