//! SHA-512 as a block primitive
//!
//! The block function is `sha2::compress512` (the crate's `compress` hazmat
//! API). Padding follows FIPS 180-4: `0x80`, zeros, then the message length
//! in bits as a 128-bit big-endian integer in the last 16 bytes of a block.
//! The one-shot path delegates to `sha2::Sha512`.

use sha2::digest::generic_array::GenericArray;
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use crate::context::HashContext;
use crate::primitive::BlockPrimitive;

/// SHA-512 block size in bytes
pub const BLOCK_SIZE: usize = 128;

/// SHA-512 digest size in bytes
pub const DIGEST_SIZE: usize = 64;

/// Offset of the 128-bit length trailer inside the final block
const LENGTH_OFFSET: usize = BLOCK_SIZE - 16;

/// FIPS 180-4 §5.3.5 initial hash value
const IV: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

/// A 64-byte SHA-512 digest
pub type Sha512Digest = [u8; DIGEST_SIZE];

/// Streaming SHA-512 context
pub type Sha512Context = HashContext<Sha512Primitive>;

/// SHA-512 working state: chaining words plus the count of whole blocks absorbed.
#[derive(Clone, Default, Zeroize)]
#[repr(C)]
pub struct Sha512State {
    h: [u64; 8],
    blocks: u64,
}

impl Sha512State {
    /// Whole blocks absorbed since `init`.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }
}

/// SHA-512 block primitive.
#[derive(Debug, Clone, Copy)]
pub struct Sha512Primitive;

fn compress(h: &mut [u64; 8], block: &[u8]) {
    sha2::compress512(h, core::slice::from_ref(GenericArray::from_slice(block)));
}

impl BlockPrimitive for Sha512Primitive {
    const BLOCK_SIZE: usize = BLOCK_SIZE;
    const DIGEST_SIZE: usize = DIGEST_SIZE;

    type State = Sha512State;
    type Block = [u8; BLOCK_SIZE];
    type Digest = Sha512Digest;

    const EMPTY_BLOCK: Self::Block = [0u8; BLOCK_SIZE];
    const EMPTY_DIGEST: Self::Digest = [0u8; DIGEST_SIZE];

    fn init(state: &mut Sha512State) {
        state.h = IV;
        state.blocks = 0;
    }

    fn update_one(state: &mut Sha512State, block: &[u8; BLOCK_SIZE]) {
        compress(&mut state.h, block);
        state.blocks += 1;
    }

    fn update_many(state: &mut Sha512State, blocks: &[u8]) {
        debug_assert_eq!(blocks.len() % BLOCK_SIZE, 0);
        for block in blocks.chunks_exact(BLOCK_SIZE) {
            compress(&mut state.h, block);
        }
        state.blocks += (blocks.len() / BLOCK_SIZE) as u64;
    }

    fn finalize(state: &mut Sha512State, last_partial: &[u8]) {
        assert!(
            last_partial.len() <= BLOCK_SIZE,
            "trailing partial of {} bytes exceeds the {BLOCK_SIZE}-byte block",
            last_partial.len()
        );

        let mut tail = last_partial;
        if tail.len() == BLOCK_SIZE {
            compress(&mut state.h, tail);
            state.blocks += 1;
            tail = &[];
        }

        let bit_len = (u128::from(state.blocks) * BLOCK_SIZE as u128 + tail.len() as u128) * 8;

        let mut block = [0u8; BLOCK_SIZE];
        block[..tail.len()].copy_from_slice(tail);
        block[tail.len()] = 0x80;

        // No room for the length trailer: it spills into one more block.
        if tail.len() >= LENGTH_OFFSET {
            compress(&mut state.h, &block);
            block = [0u8; BLOCK_SIZE];
        }

        block[LENGTH_OFFSET..].copy_from_slice(&bit_len.to_be_bytes());
        compress(&mut state.h, &block);
        block.zeroize();
    }

    fn extract(state: &Sha512State, out: &mut Sha512Digest) {
        for (chunk, word) in out.chunks_exact_mut(8).zip(state.h.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
    }

    fn hash(input: &[u8]) -> Sha512Digest {
        let hash = Sha512::digest(input);
        let mut out = [0u8; DIGEST_SIZE];
        out.copy_from_slice(&hash);
        out
    }
}
