//! Block primitive contract
//!
//! A block primitive only ever sees whole blocks until finalization. The
//! streaming buffer in [`crate::context`] is the only caller; it guarantees
//! that `update_one` / `update_many` receive whole blocks in message order
//! and that `finalize` receives the trailing `0..=BLOCK_SIZE` bytes.

use std::fmt::Debug;
use zeroize::Zeroize;

/// A fixed-block, strictly sequential compression primitive.
///
/// Implementations own padding and length encoding; callers never pad.
pub trait BlockPrimitive {
    /// Native block size in bytes. Must equal `Self::Block`'s length.
    const BLOCK_SIZE: usize;
    /// Digest size in bytes. Must equal `Self::Digest`'s length.
    const DIGEST_SIZE: usize;

    /// Working state. `Default` is the all-zero state prior to `init`.
    type State: Clone + Default + Zeroize;
    /// One block, stored inline by the streaming buffer.
    type Block: AsRef<[u8]> + AsMut<[u8]> + Copy + Zeroize;
    /// Fixed-length digest output.
    type Digest: AsRef<[u8]> + AsMut<[u8]> + Copy + Eq + Debug;

    /// A zero-filled block.
    const EMPTY_BLOCK: Self::Block;
    /// A zero-filled digest, used as an output slot.
    const EMPTY_DIGEST: Self::Digest;

    /// Load the standard initial state.
    fn init(state: &mut Self::State);

    /// Absorb exactly one block.
    fn update_one(state: &mut Self::State, block: &Self::Block);

    /// Absorb `blocks.len() / BLOCK_SIZE` contiguous blocks in order.
    ///
    /// `blocks.len()` must be a multiple of `BLOCK_SIZE`. Equivalent to one
    /// `update_one` per block.
    ///
    /// The default copies each block into a scratch `Self::Block` because
    /// `update_one` takes the block type; primitives that can compress
    /// straight from a slice (see `Sha512Primitive`) should override it.
    fn update_many(state: &mut Self::State, blocks: &[u8]) {
        debug_assert_eq!(blocks.len() % Self::BLOCK_SIZE, 0);
        let mut block = Self::EMPTY_BLOCK;
        for chunk in blocks.chunks_exact(Self::BLOCK_SIZE) {
            block.as_mut().copy_from_slice(chunk);
            Self::update_one(state, &block);
        }
        block.zeroize();
    }

    /// Pad and absorb the trailing `0..=BLOCK_SIZE` bytes.
    fn finalize(state: &mut Self::State, last_partial: &[u8]);

    /// Copy the digest out of a finalized state.
    fn extract(state: &Self::State, out: &mut Self::Digest);

    /// Whole-message hash, independent of any context.
    fn hash(input: &[u8]) -> Self::Digest;
}
