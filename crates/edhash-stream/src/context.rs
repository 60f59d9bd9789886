//! Streaming block buffer
//!
//! Callers feed a message in chunks of any size; the context keeps at most
//! one partial block (`leftover` bytes in `buffer`) and submits everything
//! else to the primitive as whole blocks, in order. Memory is one block plus
//! the primitive's state regardless of message length.
//!
//! Lifecycle misuse is designed out: a context is initialized on
//! construction, `finalize` consumes it, and `finalize_reset` /
//! `finalize_into` leave it freshly initialized.

use std::fmt;
use std::io::{self, Read};
use std::time::Instant;

use edhash_core::{EdhashError, EdhashResult};
use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::primitive::BlockPrimitive;

/// Incremental hash context over a fixed-block primitive `P`.
///
/// Invariant between calls: `leftover < P::BLOCK_SIZE`, and the blocks
/// submitted to `state` followed by `buffer[..leftover]` are exactly the
/// bytes absorbed since the last `init`.
#[repr(C)]
pub struct HashContext<P: BlockPrimitive> {
    state: P::State,
    buffer: P::Block,
    leftover: usize,
}

impl<P: BlockPrimitive> HashContext<P> {
    /// A freshly initialized context.
    pub fn new() -> Self {
        let mut ctx = Self {
            state: P::State::default(),
            buffer: P::EMPTY_BLOCK,
            leftover: 0,
        };
        ctx.init();
        ctx
    }

    /// Reset to the initial state, discarding anything absorbed so far.
    pub fn init(&mut self) {
        self.state.zeroize();
        P::init(&mut self.state);
        self.buffer.zeroize();
        self.leftover = 0;
    }

    /// Absorb `input`. Zero-length input is a no-op.
    pub fn update(&mut self, input: &[u8]) {
        let leftover = self.leftover;
        let combined = leftover + input.len();

        if combined < P::BLOCK_SIZE {
            self.buffer.as_mut()[leftover..combined].copy_from_slice(input);
            self.leftover = combined;
            return;
        }

        // Complete the buffered partial block first.
        let (fill, rest) = input.split_at(P::BLOCK_SIZE - leftover);
        self.buffer.as_mut()[leftover..].copy_from_slice(fill);
        P::update_one(&mut self.state, &self.buffer);

        // Whole blocks go straight from the caller's slice; the tail is buffered.
        let full_blocks = rest.len() / P::BLOCK_SIZE;
        let (blocks, tail) = rest.split_at(full_blocks * P::BLOCK_SIZE);
        if !blocks.is_empty() {
            P::update_many(&mut self.state, blocks);
        }

        self.buffer.as_mut()[..tail.len()].copy_from_slice(tail);
        self.leftover = tail.len();

        trace!(
            input_len = input.len(),
            blocks = 1 + full_blocks,
            leftover = self.leftover,
            "submitted whole blocks"
        );
    }

    /// Write the digest into `out`, then re-initialize.
    pub fn finalize_into(&mut self, out: &mut P::Digest) {
        trace!(trailing = self.leftover, "finalizing");
        P::finalize(&mut self.state, &self.buffer.as_ref()[..self.leftover]);
        self.leftover = 0;
        P::extract(&self.state, out);
        self.init();
    }

    /// Like [`finalize_into`](Self::finalize_into) for a caller-sized slice.
    ///
    /// Fails without touching the context when `out` is not exactly
    /// `P::DIGEST_SIZE` bytes.
    pub fn finalize_into_slice(&mut self, out: &mut [u8]) -> EdhashResult<()> {
        if out.len() != P::DIGEST_SIZE {
            return Err(EdhashError::DigestLength {
                expected: P::DIGEST_SIZE,
                actual: out.len(),
            });
        }
        let mut digest = P::EMPTY_DIGEST;
        self.finalize_into(&mut digest);
        out.copy_from_slice(digest.as_ref());
        Ok(())
    }

    /// Produce the digest and leave the context ready for a new message.
    pub fn finalize_reset(&mut self) -> P::Digest {
        let mut digest = P::EMPTY_DIGEST;
        self.finalize_into(&mut digest);
        digest
    }

    /// Produce the digest, consuming the context.
    pub fn finalize(mut self) -> P::Digest {
        self.finalize_reset()
    }

    /// One-shot hash via the primitive's own entry point.
    pub fn hash(input: &[u8]) -> P::Digest {
        P::hash(input)
    }

    /// Bytes currently buffered (always `< P::BLOCK_SIZE`).
    pub fn buffered_len(&self) -> usize {
        self.leftover
    }

    /// Read `reader` to EOF through a `read_buffer_size` buffer, absorbing
    /// every byte. Returns the number of bytes absorbed.
    pub fn absorb_reader<R: Read>(
        &mut self,
        mut reader: R,
        read_buffer_size: usize,
    ) -> EdhashResult<u64> {
        if read_buffer_size == 0 {
            return Err(EdhashError::Config(
                "read buffer size must be greater than zero".into(),
            ));
        }

        let started = Instant::now();
        let mut buf = vec![0u8; read_buffer_size];
        let mut total = 0u64;

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.update(&buf[..n]);
            total += n as u64;
        }
        buf.zeroize();

        debug!(
            bytes = total,
            elapsed_us = started.elapsed().as_micros() as u64,
            "absorbed reader"
        );
        Ok(total)
    }
}

impl<P: BlockPrimitive> Default for HashContext<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: BlockPrimitive> Clone for HashContext<P> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            buffer: self.buffer,
            leftover: self.leftover,
        }
    }
}

impl<P: BlockPrimitive> Drop for HashContext<P> {
    fn drop(&mut self) {
        self.state.zeroize();
        self.buffer.zeroize();
    }
}

impl<P: BlockPrimitive> fmt::Debug for HashContext<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashContext")
            .field("block_size", &P::BLOCK_SIZE)
            .field("leftover", &self.leftover)
            .field("buffer", &"[REDACTED]")
            .finish()
    }
}

impl<P: BlockPrimitive> io::Write for HashContext<P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
