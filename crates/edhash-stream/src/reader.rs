//! SHA-512 hashing for byte slices, readers, and files
//!
//! Readers and files are streamed through a `Sha512Context` with a fixed
//! read buffer, so memory stays constant however large the input is.

use anyhow::Context;
use std::io::Read;
use std::path::Path;

use edhash_core::{EdhashError, EdhashResult, StreamConfig};

use crate::sha512::{Sha512Context, Sha512Digest, DIGEST_SIZE};

/// Hash a byte slice in memory.
pub fn hash_bytes(data: &[u8]) -> Sha512Digest {
    Sha512Context::hash(data)
}

/// Hash everything `reader` yields, reading `read_buffer_size` bytes at a time.
pub fn hash_reader<R: Read>(reader: R, read_buffer_size: usize) -> EdhashResult<Sha512Digest> {
    let mut ctx = Sha512Context::new();
    ctx.absorb_reader(reader, read_buffer_size)?;
    Ok(ctx.finalize())
}

/// Hash a file from disk using the configured read buffer.
pub fn hash_file(path: &Path, config: &StreamConfig) -> EdhashResult<Sha512Digest> {
    config.validate()?;

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening file for streaming hash: {}", path.display()))?;

    let mut ctx = Sha512Context::new();
    let bytes = ctx
        .absorb_reader(file, config.read_buffer_size)
        .map_err(|e| match e {
            EdhashError::Io(io) => anyhow::Error::new(io)
                .context(format!("reading for hash: {}", path.display()))
                .into(),
            other => other,
        })?;

    tracing::debug!(path = %path.display(), bytes, "hashed file");
    Ok(ctx.finalize())
}

/// Format a digest as lowercase hex (128 chars for SHA-512)
pub fn digest_to_hex(digest: &Sha512Digest) -> String {
    hex::encode(digest)
}

/// Parse a 128-char hex string into a digest
pub fn digest_from_hex(s: &str) -> EdhashResult<Sha512Digest> {
    let bytes = hex::decode(s).map_err(|e| EdhashError::InvalidHex(format!("'{s}': {e}")))?;
    if bytes.len() != DIGEST_SIZE {
        return Err(EdhashError::DigestLength {
            expected: DIGEST_SIZE,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; DIGEST_SIZE];
    out.copy_from_slice(&bytes);
    Ok(out)
}
