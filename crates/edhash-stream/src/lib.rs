//! edhash-stream: incremental hashing over a fixed-block compression primitive
//!
//! # Overview
//! - `primitive`: the four-operation block primitive contract (`BlockPrimitive`)
//! - `sha512`: SHA-512 as a block primitive (128-byte blocks, 64-byte digest)
//! - `context`: `HashContext`, the streaming block buffer that accepts
//!   arbitrarily sized chunks and submits only whole blocks
//! - `reader`: hashing readers and files through a fixed read buffer, hex helpers
//!
//! Chunking is observationally transparent: any partition of a message fed
//! through `HashContext::update` yields the digest of the whole message.

pub mod context;
pub mod primitive;
pub mod reader;
pub mod sha512;

// Convenience re-exports for the most common operations
pub use context::HashContext;
pub use primitive::BlockPrimitive;
pub use reader::{digest_from_hex, digest_to_hex, hash_bytes, hash_file, hash_reader};
pub use sha512::{Sha512Context, Sha512Digest, Sha512Primitive, Sha512State};
