use thiserror::Error;

/// Status codes returned by the fallible C entry points.
///
/// The four hashing hooks return `void`; misuse there aborts instead.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 0,
    AlreadyInitialized = 1,
    InvalidArg = 2,
    Config = 3,
}

impl StatusCode {
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<StatusCode> for i32 {
    fn from(code: StatusCode) -> Self {
        code.code()
    }
}

pub const EDHASH_OK: i32 = StatusCode::Ok.code();
pub const EDHASH_ERR_ALREADY_INITIALIZED: i32 = StatusCode::AlreadyInitialized.code();
pub const EDHASH_ERR_INVALID_ARG: i32 = StatusCode::InvalidArg.code();
pub const EDHASH_ERR_CONFIG: i32 = StatusCode::Config.code();

/// Misuse of the hashing hooks. Each one aborts the process at the C boundary.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("null context")]
    NullContext,
    #[error("null digest output")]
    NullDigest,
    #[error("null input with non-zero length")]
    NullInput,
    #[error("context used before ed25519_hash_init")]
    Uninitialized,
}
