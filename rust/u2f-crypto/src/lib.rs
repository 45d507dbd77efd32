//! Cryptography capability for U2F attestation verification.
//!
//! Decoding and verifying a registration response never touches elliptic
//! curve arithmetic directly. Instead every call site accepts a
//! [`CryptoProvider`], which supplies:
//!
//! - decoding of uncompressed P-256 public keys,
//! - ECDSA P-256 / SHA-256 signature verification (against a bare key or
//!   the public key of a certificate),
//! - SHA-256 hashing for callers that compute `appIdHash` and
//!   `clientDataHash`.
//!
//! The `es256` feature (on by default) provides [`Es256Provider`], backed by
//! the RustCrypto `p256` and `sha2` crates, and the process-wide [`init`]
//! entry point that self-tests it once.

mod error;
mod provider;

#[cfg(feature = "es256")]
mod backend;
#[cfg(feature = "es256")]
mod es256;

pub use error::{CryptoError, InvalidKeyError};
pub use provider::{CryptoProvider, PublicKeyInfo};

#[cfg(feature = "es256")]
pub use backend::init;
#[cfg(feature = "es256")]
pub use es256::Es256Provider;

/// Length of an uncompressed SEC1 P-256 point: tag, X and Y.
pub const UNCOMPRESSED_POINT_LEN: usize = 65;

/// SEC1 tag byte of an uncompressed point.
pub const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// Length of a SHA-256 digest.
pub const SHA256_LEN: usize = 32;
