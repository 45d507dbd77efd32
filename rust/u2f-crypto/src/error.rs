//! Error types for key decoding and signature verification.

use thiserror::Error;

/// Errors from [`crate::CryptoProvider::decode_public_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InvalidKeyError {
    /// The encoded key is not exactly one uncompressed point long.
    #[error("expected {expected} public key bytes, got {actual}")]
    Length {
        /// Required length.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// The first byte is not the uncompressed-point tag (`0x04`).
    #[error("public key is not an uncompressed point (tag {0:#04x})")]
    NotUncompressed(u8),

    /// The coordinates do not satisfy the P-256 curve equation.
    #[error("point is not on the P-256 curve")]
    NotOnCurve,
}

/// Errors from signature verification.
///
/// A verification that runs to completion and rejects the signature is
/// `Ok(false)`, never an error. The variants split into two tiers:
///
/// - [`MalformedSignature`](Self::MalformedSignature) and
///   [`UnsupportedKey`](Self::UnsupportedKey) describe untrusted input that
///   cannot be fed to ECDSA P-256 at all.
/// - [`Unavailable`](Self::Unavailable) and [`Internal`](Self::Internal)
///   mean the backend itself is broken. See [`CryptoError::is_fatal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The signature bytes are not a valid DER-encoded ECDSA signature.
    #[error("malformed signature encoding: {0}")]
    MalformedSignature(String),

    /// The certificate does not carry a P-256 public key.
    #[error("unsupported attestation key: {0}")]
    UnsupportedKey(String),

    /// The backend failed its self-test or is missing a required algorithm.
    #[error("cryptography backend unavailable: {0}")]
    Unavailable(String),

    /// The backend faulted while verifying.
    #[error("cryptography backend fault: {0}")]
    Internal(String),
}

impl CryptoError {
    /// Whether this error reports a broken environment rather than bad input.
    ///
    /// Callers must not treat a fatal error as a rejected signature.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Internal(_))
    }
}
