//! Error types for registration response decoding and construction.

use crate::certificate::CertificateError;
use thiserror::Error;

/// A field of the registration wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The reserved byte that opens the message.
    Marker,
    /// The uncompressed user public key.
    UserPublicKey,
    /// The one-byte key handle length prefix.
    KeyHandleLength,
    /// The key handle itself.
    KeyHandle,
    /// The DER attestation certificate.
    Certificate,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Marker => "reserved byte",
            Self::UserPublicKey => "user public key",
            Self::KeyHandleLength => "key handle length",
            Self::KeyHandle => "key handle",
            Self::Certificate => "attestation certificate",
        })
    }
}

/// Errors from decoding a registration response.
///
/// All of these describe bad input. They are expected for untrusted data and
/// never indicate a fault in the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The reserved byte is not [`crate::REGISTRATION_MARKER`].
    #[error("incorrect reserved byte: expected {expected:#04x}, got {0:#04x}", expected = crate::REGISTRATION_MARKER)]
    InvalidMarker(u8),

    /// The message ended inside a field.
    #[error(
        "truncated registration data: {field} at offset {offset} needs {needed} bytes, {available} available"
    )]
    Truncated {
        /// The field being read.
        field: Field,
        /// Offset of the field's first byte.
        offset: usize,
        /// Bytes the field requires.
        needed: usize,
        /// Bytes left in the message.
        available: usize,
    },

    /// The attestation certificate could not be parsed.
    #[error("malformed attestation certificate")]
    MalformedCertificate(#[source] CertificateError),

    /// The transport encoding is not valid URL-safe base64.
    #[cfg(feature = "base64")]
    #[error("invalid base64 registration data: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Errors from constructing a [`crate::RegistrationResponse`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ResponseError {
    /// The key handle does not fit the one-byte length prefix.
    #[error("key handle is {0} bytes, at most {max} allowed", max = crate::MAX_KEY_HANDLE_LEN)]
    KeyHandleTooLong(usize),
}
