//! U2F registration response decoding and attestation verification.
//!
//! An authenticator answers a U2F (CTAP1) registration request with a
//! binary message:
//!
//! ```text
//! 0x05 | user public key (65) | key handle length (1) | key handle
//!      | attestation certificate (DER) | signature (rest)
//! ```
//!
//! [`RegistrationResponse::decode`] parses that message field by field and
//! fails fast with a [`DecodeError`] on the first structural violation.
//! [`RegistrationResponse::verify_signature`] then rebuilds the bytes the
//! authenticator signed,
//!
//! ```text
//! 0x00 | appIdHash (32) | clientDataHash (32) | key handle | user public key
//! ```
//!
//! and checks the attestation signature over them with any
//! [`CryptoProvider`](u2f_crypto::CryptoProvider).
//!
//! ```ignore
//! let provider = u2f_crypto::init()?;
//! let response = RegistrationResponse::from_base64(&registration_data)?;
//! if !response.verify_signature(provider, &app_id_hash, &client_data_hash)? {
//!     return Err(Rejected);
//! }
//! ```
//!
//! Certificate chain trust, challenge and origin checks belong to the caller.

mod certificate;
mod error;
mod reader;
mod response;

pub use certificate::{AttestationCertificate, CertificateError, CertificateParser};
#[cfg(feature = "x509")]
pub use certificate::X509CertificateParser;
pub use error::{DecodeError, Field, ResponseError};
pub use response::{
    MAX_KEY_HANDLE_LEN, REGISTRATION_MARKER, RegistrationResponse, SIGNED_DATA_MARKER,
    USER_PUBLIC_KEY_LEN, signed_data,
};
