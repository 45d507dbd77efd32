//! The cryptography capability trait.

use crate::error::{CryptoError, InvalidKeyError};

/// Anything that carries a DER-encoded `SubjectPublicKeyInfo`.
///
/// Implemented by attestation certificates so a provider can verify with
/// the certificate's key without knowing how the certificate was parsed.
pub trait PublicKeyInfo {
    /// The DER encoding of the `SubjectPublicKeyInfo`.
    fn subject_public_key_info(&self) -> &[u8];
}

/// ECDSA P-256 / SHA-256 verification, key decoding and hashing.
///
/// Decode and verify logic is generic over this trait, so a hardware-backed
/// or certified backend can replace [`crate::Es256Provider`] without touching
/// it. Implementations must be safe to share across threads.
pub trait CryptoProvider: Send + Sync {
    /// The provider's decoded public key.
    type PublicKey: Clone + std::fmt::Debug;

    /// Decode a 65-byte uncompressed P-256 point.
    ///
    /// # Errors
    ///
    /// Fails if the buffer is not 65 bytes, does not start with `0x04`, or
    /// the point is not on the curve.
    fn decode_public_key(&self, encoded: &[u8]) -> Result<Self::PublicKey, InvalidKeyError>;

    /// Extract a P-256 key from a DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedKey`] if the key is not P-256.
    fn public_key_from_spki(&self, spki_der: &[u8]) -> Result<Self::PublicKey, CryptoError>;

    /// Verify `signature` over `signed_data` with `key`.
    ///
    /// Returns `Ok(false)` when the signature is well formed but does not
    /// match.
    ///
    /// # Errors
    ///
    /// Fails if the signature encoding is malformed or the backend could not
    /// run the verification.
    fn verify_with_key(
        &self,
        key: &Self::PublicKey,
        signed_data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError>;

    /// Verify `signature` over `signed_data` with a certificate's public key.
    ///
    /// # Errors
    ///
    /// See [`Self::public_key_from_spki`] and [`Self::verify_with_key`].
    fn verify_with_certificate(
        &self,
        certificate: &dyn PublicKeyInfo,
        signed_data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        let key = self.public_key_from_spki(certificate.subject_public_key_info())?;
        self.verify_with_key(&key, signed_data, signature)
    }

    /// SHA-256 of `bytes`.
    fn hash(&self, bytes: &[u8]) -> [u8; 32];
}

impl<P: CryptoProvider + ?Sized> CryptoProvider for &P {
    type PublicKey = P::PublicKey;

    fn decode_public_key(&self, encoded: &[u8]) -> Result<Self::PublicKey, InvalidKeyError> {
        (**self).decode_public_key(encoded)
    }

    fn public_key_from_spki(&self, spki_der: &[u8]) -> Result<Self::PublicKey, CryptoError> {
        (**self).public_key_from_spki(spki_der)
    }

    fn verify_with_key(
        &self,
        key: &Self::PublicKey,
        signed_data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        (**self).verify_with_key(key, signed_data, signature)
    }

    fn verify_with_certificate(
        &self,
        certificate: &dyn PublicKeyInfo,
        signed_data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        (**self).verify_with_certificate(certificate, signed_data, signature)
    }

    fn hash(&self, bytes: &[u8]) -> [u8; 32] {
        (**self).hash(bytes)
    }
}
