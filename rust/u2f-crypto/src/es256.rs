//! ECDSA P-256 / SHA-256 provider backed by RustCrypto.

use crate::{
    CryptoError, CryptoProvider, InvalidKeyError, SHA256_LEN, UNCOMPRESSED_POINT_LEN,
    UNCOMPRESSED_POINT_TAG,
};
use p256::{
    ecdsa::{DerSignature, VerifyingKey, signature::Verifier as _},
    elliptic_curve::sec1::ToEncodedPoint as _,
    pkcs8::DecodePublicKey as _,
};
use sha2::{Digest, Sha256};

/// The default [`CryptoProvider`].
///
/// Signatures are expected in ASN.1 DER, as U2F authenticators emit them.
/// Prefer [`crate::init`] over constructing this directly so the backend is
/// self-tested once per process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Es256Provider;

impl CryptoProvider for Es256Provider {
    type PublicKey = VerifyingKey;

    fn decode_public_key(&self, encoded: &[u8]) -> Result<VerifyingKey, InvalidKeyError> {
        if encoded.len() != UNCOMPRESSED_POINT_LEN {
            return Err(InvalidKeyError::Length {
                expected: UNCOMPRESSED_POINT_LEN,
                actual: encoded.len(),
            });
        }
        if encoded[0] != UNCOMPRESSED_POINT_TAG {
            return Err(InvalidKeyError::NotUncompressed(encoded[0]));
        }

        VerifyingKey::from_sec1_bytes(encoded).map_err(|_| InvalidKeyError::NotOnCurve)
    }

    fn public_key_from_spki(&self, spki_der: &[u8]) -> Result<VerifyingKey, CryptoError> {
        let key = p256::PublicKey::from_public_key_der(spki_der)
            .map_err(|e| CryptoError::UnsupportedKey(e.to_string()))?;
        let point = key.to_encoded_point(false);
        VerifyingKey::from_sec1_bytes(point.as_bytes())
            .map_err(|e| CryptoError::Internal(format!("re-encoding P-256 key: {e}")))
    }

    fn verify_with_key(
        &self,
        key: &VerifyingKey,
        signed_data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        let signature = DerSignature::from_bytes(signature)
            .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
        Ok(key.verify(signed_data, &signature).is_ok())
    }

    fn hash(&self, bytes: &[u8]) -> [u8; 32] {
        let digest = Sha256::digest(bytes);
        let mut out = [0u8; SHA256_LEN];
        out.copy_from_slice(&digest);
        out
    }
}
