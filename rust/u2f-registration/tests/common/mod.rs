//! Shared fixtures for the registration integration tests.
//!
//! Real authenticators sign with the private key behind their attestation
//! certificate. These helpers mint a self-signed P-256 certificate with
//! `rcgen`, keep its signing key, and assemble registration messages the
//! way a token would.

#![allow(dead_code)]

use p256::{
    ecdsa::{DerSignature, SigningKey, signature::Signer as _},
    elliptic_curve::sec1::ToEncodedPoint as _,
    pkcs8::DecodePrivateKey as _,
};
use u2f_crypto::{CryptoProvider as _, Es256Provider};
use u2f_registration::{REGISTRATION_MARKER, signed_data};

/// A stand-in authenticator: attestation certificate, attestation key and
/// one freshly generated credential.
pub struct Token {
    pub certificate_der: Vec<u8>,
    pub attestation_key: SigningKey,
    pub user_public_key: [u8; 65],
    pub key_handle: Vec<u8>,
}

impl Token {
    pub fn new(key_handle: &[u8]) -> Self {
        let certified =
            rcgen::generate_simple_self_signed(["u2f-token.example".to_string()]).unwrap();
        let certificate_der = certified.cert.der().to_vec();
        let attestation_key =
            SigningKey::from_pkcs8_der(&certified.key_pair.serialize_der()).unwrap();

        let credential_key = SigningKey::from_bytes(&[42u8; 32].into()).unwrap();
        let mut user_public_key = [0u8; 65];
        user_public_key.copy_from_slice(
            credential_key
                .verifying_key()
                .to_encoded_point(false)
                .as_bytes(),
        );

        Self {
            certificate_der,
            attestation_key,
            user_public_key,
            key_handle: key_handle.to_vec(),
        }
    }

    /// Sign the registration payload for the given relying party inputs.
    pub fn sign(&self, app_id_hash: &[u8], client_data_hash: &[u8]) -> Vec<u8> {
        let payload = signed_data(
            app_id_hash,
            client_data_hash,
            &self.key_handle,
            &self.user_public_key,
        );
        let signature: DerSignature = self.attestation_key.sign(&payload);
        signature.as_bytes().to_vec()
    }

    /// The raw registration message carrying `signature`.
    pub fn message(&self, signature: &[u8]) -> Vec<u8> {
        message(
            &self.user_public_key,
            &self.key_handle,
            &self.certificate_der,
            signature,
        )
    }

    /// A complete, correctly signed registration message.
    pub fn register(&self, app_id_hash: &[u8], client_data_hash: &[u8]) -> Vec<u8> {
        self.message(&self.sign(app_id_hash, client_data_hash))
    }
}

/// Assemble a registration message from its fields.
pub fn message(
    user_public_key: &[u8],
    key_handle: &[u8],
    certificate_der: &[u8],
    signature: &[u8],
) -> Vec<u8> {
    let mut buf = vec![REGISTRATION_MARKER];
    buf.extend_from_slice(user_public_key);
    buf.push(u8::try_from(key_handle.len()).unwrap());
    buf.extend_from_slice(key_handle);
    buf.extend_from_slice(certificate_der);
    buf.extend_from_slice(signature);
    buf
}

pub fn app_id_hash() -> [u8; 32] {
    sha256(b"https://example.com")
}

pub fn client_data_hash() -> [u8; 32] {
    sha256(br#"{"typ":"navigator.id.finishEnrollment","challenge":"vqrS6WXDe1JUs5_c3i4-LkKIHRr-3XVb3azuA5TifHo","origin":"https://example.com"}"#)
}

fn sha256(bytes: &[u8]) -> [u8; 32] {
    Es256Provider.hash(bytes)
}
