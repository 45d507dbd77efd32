//! Attestation signature verification.

#![cfg(feature = "x509")]

mod common;

use common::{Token, app_id_hash, client_data_hash};
use p256::elliptic_curve::sec1::ToEncodedPoint as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use testresult::TestResult;
use u2f_crypto::{CryptoError, CryptoProvider, Es256Provider, InvalidKeyError, PublicKeyInfo};
use u2f_registration::{AttestationCertificate, RegistrationResponse};

fn registered(key_handle: &[u8]) -> (Token, RegistrationResponse) {
    let token = Token::new(key_handle);
    let bytes = token.register(&app_id_hash(), &client_data_hash());
    let response = RegistrationResponse::decode(&bytes).unwrap();
    (token, response)
}

#[test]
fn genuine_registration_verifies() -> TestResult {
    let provider = u2f_crypto::init()?;
    let (_, response) = registered(&[0x11; 64]);

    assert!(response.verify_signature(provider, &app_id_hash(), &client_data_hash())?);
    Ok(())
}

#[test]
fn altered_app_id_hash_fails() -> TestResult {
    let (_, response) = registered(&[0x11; 64]);

    for i in [0, 17, 31] {
        let mut app_id_hash = app_id_hash();
        app_id_hash[i] ^= 0x01;
        assert!(!response.verify_signature(&Es256Provider, &app_id_hash, &client_data_hash())?);
    }
    Ok(())
}

#[test]
fn altered_client_data_hash_fails() -> TestResult {
    let (_, response) = registered(&[0x11; 64]);

    for i in [0, 9, 31] {
        let mut client_data_hash = client_data_hash();
        client_data_hash[i] ^= 0x80;
        assert!(!response.verify_signature(&Es256Provider, &app_id_hash(), &client_data_hash)?);
    }
    Ok(())
}

#[test]
fn altered_key_handle_fails() -> TestResult {
    let (token, response) = registered(&[0x11; 64]);

    let mut key_handle = token.key_handle.clone();
    key_handle[63] ^= 0x01;
    let tampered = RegistrationResponse::new(
        *response.user_public_key(),
        key_handle,
        response.attestation_certificate().clone(),
        response.signature().to_vec(),
    )?;

    assert!(!tampered.verify_signature(&Es256Provider, &app_id_hash(), &client_data_hash())?);
    Ok(())
}

#[test]
fn altered_user_public_key_fails() -> TestResult {
    let (_, response) = registered(&[0x11; 64]);

    let mut user_public_key = *response.user_public_key();
    user_public_key[40] ^= 0x01;
    let tampered = RegistrationResponse::new(
        user_public_key,
        response.key_handle().to_vec(),
        response.attestation_certificate().clone(),
        response.signature().to_vec(),
    )?;

    assert!(!tampered.verify_signature(&Es256Provider, &app_id_hash(), &client_data_hash())?);
    Ok(())
}

#[test]
fn signature_from_another_attestation_key_fails() -> TestResult {
    let (_, response) = registered(&[0x22; 32]);
    let (other, _) = registered(&[0x22; 32]);

    let foreign = RegistrationResponse::new(
        *response.user_public_key(),
        response.key_handle().to_vec(),
        response.attestation_certificate().clone(),
        other.sign(&app_id_hash(), &client_data_hash()),
    )?;

    assert!(!foreign.verify_signature(&Es256Provider, &app_id_hash(), &client_data_hash())?);
    Ok(())
}

#[test]
fn cut_signature_is_malformed_not_rejected_or_fatal() -> TestResult {
    let token = Token::new(&[0x33; 8]);
    let signature = token.sign(&app_id_hash(), &client_data_hash());
    let response =
        RegistrationResponse::decode(&token.message(&signature[..signature.len() - 3]))?;

    let err = response
        .verify_signature(&Es256Provider, &app_id_hash(), &client_data_hash())
        .unwrap_err();

    assert!(matches!(err, CryptoError::MalformedSignature(_)));
    assert!(!err.is_fatal());
    Ok(())
}

#[test]
fn non_p256_attestation_key_is_unsupported() -> TestResult {
    let (_, response) = registered(&[0x44; 8]);
    let certificate = AttestationCertificate::from_parts(
        response.attestation_certificate().as_der().to_vec(),
        vec![0x30, 0x03, 0x02, 0x01, 0x00],
    );
    let odd = RegistrationResponse::new(
        *response.user_public_key(),
        response.key_handle().to_vec(),
        certificate,
        response.signature().to_vec(),
    )?;

    let err = odd
        .verify_signature(&Es256Provider, &app_id_hash(), &client_data_hash())
        .unwrap_err();

    assert!(matches!(err, CryptoError::UnsupportedKey(_)));
    Ok(())
}

#[test]
fn user_public_key_decodes_to_the_credential_key() -> TestResult {
    let (token, response) = registered(&[0x55; 16]);

    let key = response.decode_user_public_key(&Es256Provider)?;

    assert_eq!(key.to_encoded_point(false).as_bytes(), &token.user_public_key);
    Ok(())
}

#[test]
fn zero_user_public_key_does_not_decode() {
    let token = Token::new(&[1, 2, 3, 4]);
    let bytes = common::message(&[0u8; 65], &token.key_handle, &token.certificate_der, &[9, 9]);
    let response = RegistrationResponse::decode(&bytes).unwrap();

    assert_eq!(
        response.decode_user_public_key(&Es256Provider).unwrap_err(),
        InvalidKeyError::NotUncompressed(0x00)
    );
}

/// A backend that has lost its verifier, as a misconfigured deployment would.
struct Unavailable;

impl CryptoProvider for Unavailable {
    type PublicKey = ();

    fn decode_public_key(&self, _: &[u8]) -> Result<(), InvalidKeyError> {
        Ok(())
    }

    fn public_key_from_spki(&self, _: &[u8]) -> Result<(), CryptoError> {
        Ok(())
    }

    fn verify_with_key(&self, _: &(), _: &[u8], _: &[u8]) -> Result<bool, CryptoError> {
        Err(CryptoError::Unavailable("SHA256withECDSA not registered".into()))
    }

    fn hash(&self, _: &[u8]) -> [u8; 32] {
        [0; 32]
    }
}

#[test]
fn backend_fault_is_not_a_rejection() {
    let (_, response) = registered(&[0x66; 8]);

    let err = response
        .verify_signature(&Unavailable, &app_id_hash(), &client_data_hash())
        .unwrap_err();

    assert!(err.is_fatal());
}

/// Records what the response hands to the provider.
#[derive(Default)]
struct Recording {
    calls: AtomicUsize,
}

impl CryptoProvider for Recording {
    type PublicKey = ();

    fn decode_public_key(&self, _: &[u8]) -> Result<(), InvalidKeyError> {
        Ok(())
    }

    fn public_key_from_spki(&self, _: &[u8]) -> Result<(), CryptoError> {
        Ok(())
    }

    fn verify_with_key(&self, _: &(), _: &[u8], _: &[u8]) -> Result<bool, CryptoError> {
        Ok(false)
    }

    fn verify_with_certificate(
        &self,
        certificate: &dyn PublicKeyInfo,
        signed_data: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!certificate.subject_public_key_info().is_empty());
        assert_eq!(signed_data[0], 0x00);
        assert_eq!(signed_data.len(), 1 + 32 + 32 + 4 + 65);
        assert!(!signature.is_empty());
        Ok(true)
    }

    fn hash(&self, _: &[u8]) -> [u8; 32] {
        [0; 32]
    }
}

#[test]
fn provider_result_is_returned_unchanged() -> TestResult {
    let (_, response) = registered(&[1, 2, 3, 4]);
    let provider = Recording::default();

    assert!(response.verify_signature(&provider, &app_id_hash(), &client_data_hash())?);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn verification_runs_concurrently() -> TestResult {
    let provider = u2f_crypto::init()?;
    let (_, response) = registered(&[0x77; 32]);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert!(
                    response
                        .verify_signature(provider, &app_id_hash(), &client_data_hash())
                        .unwrap()
                );
            });
        }
    });
    Ok(())
}
