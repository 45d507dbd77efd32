//! The registration response entity, its wire decoder and its signature check.

use crate::{
    certificate::{AttestationCertificate, CertificateError, CertificateParser},
    error::{DecodeError, Field, ResponseError},
    reader::Reader,
};
use u2f_crypto::{CryptoError, CryptoProvider, InvalidKeyError};

/// Reserved byte opening every registration response on the wire.
pub const REGISTRATION_MARKER: u8 = 0x05;

/// Reserved byte opening the payload the attestation key signs.
pub const SIGNED_DATA_MARKER: u8 = 0x00;

/// Length of the uncompressed P-256 user public key.
pub const USER_PUBLIC_KEY_LEN: usize = 65;

/// Longest key handle the one-byte length prefix can describe.
pub const MAX_KEY_HANDLE_LEN: usize = u8::MAX as usize;

#[cfg(feature = "base64")]
const U2F_BASE64: base64::engine::GeneralPurpose = base64::engine::GeneralPurpose::new(
    &base64::alphabet::URL_SAFE,
    base64::engine::GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(base64::engine::DecodePaddingMode::Indifferent),
);

/// A U2F registration response.
///
/// Immutable once built. Equality and hashing cover the four data fields;
/// the [`CryptoProvider`] used to verify it is passed per call and is never
/// part of the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrationResponse {
    user_public_key: [u8; USER_PUBLIC_KEY_LEN],
    key_handle: Vec<u8>,
    attestation_certificate: AttestationCertificate,
    signature: Vec<u8>,
}

impl RegistrationResponse {
    /// Build a response from fields that are already separated.
    ///
    /// # Errors
    ///
    /// Fails if `key_handle` is longer than [`MAX_KEY_HANDLE_LEN`].
    pub fn new(
        user_public_key: [u8; USER_PUBLIC_KEY_LEN],
        key_handle: Vec<u8>,
        attestation_certificate: AttestationCertificate,
        signature: Vec<u8>,
    ) -> Result<Self, ResponseError> {
        if key_handle.len() > MAX_KEY_HANDLE_LEN {
            return Err(ResponseError::KeyHandleTooLong(key_handle.len()));
        }
        Ok(Self {
            user_public_key,
            key_handle,
            attestation_certificate,
            signature,
        })
    }

    /// Decode a raw registration message, parsing the certificate with
    /// [`crate::X509CertificateParser`].
    ///
    /// # Errors
    ///
    /// See [`Self::decode_with`].
    #[cfg(feature = "x509")]
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with(bytes, &crate::X509CertificateParser)
    }

    /// Decode a raw registration message with a custom certificate parser.
    ///
    /// Fields are read strictly in wire order and the first violation
    /// aborts. Whatever follows the certificate is the signature, even if
    /// empty.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidMarker`] if the first byte is not
    ///   [`REGISTRATION_MARKER`],
    /// - [`DecodeError::Truncated`] if the message ends inside a field,
    /// - [`DecodeError::MalformedCertificate`] if the certificate does not
    ///   parse.
    pub fn decode_with<P>(bytes: &[u8], parser: &P) -> Result<Self, DecodeError>
    where
        P: CertificateParser + ?Sized,
    {
        let result = Self::read(&mut Reader::new(bytes), parser);
        if let Err(error) = &result {
            tracing::debug!(%error, len = bytes.len(), "rejected registration response");
        }
        result
    }

    fn read<P>(reader: &mut Reader<'_>, parser: &P) -> Result<Self, DecodeError>
    where
        P: CertificateParser + ?Sized,
    {
        let marker = reader.read_u8(Field::Marker)?;
        if marker != REGISTRATION_MARKER {
            return Err(DecodeError::InvalidMarker(marker));
        }

        let user_public_key = reader.read_array::<USER_PUBLIC_KEY_LEN>(Field::UserPublicKey)?;
        let key_handle_len = reader.read_u8(Field::KeyHandleLength)?;
        let key_handle = reader
            .read(Field::KeyHandle, usize::from(key_handle_len))?
            .to_vec();

        let (attestation_certificate, consumed) =
            parser
                .parse(reader.remaining())
                .map_err(|error| match error {
                    CertificateError::Incomplete { needed, .. } => {
                        reader.truncated(Field::Certificate, needed)
                    }
                    other => DecodeError::MalformedCertificate(other),
                })?;
        reader.skip(Field::Certificate, consumed)?;

        let signature = reader.read_rest().to_vec();

        Ok(Self {
            user_public_key,
            key_handle,
            attestation_certificate,
            signature,
        })
    }

    /// Decode the URL-safe base64 form U2F clients send as `registrationData`.
    ///
    /// Padding is optional.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Base64`] for bad transport encoding, otherwise as
    /// [`Self::decode`].
    #[cfg(all(feature = "base64", feature = "x509"))]
    pub fn from_base64(encoded: &str) -> Result<Self, DecodeError> {
        use base64::Engine as _;

        let bytes = U2F_BASE64.decode(encoded.trim())?;
        Self::decode(&bytes)
    }

    /// Encode as URL-safe base64 without padding.
    #[cfg(feature = "base64")]
    #[must_use]
    pub fn to_base64(&self) -> String {
        use base64::Engine as _;

        U2F_BASE64.encode(self.to_vec())
    }

    /// Encode back to the raw wire format.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let certificate = self.attestation_certificate.as_der();
        let mut buf = Vec::with_capacity(
            2 + USER_PUBLIC_KEY_LEN + self.key_handle.len() + certificate.len() + self.signature.len(),
        );
        buf.push(REGISTRATION_MARKER);
        buf.extend_from_slice(&self.user_public_key);
        // `new` and `decode` both bound the key handle to one byte of length.
        buf.push(self.key_handle.len() as u8);
        buf.extend_from_slice(&self.key_handle);
        buf.extend_from_slice(certificate);
        buf.extend_from_slice(&self.signature);
        buf
    }

    /// The uncompressed P-256 public key of the new credential, undecoded.
    #[must_use]
    pub const fn user_public_key(&self) -> &[u8; USER_PUBLIC_KEY_LEN] {
        &self.user_public_key
    }

    /// The authenticator's handle for the new credential.
    #[must_use]
    pub fn key_handle(&self) -> &[u8] {
        &self.key_handle
    }

    /// The device attestation certificate.
    #[must_use]
    pub const fn attestation_certificate(&self) -> &AttestationCertificate {
        &self.attestation_certificate
    }

    /// The attestation signature bytes, as sent.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Decode [`Self::user_public_key`] into a usable key.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not a point on P-256.
    pub fn decode_user_public_key<P>(&self, provider: &P) -> Result<P::PublicKey, InvalidKeyError>
    where
        P: CryptoProvider + ?Sized,
    {
        provider.decode_public_key(&self.user_public_key)
    }

    /// The bytes the attestation key signed for this response.
    #[must_use]
    pub fn signed_data(&self, app_id_hash: &[u8], client_data_hash: &[u8]) -> Vec<u8> {
        signed_data(
            app_id_hash,
            client_data_hash,
            &self.key_handle,
            &self.user_public_key,
        )
    }

    /// Verify the attestation signature.
    ///
    /// `app_id_hash` and `client_data_hash` must be 32-byte SHA-256 digests;
    /// other lengths are not rejected here and simply fail to verify.
    ///
    /// Returns `Ok(false)` for a signature that does not match.
    ///
    /// # Errors
    ///
    /// Passes through the provider's [`CryptoError`] unchanged. Check
    /// [`CryptoError::is_fatal`] before treating it as a rejection.
    pub fn verify_signature<P>(
        &self,
        provider: &P,
        app_id_hash: &[u8],
        client_data_hash: &[u8],
    ) -> Result<bool, CryptoError>
    where
        P: CryptoProvider + ?Sized,
    {
        let signed = self.signed_data(app_id_hash, client_data_hash);
        let verified =
            provider.verify_with_certificate(&self.attestation_certificate, &signed, &self.signature);
        tracing::trace!(?verified, "attestation signature checked");
        verified
    }
}

/// Build the payload a U2F authenticator signs at registration:
/// `0x00 | app_id_hash | client_data_hash | key_handle | user_public_key`.
#[must_use]
pub fn signed_data(
    app_id_hash: &[u8],
    client_data_hash: &[u8],
    key_handle: &[u8],
    user_public_key: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(
        1 + app_id_hash.len() + client_data_hash.len() + key_handle.len() + user_public_key.len(),
    );
    buf.push(SIGNED_DATA_MARKER);
    buf.extend_from_slice(app_id_hash);
    buf.extend_from_slice(client_data_hash);
    buf.extend_from_slice(key_handle);
    buf.extend_from_slice(user_public_key);
    buf
}

impl serde::Serialize for RegistrationResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde_bytes::serialize(&self.to_vec(), serializer)
    }
}

#[cfg(feature = "x509")]
impl<'de> serde::Deserialize<'de> for RegistrationResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: serde_bytes::ByteBuf = serde::Deserialize::deserialize(deserializer)?;
        Self::decode(&bytes).map_err(serde::de::Error::custom)
    }
}
