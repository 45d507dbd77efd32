//! The attestation certificate and the parser seam that produces it.

use thiserror::Error;
use u2f_crypto::PublicKeyInfo;

/// DER tag of a constructed SEQUENCE, which every X.509 certificate is.
#[cfg(any(feature = "x509", test))]
const SEQUENCE_TAG: u8 = 0x30;

/// Errors from parsing an attestation certificate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificateError {
    /// The DER element extends past the end of the input.
    #[error("certificate needs {needed} bytes, {available} available")]
    Incomplete {
        /// Length of the whole DER element, or of its header when the
        /// header itself is cut short.
        needed: usize,
        /// Bytes supplied.
        available: usize,
    },

    /// The input does not start with a DER SEQUENCE.
    #[error("expected a DER SEQUENCE, found tag {0:#04x}")]
    UnexpectedTag(u8),

    /// The DER length is indefinite or too large.
    #[error("invalid DER length encoding")]
    InvalidLength,

    /// The element is a SEQUENCE but not a valid X.509 certificate.
    #[error("invalid X.509 certificate: {0}")]
    X509(String),

    /// Bytes follow a certificate that should stand alone.
    #[error("{0} trailing bytes after certificate")]
    TrailingData(usize),
}

/// An owned, parsed X.509 attestation certificate.
///
/// Only the public key is ever used: trust in the certificate is the
/// caller's concern. Equality and hashing cover the DER encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttestationCertificate {
    der: Vec<u8>,
    spki: Vec<u8>,
}

impl AttestationCertificate {
    /// Assemble a certificate from parts extracted by some other parser.
    ///
    /// `spki` must be the DER `SubjectPublicKeyInfo` found inside `der`;
    /// this is not checked.
    #[must_use]
    pub fn from_parts(der: Vec<u8>, spki: Vec<u8>) -> Self {
        Self { der, spki }
    }

    /// Parse a standalone DER certificate.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not exactly one X.509 certificate.
    #[cfg(feature = "x509")]
    pub fn from_der(der: &[u8]) -> Result<Self, CertificateError> {
        let (certificate, consumed) = X509CertificateParser.parse(der)?;
        match der.len() - consumed {
            0 => Ok(certificate),
            trailing => Err(CertificateError::TrailingData(trailing)),
        }
    }

    /// The certificate's DER encoding.
    #[must_use]
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// The DER `SubjectPublicKeyInfo` of the attested key.
    #[must_use]
    pub fn spki(&self) -> &[u8] {
        &self.spki
    }
}

impl PublicKeyInfo for AttestationCertificate {
    fn subject_public_key_info(&self) -> &[u8] {
        &self.spki
    }
}

/// Parses the one certificate at the start of a byte slice.
pub trait CertificateParser {
    /// Parse a certificate from the front of `input`.
    ///
    /// Returns the certificate and the number of bytes it occupied; bytes
    /// after it are left for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Incomplete`] when the input ends inside the
    /// certificate, and another variant when it is malformed.
    fn parse(&self, input: &[u8]) -> Result<(AttestationCertificate, usize), CertificateError>;
}

/// The default [`CertificateParser`], backed by `x509-parser`.
#[cfg(feature = "x509")]
#[derive(Debug, Default, Clone, Copy)]
pub struct X509CertificateParser;

#[cfg(feature = "x509")]
impl CertificateParser for X509CertificateParser {
    fn parse(&self, input: &[u8]) -> Result<(AttestationCertificate, usize), CertificateError> {
        let len = der_element_len(input)?;
        let der = &input[..len];

        let (rest, certificate) = x509_parser::parse_x509_certificate(der)
            .map_err(|e| CertificateError::X509(e.to_string()))?;
        if !rest.is_empty() {
            return Err(CertificateError::X509(format!(
                "{} bytes left inside the certificate element",
                rest.len()
            )));
        }

        let spki = certificate.tbs_certificate.subject_pki.raw.to_vec();
        Ok((AttestationCertificate::from_parts(der.to_vec(), spki), len))
    }
}

/// Total length (header and contents) of the DER SEQUENCE at the front of
/// `input`, checked against the bytes available.
#[cfg(any(feature = "x509", test))]
pub(crate) fn der_element_len(input: &[u8]) -> Result<usize, CertificateError> {
    let incomplete = |needed| CertificateError::Incomplete {
        needed,
        available: input.len(),
    };

    let (&tag, rest) = input.split_first().ok_or_else(|| incomplete(2))?;
    if tag != SEQUENCE_TAG {
        return Err(CertificateError::UnexpectedTag(tag));
    }
    let (&first, rest) = rest.split_first().ok_or_else(|| incomplete(2))?;

    let (header_len, content_len) = if first & 0x80 == 0 {
        (2, usize::from(first))
    } else {
        let octets = usize::from(first & 0x7f);
        // Zero octets is the indefinite form, which DER forbids. Four octets
        // already exceeds any plausible attestation certificate.
        if octets == 0 || octets > 4 {
            return Err(CertificateError::InvalidLength);
        }
        let bytes = rest.get(..octets).ok_or_else(|| incomplete(2 + octets))?;
        let content_len = bytes
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
        (2 + octets, content_len)
    };

    let total = header_len
        .checked_add(content_len)
        .ok_or(CertificateError::InvalidLength)?;
    if total > input.len() {
        return Err(incomplete(total));
    }
    Ok(total)
}
