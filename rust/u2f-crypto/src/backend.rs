//! Process-wide backend initialization.

use crate::{CryptoError, CryptoProvider, Es256Provider};
use std::sync::OnceLock;

static BACKEND: OnceLock<Result<Es256Provider, CryptoError>> = OnceLock::new();

/// SHA-256("abc"), FIPS 180-2 appendix B.1.
const SHA256_ABC: [u8; 32] = [
    0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae, 0x22, 0x23,
    0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61, 0xf2, 0x00, 0x15, 0xad,
];

/// The P-256 base point G, uncompressed (SEC 2, section 2.4.2).
const P256_GENERATOR: [u8; 65] = [
    0x04, 0x6b, 0x17, 0xd1, 0xf2, 0xe1, 0x2c, 0x42, 0x47, 0xf8, 0xbc, 0xe6, 0xe5, 0x63, 0xa4, 0x40,
    0xf2, 0x77, 0x03, 0x7d, 0x81, 0x2d, 0xeb, 0x33, 0xa0, 0xf4, 0xa1, 0x39, 0x45, 0xd8, 0x98, 0xc2,
    0x96, 0x4f, 0xe3, 0x42, 0xe2, 0xfe, 0x1a, 0x7f, 0x9b, 0x8e, 0xe7, 0xeb, 0x4a, 0x7c, 0x0f, 0x9e,
    0x16, 0x2b, 0xce, 0x33, 0x57, 0x6b, 0x31, 0x5e, 0xce, 0xcb, 0xb6, 0x40, 0x68, 0x37, 0xbf, 0x51,
    0xf5,
];

/// Initialize the default cryptography backend and return it.
///
/// The first call runs known-answer self-tests of the backend; every call
/// (including concurrent first calls from several threads) observes the
/// same memoized outcome. Call this once during process startup.
///
/// # Errors
///
/// Returns [`CryptoError::Unavailable`] if the self-test failed. The error
/// is fatal: no verification result from this process can be trusted.
pub fn init() -> Result<&'static Es256Provider, CryptoError> {
    BACKEND
        .get_or_init(|| {
            let outcome = self_test(&Es256Provider).map(|()| Es256Provider);
            match &outcome {
                Ok(_) => tracing::debug!("ES256 cryptography backend initialized"),
                Err(error) => tracing::error!(%error, "ES256 cryptography backend failed self-test"),
            }
            outcome
        })
        .as_ref()
        .map_err(Clone::clone)
}

fn self_test<P: CryptoProvider>(provider: &P) -> Result<(), CryptoError> {
    if provider.hash(b"abc") != SHA256_ABC {
        return Err(CryptoError::Unavailable(
            "SHA-256 known-answer test failed".into(),
        ));
    }
    provider
        .decode_public_key(&P256_GENERATOR)
        .map_err(|e| CryptoError::Unavailable(format!("P-256 generator rejected: {e}")))?;
    Ok(())
}
