//! The signature library boundary.
//!
//! The harness only sees three operations over caller-owned byte buffers,
//! matching the NIST `crypto_sign` API shape:
//!
//! - `keypair(pk, sk)`
//! - `sign(sm, m, sk)` writes signature ‖ message into `sm`, returns its length
//! - `open(m, sm, pk)` verifies `sm` and writes the message into `m`, returns its length
//!
//! `Ok` plays the role of a zero status code.

mod checksum;
mod sphincs;

use serde::Serialize;

pub use checksum::ChecksumScheme;
pub use sphincs::{
    SphincsSha2_128f, SphincsSha2_128s, SphincsSha2_192f, SphincsSha2_192s, SphincsSha2_256f,
    SphincsSha2_256s, SphincsShake128f, SphincsShake128s, SphincsShake192f, SphincsShake192s,
    SphincsShake256f, SphincsShake256s,
};

/// Errors reported by a signature scheme operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemeError {
    /// Output buffer cannot hold the result.
    #[error("{what} buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Which buffer.
        what: &'static str,
        /// Bytes the result needs.
        needed: usize,
        /// Bytes the buffer has.
        available: usize,
    },

    /// Key bytes have the wrong length for this scheme.
    #[error("bad {what}: expected {expected} bytes, got {actual}")]
    BadKey {
        /// Which key.
        what: &'static str,
        /// Length the scheme expects.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },

    /// Signature did not verify.
    #[error("signature rejected")]
    Rejected,
}

/// Static description of a signature scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemeInfo {
    /// Algorithm name as the library reports it.
    pub algorithm: &'static str,
    /// Short parameter-set name, also the registry key.
    pub parameter_set: &'static str,
    /// Scheme family, used to label `params`.
    pub family: &'static str,
    /// Public key size in bytes.
    pub public_key_bytes: usize,
    /// Secret key size in bytes.
    pub secret_key_bytes: usize,
    /// Signature overhead in bytes (signed message = signature + message).
    pub signature_bytes: usize,
    /// Named scheme parameters, in display order.
    pub params: &'static [(&'static str, u32)],
}

/// Three black-box operations over caller-owned buffers.
///
/// Implementations must not retain references to the buffers past a call.
pub trait SignatureScheme {
    /// Scheme metadata and buffer sizes.
    fn info(&self) -> &SchemeInfo;

    /// Generate a fresh key pair into `pk` and `sk`.
    fn keypair(&self, pk: &mut [u8], sk: &mut [u8]) -> Result<(), SchemeError>;

    /// Sign `m` with `sk`, writing signature ‖ message into `sm`.
    ///
    /// Returns the number of bytes written.
    fn sign(&self, sm: &mut [u8], m: &[u8], sk: &[u8]) -> Result<usize, SchemeError>;

    /// Verify `sm` under `pk`, writing the recovered message into `m`.
    ///
    /// Returns the recovered message length.
    fn open(&self, m: &mut [u8], sm: &[u8], pk: &[u8]) -> Result<usize, SchemeError>;
}

impl<S: SignatureScheme + ?Sized> SignatureScheme for Box<S> {
    fn info(&self) -> &SchemeInfo {
        (**self).info()
    }

    fn keypair(&self, pk: &mut [u8], sk: &mut [u8]) -> Result<(), SchemeError> {
        (**self).keypair(pk, sk)
    }

    fn sign(&self, sm: &mut [u8], m: &[u8], sk: &[u8]) -> Result<usize, SchemeError> {
        (**self).sign(sm, m, sk)
    }

    fn open(&self, m: &mut [u8], sm: &[u8], pk: &[u8]) -> Result<usize, SchemeError> {
        (**self).open(m, sm, pk)
    }
}

/// Copy `src` into the front of `dst`, returning `src.len()`.
pub(crate) fn write_into(what: &'static str, dst: &mut [u8], src: &[u8]) -> Result<usize, SchemeError> {
    if dst.len() < src.len() {
        return Err(SchemeError::BufferTooSmall {
            what,
            needed: src.len(),
            available: dst.len(),
        });
    }
    dst[..src.len()].copy_from_slice(src);
    Ok(src.len())
}

/// Every bundled scheme, SPHINCS+ parameter sets first.
pub fn all() -> Vec<Box<dyn SignatureScheme>> {
    vec![
        Box::new(SphincsSha2_128f),
        Box::new(SphincsSha2_128s),
        Box::new(SphincsSha2_192f),
        Box::new(SphincsSha2_192s),
        Box::new(SphincsSha2_256f),
        Box::new(SphincsSha2_256s),
        Box::new(SphincsShake128f),
        Box::new(SphincsShake128s),
        Box::new(SphincsShake192f),
        Box::new(SphincsShake192s),
        Box::new(SphincsShake256f),
        Box::new(SphincsShake256s),
        Box::new(ChecksumScheme::new()),
    ]
}

/// Parameter-set names of [`all`], in order.
pub fn names() -> Vec<&'static str> {
    all().iter().map(|s| s.info().parameter_set).collect()
}

/// Look up a bundled scheme by parameter-set name (case-insensitive).
pub fn by_name(name: &str) -> Option<Box<dyn SignatureScheme>> {
    let wanted = name.trim().to_ascii_lowercase();
    all()
        .into_iter()
        .find(|s| s.info().parameter_set == wanted)
}
