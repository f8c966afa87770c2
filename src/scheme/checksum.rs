//! Keyed FNV-1a checksum posing as a signature scheme.
//!
//! NOT a signature: the "public" and "secret" keys are the same bytes. It
//! exists to measure the harness itself (buffer copies, timer reads, loop
//! overhead) with operations that cost a few hundred cycles, and to drive
//! the correctness oracle without paying for SPHINCS+ in tests.

use rand::Rng;

use super::{write_into, SchemeError, SchemeInfo, SignatureScheme};

const KEY_BYTES: usize = 16;
const TAG_BYTES: usize = 8;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

static INFO: SchemeInfo = SchemeInfo {
    algorithm: "FNV-1a-64 keyed checksum",
    parameter_set: "fnv-checksum",
    family: "checksum",
    public_key_bytes: KEY_BYTES,
    secret_key_bytes: KEY_BYTES,
    signature_bytes: TAG_BYTES,
    params: &[("key_bytes", KEY_BYTES as u32), ("tag_bytes", TAG_BYTES as u32)],
};

/// Baseline "scheme" whose tag is FNV-1a over key ‖ message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumScheme;

impl ChecksumScheme {
    /// Create the scheme.
    pub const fn new() -> Self {
        ChecksumScheme
    }

    fn tag(key: &[u8], message: &[u8]) -> [u8; TAG_BYTES] {
        let mut hash = FNV_OFFSET;
        for &byte in key.iter().chain(message) {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash.to_le_bytes()
    }
}

impl SignatureScheme for ChecksumScheme {
    fn info(&self) -> &SchemeInfo {
        &INFO
    }

    fn keypair(&self, pk: &mut [u8], sk: &mut [u8]) -> Result<(), SchemeError> {
        let mut key = [0u8; KEY_BYTES];
        rand::rng().fill(&mut key[..]);
        write_into("public key", pk, &key)?;
        write_into("secret key", sk, &key)?;
        Ok(())
    }

    fn sign(&self, sm: &mut [u8], m: &[u8], sk: &[u8]) -> Result<usize, SchemeError> {
        if sk.len() != KEY_BYTES {
            return Err(SchemeError::BadKey {
                what: "secret key",
                expected: KEY_BYTES,
                actual: sk.len(),
            });
        }
        let needed = TAG_BYTES + m.len();
        if sm.len() < needed {
            return Err(SchemeError::BufferTooSmall {
                what: "signed message",
                needed,
                available: sm.len(),
            });
        }
        sm[..TAG_BYTES].copy_from_slice(&Self::tag(sk, m));
        sm[TAG_BYTES..needed].copy_from_slice(m);
        Ok(needed)
    }

    fn open(&self, m: &mut [u8], sm: &[u8], pk: &[u8]) -> Result<usize, SchemeError> {
        if pk.len() != KEY_BYTES {
            return Err(SchemeError::BadKey {
                what: "public key",
                expected: KEY_BYTES,
                actual: pk.len(),
            });
        }
        if sm.len() < TAG_BYTES {
            return Err(SchemeError::Rejected);
        }
        let (tag, message) = sm.split_at(TAG_BYTES);
        if tag != Self::tag(pk, message) {
            return Err(SchemeError::Rejected);
        }
        write_into("message", m, message)
    }
}
