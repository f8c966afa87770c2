//! Buffers owned by one benchmark run.

use rand::Rng;

use crate::error::BenchError;
use crate::scheme::{SchemeError, SchemeInfo, SignatureScheme};

/// Key, message and signature buffers for one run.
///
/// Sized from the scheme's declared maximums and mutated in place by every
/// operation invocation. Dropped at the end of the run.
#[derive(Debug)]
pub struct BenchContext {
    public_key: Vec<u8>,
    secret_key: Vec<u8>,
    message: Vec<u8>,
    signed: Vec<u8>,
    signed_len: usize,
    recovered: Vec<u8>,
    recovered_len: usize,
}

fn zeroed(what: &'static str, bytes: usize) -> Result<Vec<u8>, BenchError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes)
        .map_err(|_| BenchError::Allocation { what, bytes })?;
    buf.resize(bytes, 0);
    Ok(buf)
}

impl BenchContext {
    /// Allocate zeroed buffers for `info` and a message of `message_len` bytes.
    pub fn allocate(info: &SchemeInfo, message_len: usize) -> Result<Self, BenchError> {
        let signed_capacity = info.signature_bytes.checked_add(message_len).ok_or(BenchError::Allocation {
            what: "signed message",
            bytes: usize::MAX,
        })?;

        Ok(Self {
            public_key: zeroed("public key", info.public_key_bytes)?,
            secret_key: zeroed("secret key", info.secret_key_bytes)?,
            message: zeroed("message", message_len)?,
            signed: zeroed("signed message", signed_capacity)?,
            signed_len: 0,
            recovered: zeroed("recovered message", signed_capacity)?,
            recovered_len: 0,
        })
    }

    /// Fill the message with random bytes.
    pub fn randomize_message<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        rng.fill(&mut self.message[..]);
    }

    /// Generate a key pair into the key buffers.
    #[inline]
    pub fn keypair<S: SignatureScheme + ?Sized>(&mut self, scheme: &S) -> Result<(), SchemeError> {
        scheme.keypair(&mut self.public_key, &mut self.secret_key)
    }

    /// Sign the message into the signed buffer.
    #[inline]
    pub fn sign<S: SignatureScheme + ?Sized>(&mut self, scheme: &S) -> Result<usize, SchemeError> {
        let len = scheme.sign(&mut self.signed, &self.message, &self.secret_key)?;
        self.signed_len = len;
        Ok(len)
    }

    /// Open the current signed message into the recovered buffer.
    #[inline]
    pub fn open<S: SignatureScheme + ?Sized>(&mut self, scheme: &S) -> Result<usize, SchemeError> {
        let len = scheme.open(
            &mut self.recovered,
            &self.signed[..self.signed_len],
            &self.public_key,
        )?;
        self.recovered_len = len;
        Ok(len)
    }

    /// Original message.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Original message, mutable.
    pub fn message_mut(&mut self) -> &mut [u8] {
        &mut self.message
    }

    /// Signed message produced by the last successful `sign`.
    pub fn signed(&self) -> &[u8] {
        &self.signed[..self.signed_len]
    }

    /// Signed message, mutable.
    pub fn signed_mut(&mut self) -> &mut [u8] {
        &mut self.signed[..self.signed_len]
    }

    /// Message recovered by the last successful `open`.
    pub fn recovered(&self) -> &[u8] {
        &self.recovered[..self.recovered_len]
    }

    /// Public key.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::ChecksumScheme;

    #[test]
    fn test_allocate_sizes() {
        let scheme = ChecksumScheme;
        let info = scheme.info();
        let ctx = BenchContext::allocate(info, 32).unwrap();
        assert_eq!(ctx.public_key().len(), info.public_key_bytes);
        assert_eq!(ctx.message().len(), 32);
        assert!(ctx.signed().is_empty());
        assert!(ctx.recovered().is_empty());
    }

    #[test]
    fn test_sign_then_open() {
        let scheme = ChecksumScheme;
        let mut ctx = BenchContext::allocate(scheme.info(), 32).unwrap();
        ctx.randomize_message(&mut rand::rng());
        ctx.keypair(&scheme).unwrap();

        let smlen = ctx.sign(&scheme).unwrap();
        assert_eq!(smlen, 32 + scheme.info().signature_bytes);
        assert_eq!(ctx.signed().len(), smlen);

        let mlen = ctx.open(&scheme).unwrap();
        assert_eq!(mlen, 32);
        assert_eq!(ctx.recovered(), ctx.message());
    }

    #[test]
    fn test_empty_message() {
        let scheme = ChecksumScheme;
        let mut ctx = BenchContext::allocate(scheme.info(), 0).unwrap();
        ctx.keypair(&scheme).unwrap();
        ctx.sign(&scheme).unwrap();
        assert_eq!(ctx.open(&scheme).unwrap(), 0);
    }
}
