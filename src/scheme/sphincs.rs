//! SPHINCS+ "simple" parameter sets from `pqcrypto-sphincsplus` (PQClean).
//!
//! Every parameter set of the round 3 submission: SHA2 and SHAKE
//! instantiations at 128/192/256-bit security, fast (`f`) and small (`s`)
//! variants.

use pqcrypto_traits::sign::{PublicKey as _, SecretKey as _, SignedMessage as _};

use super::{write_into, SchemeError, SchemeInfo, SignatureScheme};

/// n, full_height, d, fors_height, fors_trees, wots_w
const PARAMS_128F: [(&str, u32); 6] = [
    ("n", 16),
    ("full_height", 66),
    ("d", 22),
    ("fors_height", 6),
    ("fors_trees", 33),
    ("wots_w", 16),
];
const PARAMS_128S: [(&str, u32); 6] = [
    ("n", 16),
    ("full_height", 63),
    ("d", 7),
    ("fors_height", 12),
    ("fors_trees", 14),
    ("wots_w", 16),
];
const PARAMS_192F: [(&str, u32); 6] = [
    ("n", 24),
    ("full_height", 66),
    ("d", 22),
    ("fors_height", 8),
    ("fors_trees", 33),
    ("wots_w", 16),
];
const PARAMS_192S: [(&str, u32); 6] = [
    ("n", 24),
    ("full_height", 63),
    ("d", 7),
    ("fors_height", 14),
    ("fors_trees", 17),
    ("wots_w", 16),
];
const PARAMS_256F: [(&str, u32); 6] = [
    ("n", 32),
    ("full_height", 68),
    ("d", 17),
    ("fors_height", 9),
    ("fors_trees", 35),
    ("wots_w", 16),
];
const PARAMS_256S: [(&str, u32); 6] = [
    ("n", 32),
    ("full_height", 64),
    ("d", 8),
    ("fors_height", 14),
    ("fors_trees", 22),
    ("wots_w", 16),
];

/// Generates a unit struct wrapping one `pqcrypto_sphincsplus` module.
///
/// Sizes follow the SPHINCS+ round 3 parameter tables: pk = 2n, sk = 4n.
macro_rules! sphincs_scheme {
    (
        $(#[$meta:meta])*
        $name:ident, $module:ident, $algorithm:literal, $paramset:literal,
        n = $n:literal, sig = $sig:literal, params = $params:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            const INFO: SchemeInfo = SchemeInfo {
                algorithm: $algorithm,
                parameter_set: $paramset,
                family: "SPHINCS+",
                public_key_bytes: 2 * $n,
                secret_key_bytes: 4 * $n,
                signature_bytes: $sig,
                params: &$params,
            };
        }

        impl SignatureScheme for $name {
            fn info(&self) -> &SchemeInfo {
                &Self::INFO
            }

            fn keypair(&self, pk: &mut [u8], sk: &mut [u8]) -> Result<(), SchemeError> {
                let (public, secret) = pqcrypto_sphincsplus::$module::keypair();
                write_into("public key", pk, public.as_bytes())?;
                write_into("secret key", sk, secret.as_bytes())?;
                Ok(())
            }

            fn sign(&self, sm: &mut [u8], m: &[u8], sk: &[u8]) -> Result<usize, SchemeError> {
                let secret = pqcrypto_sphincsplus::$module::SecretKey::from_bytes(sk).map_err(|_| {
                    SchemeError::BadKey {
                        what: "secret key",
                        expected: Self::INFO.secret_key_bytes,
                        actual: sk.len(),
                    }
                })?;
                let signed = pqcrypto_sphincsplus::$module::sign(m, &secret);
                write_into("signed message", sm, signed.as_bytes())
            }

            fn open(&self, m: &mut [u8], sm: &[u8], pk: &[u8]) -> Result<usize, SchemeError> {
                let public = pqcrypto_sphincsplus::$module::PublicKey::from_bytes(pk).map_err(|_| {
                    SchemeError::BadKey {
                        what: "public key",
                        expected: Self::INFO.public_key_bytes,
                        actual: pk.len(),
                    }
                })?;
                let signed = pqcrypto_sphincsplus::$module::SignedMessage::from_bytes(sm)
                    .map_err(|_| SchemeError::Rejected)?;
                let message = pqcrypto_sphincsplus::$module::open(&signed, &public)
                    .map_err(|_| SchemeError::Rejected)?;
                write_into("message", m, &message)
            }
        }
    };
}

sphincs_scheme!(
    /// SPHINCS+-SHA2-128f-simple.
    SphincsSha2_128f, sphincssha2128fsimple, "SPHINCS+-sha2-128f-simple", "sphincs-sha2-128f",
    n = 16, sig = 17088, params = PARAMS_128F
);
sphincs_scheme!(
    /// SPHINCS+-SHA2-128s-simple.
    SphincsSha2_128s, sphincssha2128ssimple, "SPHINCS+-sha2-128s-simple", "sphincs-sha2-128s",
    n = 16, sig = 7856, params = PARAMS_128S
);
sphincs_scheme!(
    /// SPHINCS+-SHA2-192f-simple.
    SphincsSha2_192f, sphincssha2192fsimple, "SPHINCS+-sha2-192f-simple", "sphincs-sha2-192f",
    n = 24, sig = 35664, params = PARAMS_192F
);
sphincs_scheme!(
    /// SPHINCS+-SHA2-192s-simple.
    SphincsSha2_192s, sphincssha2192ssimple, "SPHINCS+-sha2-192s-simple", "sphincs-sha2-192s",
    n = 24, sig = 16224, params = PARAMS_192S
);
sphincs_scheme!(
    /// SPHINCS+-SHA2-256f-simple.
    SphincsSha2_256f, sphincssha2256fsimple, "SPHINCS+-sha2-256f-simple", "sphincs-sha2-256f",
    n = 32, sig = 49856, params = PARAMS_256F
);
sphincs_scheme!(
    /// SPHINCS+-SHA2-256s-simple.
    SphincsSha2_256s, sphincssha2256ssimple, "SPHINCS+-sha2-256s-simple", "sphincs-sha2-256s",
    n = 32, sig = 29792, params = PARAMS_256S
);
sphincs_scheme!(
    /// SPHINCS+-SHAKE-128f-simple.
    SphincsShake128f, sphincsshake128fsimple, "SPHINCS+-shake-128f-simple", "sphincs-shake-128f",
    n = 16, sig = 17088, params = PARAMS_128F
);
sphincs_scheme!(
    /// SPHINCS+-SHAKE-128s-simple.
    SphincsShake128s, sphincsshake128ssimple, "SPHINCS+-shake-128s-simple", "sphincs-shake-128s",
    n = 16, sig = 7856, params = PARAMS_128S
);
sphincs_scheme!(
    /// SPHINCS+-SHAKE-192f-simple.
    SphincsShake192f, sphincsshake192fsimple, "SPHINCS+-shake-192f-simple", "sphincs-shake-192f",
    n = 24, sig = 35664, params = PARAMS_192F
);
sphincs_scheme!(
    /// SPHINCS+-SHAKE-192s-simple.
    SphincsShake192s, sphincsshake192ssimple, "SPHINCS+-shake-192s-simple", "sphincs-shake-192s",
    n = 24, sig = 16224, params = PARAMS_192S
);
sphincs_scheme!(
    /// SPHINCS+-SHAKE-256f-simple.
    SphincsShake256f, sphincsshake256fsimple, "SPHINCS+-shake-256f-simple", "sphincs-shake-256f",
    n = 32, sig = 49856, params = PARAMS_256F
);
sphincs_scheme!(
    /// SPHINCS+-SHAKE-256s-simple.
    SphincsShake256s, sphincsshake256ssimple, "SPHINCS+-shake-256s-simple", "sphincs-shake-256s",
    n = 32, sig = 29792, params = PARAMS_256S
);

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_sizes {
        ($ty:ty, $module:ident) => {
            let info = <$ty>::default().info().clone();
            assert_eq!(info.public_key_bytes, pqcrypto_sphincsplus::$module::public_key_bytes());
            assert_eq!(info.secret_key_bytes, pqcrypto_sphincsplus::$module::secret_key_bytes());
            assert_eq!(info.signature_bytes, pqcrypto_sphincsplus::$module::signature_bytes());
        };
    }

    #[test]
    fn test_declared_sizes_match_library() {
        assert_sizes!(SphincsSha2_128f, sphincssha2128fsimple);
        assert_sizes!(SphincsSha2_128s, sphincssha2128ssimple);
        assert_sizes!(SphincsSha2_192f, sphincssha2192fsimple);
        assert_sizes!(SphincsSha2_192s, sphincssha2192ssimple);
        assert_sizes!(SphincsSha2_256f, sphincssha2256fsimple);
        assert_sizes!(SphincsSha2_256s, sphincssha2256ssimple);
        assert_sizes!(SphincsShake128f, sphincsshake128fsimple);
        assert_sizes!(SphincsShake128s, sphincsshake128ssimple);
        assert_sizes!(SphincsShake192f, sphincsshake192fsimple);
        assert_sizes!(SphincsShake192s, sphincsshake192ssimple);
        assert_sizes!(SphincsShake256f, sphincsshake256fsimple);
        assert_sizes!(SphincsShake256s, sphincsshake256ssimple);
    }

    #[test]
    fn test_sign_rejects_short_secret_key() {
        let scheme = SphincsSha2_128f;
        let mut sm = vec![0u8; 17088 + 8];
        let err = scheme.sign(&mut sm, b"message!", &[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            SchemeError::BadKey {
                what: "secret key",
                expected: 64,
                actual: 10
            }
        );
    }

    #[test]
    fn test_sign_open_roundtrip() {
        let scheme = SphincsSha2_128f;
        let info = scheme.info();
        let mut pk = vec![0u8; info.public_key_bytes];
        let mut sk = vec![0u8; info.secret_key_bytes];
        scheme.keypair(&mut pk, &mut sk).unwrap();

        let message = b"thirty-two bytes of test message";
        let mut sm = vec![0u8; info.signature_bytes + message.len()];
        let smlen = scheme.sign(&mut sm, message, &sk).unwrap();
        assert_eq!(smlen, info.signature_bytes + message.len());

        let mut recovered = vec![0u8; sm.len()];
        let mlen = scheme.open(&mut recovered, &sm[..smlen], &pk).unwrap();
        assert_eq!(&recovered[..mlen], message);
    }
}
