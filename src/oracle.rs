//! Final round-trip check of the last signature produced by the timing loop.
//!
//! Timing a broken implementation gives meaningless numbers, so after all
//! trials the harness opens the last signed message once more, outside the
//! timed region, and compares the result byte for byte with the original.

use crate::context::BenchContext;
use crate::error::VerificationFailure;
use crate::scheme::SignatureScheme;

/// Re-open the context's signed message and compare it with the original.
///
/// Checks, in order: `open` succeeds, the recovered length matches, the
/// recovered bytes match.
pub fn check_roundtrip<S: SignatureScheme + ?Sized>(
    scheme: &S,
    ctx: &mut BenchContext,
) -> Result<(), VerificationFailure> {
    let result = compare(scheme, ctx);
    match &result {
        Ok(()) => tracing::info!(scheme = scheme.info().parameter_set, "final signature verified"),
        Err(failure) => tracing::error!(
            scheme = scheme.info().parameter_set,
            %failure,
            "final signature did not verify"
        ),
    }
    result
}

fn compare<S: SignatureScheme + ?Sized>(
    scheme: &S,
    ctx: &mut BenchContext,
) -> Result<(), VerificationFailure> {
    let recovered_len = ctx.open(scheme).map_err(VerificationFailure::Rejected)?;

    let expected = ctx.message().len();
    if recovered_len != expected {
        return Err(VerificationFailure::LengthMismatch {
            expected,
            actual: recovered_len,
        });
    }

    match ctx.message().iter().zip(ctx.recovered()).position(|(a, b)| a != b) {
        Some(offset) => Err(VerificationFailure::ContentMismatch { offset }),
        None => Ok(()),
    }
}
