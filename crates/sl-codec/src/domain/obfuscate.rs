//! # Anti-guess transform, step 1 — XOR/rotation obfuscation (C2)
//!
//! Bijective within the base-62 digit-count range of `n`, so the visible
//! code length never changes. Grounded on
//! `examples/original_source/internal/pkg/id_generator/impl/id_generator_local.go`
//! (`obfuscateID`): normalize into `[min, max]` for `n`'s digit count,
//! rotate by `rot mod range_size`, then XOR with `secret mod range_size`.

use super::base62::digit_count;

fn pow62(exp: u32) -> u64 {
    62u64.saturating_pow(exp)
}

/// The `[min, max]` base-62 range that shares `n`'s digit count.
/// `pow62(0) == 1`, so `min == 1` for every 1-digit `n`, matching
/// `R = 62^d - 62^(d-1)` from spec.md §4.2 step (b) (61, not 62, for `d=1`).
fn digit_range(n: u64) -> (u64, u64) {
    let digits = digit_count(n);
    let min = pow62(digits - 1);
    let max = pow62(digits) - 1;
    (min, max)
}

/// Apply the obfuscation bijection to `n`. Preserves `digit_count(n)` for
/// every `n` the issuer ever produces (`n >= 1`, since `IdIssuer::next`
/// increments before returning). `n == 0` falls outside the `[min, max]`
/// range this bijection is defined over — `wrapping_sub`/`wrapping_add`
/// mirror the unsigned-overflow behavior of the original Go arithmetic
/// rather than panicking, but the result for `n == 0` is not meaningful.
pub fn obfuscate(n: u64, secret: u64, rot: u8) -> u64 {
    let (min, max) = digit_range(n);
    let range_size = max - min + 1;

    let normalized = n.wrapping_sub(min);
    let rotated = if rot > 0 && range_size > 1 {
        let rot_amount = (rot as u64) % range_size;
        (normalized + rot_amount) % range_size
    } else {
        normalized
    };

    // XORing two values below a non-power-of-two `range_size` can land just
    // above it (e.g. range_size=61, 60^1=61); fold back in rather than leak
    // a digit into the next base-62 length.
    let obfuscated = (rotated ^ (secret % range_size)) % range_size;
    obfuscated.wrapping_add(min)
}
