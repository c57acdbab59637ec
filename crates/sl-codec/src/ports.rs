//! # Outbound port: source of random glyphs for the suffix step.
//!
//! Abstracted so tests can inject a deterministic source; production uses
//! [`OsRngSuffixSource`], backed by a cryptographically strong RNG as
//! the anti-guess transform requires.

use rand::RngCore;

use crate::domain::ALPHABET;

pub trait RandomSuffixSource: Send + Sync {
    /// Draw `len` glyphs uniformly from the base-62 alphabet.
    fn suffix(&self, len: u8) -> String;
}

/// Default suffix source using the OS CSPRNG.
#[derive(Default)]
pub struct OsRngSuffixSource;

impl RandomSuffixSource for OsRngSuffixSource {
    fn suffix(&self, len: u8) -> String {
        let mut rng = rand::rngs::OsRng;
        (0..len)
            .map(|_| {
                let idx = (rng.next_u32() % 62) as usize;
                ALPHABET[idx] as char
            })
            .collect()
    }
}
