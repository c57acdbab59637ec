//! # Short-code encoding service (C2 orchestration)
//!
//! Combines the base-62 codec (C1) with the obfuscation, random-suffix,
//! and checksum steps into the single anti-guess transform pipeline.

use crate::domain::{base62, obfuscate};
use crate::ports::{OsRngSuffixSource, RandomSuffixSource};

/// Per-domain transform configuration (mirrors the relevant `Domain` fields).
#[derive(Debug, Clone, Copy)]
pub struct TransformConfig {
    pub random_suffix_length: u8,
    pub enable_checksum: bool,
    pub enable_xor_obfuscation: bool,
    pub xor_secret: u64,
    pub xor_rot: u8,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            random_suffix_length: 0,
            enable_checksum: false,
            enable_xor_obfuscation: false,
            xor_secret: 0,
            xor_rot: 1,
        }
    }
}

/// Applies the C2 anti-guess transform on top of the C1 base-62 codec.
pub struct ShortCodeEncoder<R: RandomSuffixSource = OsRngSuffixSource> {
    suffix_source: R,
}

impl ShortCodeEncoder<OsRngSuffixSource> {
    pub fn new() -> Self {
        Self {
            suffix_source: OsRngSuffixSource,
        }
    }
}

impl Default for ShortCodeEncoder<OsRngSuffixSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSuffixSource> ShortCodeEncoder<R> {
    pub fn with_suffix_source(suffix_source: R) -> Self {
        Self { suffix_source }
    }

    /// Encode issuer number `n` into an opaque short code per the 4-step
    /// anti-guess transform.
    pub fn encode(&self, n: u64, config: &TransformConfig) -> String {
        let transformed = if config.enable_xor_obfuscation {
            obfuscate::obfuscate(n, config.xor_secret, config.xor_rot)
        } else {
            n
        };

        let mut code = base62::encode(transformed);

        if config.random_suffix_length > 0 {
            code.push_str(&self.suffix_source.suffix(config.random_suffix_length));
        }

        if config.enable_checksum {
            let glyph = crate::domain::checksum::checksum_glyph(&code);
            code.push(glyph as char);
        }

        code
    }
}
