//! # Anti-guess transform, step 4 — checksum glyph (C2)
//!
//! Grounded on `calculateChecksum` in
//! `examples/original_source/internal/pkg/id_generator/impl/id_generator_local.go`:
//! XOR the code points of every glyph emitted so far, reduce mod 62, and
//! use that as an index into the base-62 alphabet.

use super::base62::ALPHABET;

/// Compute the checksum glyph for everything emitted before it.
pub fn checksum_glyph(emitted_so_far: &str) -> u8 {
    let xor: u32 = emitted_so_far.chars().fold(0u32, |acc, ch| acc ^ (ch as u32));
    ALPHABET[(xor % 62) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_deterministic() {
        assert_eq!(checksum_glyph("abc"), checksum_glyph("abc"));
    }

    #[test]
    fn checksum_depends_on_input() {
        assert_ne!(checksum_glyph("abc"), checksum_glyph("abd"));
    }
}
