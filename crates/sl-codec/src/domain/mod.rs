pub mod base62;
pub mod checksum;
pub mod obfuscate;

pub use base62::{Base62Error, ALPHABET, MAX_SAFE_LEN};
