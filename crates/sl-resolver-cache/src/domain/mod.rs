pub mod errors;

pub use errors::CacheError;

/// Builds the `shortlink:{host}:{short_code}` cache key.
pub fn cache_key(host: &str, short_code: &str) -> String {
    format!("shortlink:{host}:{short_code}")
}
