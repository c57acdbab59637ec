use thiserror::Error;

/// Cache failures are deliberately non-fatal to callers: the resolution
/// pipeline (C8) treats any `Err` the same as a cache miss and falls
/// through to the durable store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}
