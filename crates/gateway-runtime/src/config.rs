//! # Gateway Configuration
//!
//! Unified configuration for the HTTP gateway and the storage/issuer
//! backends it wires up, mirroring `node-runtime`'s `NodeConfig`: one
//! struct per subsystem, each with its own `Default`, composed into a
//! top-level struct loaded from the environment with sane fallbacks.

use std::path::PathBuf;

/// Complete gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub issuer: IssuerConfig,
    pub cache: CacheConfig,
}

impl GatewayConfig {
    /// Build configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: env_or("SL_BIND_ADDR", ServerConfig::default().bind_addr),
                port: env_parsed_or("SL_HTTP_PORT", ServerConfig::default().port),
            },
            storage: StorageConfig {
                data_dir: PathBuf::from(env_or(
                    "SL_DATA_DIR",
                    StorageConfig::default().data_dir.to_string_lossy().to_string(),
                )),
                backend: env_or("SL_STORAGE_BACKEND", StorageConfig::default().backend),
            },
            issuer: IssuerConfig {
                backend: env_or("SL_ISSUER_BACKEND", IssuerConfig::default().backend),
            },
            cache: CacheConfig {
                default_ttl_secs: env_parsed_or(
                    "SL_CACHE_TTL_SECS",
                    CacheConfig::default().default_ttl_secs,
                ),
            },
        }
    }

    /// Fail fast on configuration combinations that would silently produce
    /// an unsafe deployment.
    pub fn validate_for_production(&self) {
        if self.storage.backend == "rocksdb" && self.storage.data_dir.as_os_str().is_empty() {
            panic!("SL_DATA_DIR must be set when SL_STORAGE_BACKEND=rocksdb");
        }
        if self.issuer.backend != "memory" && self.issuer.backend != "remote" {
            panic!(
                "SL_ISSUER_BACKEND must be \"memory\" or \"remote\", got {:?}",
                self.issuer.backend
            );
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            issuer: IssuerConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Persistence backend configuration for C4/C6.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// "memory" (tests, ephemeral deployments) or "rocksdb" (production).
    pub backend: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            backend: "memory".to_string(),
        }
    }
}

/// C3 counter backend selection.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// "memory" (single process) or "remote" (cluster-wide, KV-backed).
    pub backend: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
        }
    }
}

/// C5 resolver cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub default_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 24 * 60 * 60,
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
