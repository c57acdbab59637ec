//! # `sl-link-store` — durable short-link and domain registry (C4)
//!
//! Both stores layer secondary indexes over a single
//! [`sl_storage_kit::KeyValueStore`], the way the teacher's
//! `qc-02-block-storage` layers block/transaction indexes over its own
//! key-value substrate.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{KvClickStatisticStore, KvDomainStore, KvShortLinkStore};
pub use domain::{ListFilter, StoreError};
pub use ports::{ClickStatisticStore, DomainStore, ShortLinkStore};
