//! Counter-seeding on restart (C3 + the `gateway-runtime` startup hook).
//!
//! A fresh in-memory issuer has no memory of what was issued before the
//! process restarted; `seed_issuer_on_startup` must read the durable
//! store's high-water mark back into the counter before any new code is
//! minted, or a restart would silently reissue already-used codes.

use std::sync::Arc;

use chrono::Utc;
use shared_types::{Domain, Protocol, ShortLink};
use sl_issuer::{IdIssuer, InMemoryIssuer};
use sl_link_store::{DomainStore, ShortLinkStore};
use sl_storage_kit::{InMemoryKVStore, KeyValueStore};

fn sample_domain(host: &str, default_start_number: u64) -> Domain {
    let now = Utc::now();
    Domain {
        id: 0,
        host: host.to_string(),
        protocol: Protocol::Https,
        is_active: true,
        pass_query_params: false,
        random_suffix_length: 0,
        enable_checksum: false,
        enable_xor_obfuscation: false,
        xor_secret: 0,
        xor_rot: 1,
        default_start_number,
        site_name: String::new(),
        icp_number: String::new(),
        police_number: String::new(),
        description: String::new(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

fn sample_link(domain_id: u64, host: &str, issuer_number: u64, short_code: &str) -> ShortLink {
    let now = Utc::now();
    ShortLink {
        id: 0,
        issuer_number: Some(issuer_number),
        domain_id,
        host: host.to_string(),
        protocol: Protocol::Https,
        original_url: "https://example.com/recovered".to_string(),
        short_code: short_code.to_string(),
        is_custom_code: false,
        title: String::new(),
        description: String::new(),
        creator_ip: "127.0.0.1".to_string(),
        click_count: 0,
        expire_at: None,
        is_active: true,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

#[test]
fn seed_issuer_on_startup_reads_the_high_water_mark() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKVStore::new());
    let issuer: Arc<dyn IdIssuer> = Arc::new(InMemoryIssuer::new());
    let state = gateway_runtime::AppState::new(kv, issuer);

    let domain = state.domain_store.create(sample_domain("boot.test", 5)).unwrap();
    state.link_store.create(sample_link(domain.id, "boot.test", 42, "g")).unwrap();
    state.link_store.create(sample_link(domain.id, "boot.test", 17, "h")).unwrap();

    gateway_runtime::seed_issuer_on_startup(&state).unwrap();

    let next = state.issuer.next(domain.id).unwrap();
    assert!(next > 42, "next() returned {next}, expected > 42");
}

#[test]
fn seed_issuer_on_startup_falls_back_to_default_start_number_with_no_links() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKVStore::new());
    let issuer: Arc<dyn IdIssuer> = Arc::new(InMemoryIssuer::new());
    let state = gateway_runtime::AppState::new(kv, issuer);

    let domain = state.domain_store.create(sample_domain("empty.test", 9)).unwrap();
    gateway_runtime::seed_issuer_on_startup(&state).unwrap();

    let next = state.issuer.next(domain.id).unwrap();
    assert_eq!(next, 10);
}

#[test]
fn seed_issuer_on_startup_is_a_no_op_for_a_counter_already_ahead() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKVStore::new());
    let issuer: Arc<dyn IdIssuer> = Arc::new(InMemoryIssuer::new());
    let state = gateway_runtime::AppState::new(kv, issuer);

    let domain = state.domain_store.create(sample_domain("ahead.test", 0)).unwrap();
    state.link_store.create(sample_link(domain.id, "ahead.test", 3, "d")).unwrap();
    state.issuer.initialize(domain.id, 1000).unwrap();

    gateway_runtime::seed_issuer_on_startup(&state).unwrap();

    let next = state.issuer.next(domain.id).unwrap();
    assert_eq!(next, 1001);
}

#[test]
fn seed_issuer_on_startup_skips_inactive_domains() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKVStore::new());
    let issuer: Arc<dyn IdIssuer> = Arc::new(InMemoryIssuer::new());
    let state = gateway_runtime::AppState::new(kv, issuer);

    let mut domain = state.domain_store.create(sample_domain("paused.test", 0)).unwrap();
    state.link_store.create(sample_link(domain.id, "paused.test", 500, "z")).unwrap();
    domain.is_active = false;
    state.domain_store.update(domain.clone()).unwrap();

    gateway_runtime::seed_issuer_on_startup(&state).unwrap();

    // The domain was never seeded: an uninitialized counter starts at zero.
    let next = state.issuer.next(domain.id).unwrap();
    assert_eq!(next, 1);
}
