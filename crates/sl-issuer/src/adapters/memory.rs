//! In-process issuer backend: a mutex-guarded per-domain counter map.
//!
//! Mirrors the original `IDGeneratorLocal`: single-process, restart-time
//! seeding from the highest issuer number already on disk (the caller
//! computes that seed from `sl-link-store` and passes it to
//! [`InMemoryIssuer::initialize`] — this adapter has no store access of
//! its own).

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::IssuerError;
use crate::ports::IdIssuer;

#[derive(Default)]
pub struct InMemoryIssuer {
    counters: Mutex<HashMap<u64, u64>>,
}

impl InMemoryIssuer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdIssuer for InMemoryIssuer {
    fn initialize(&self, domain_id: u64, start: u64) -> Result<(), IssuerError> {
        let mut counters = self.counters.lock();
        let entry = counters.entry(domain_id).or_insert(0);
        if start > *entry {
            *entry = start;
        }
        Ok(())
    }

    fn next(&self, domain_id: u64) -> Result<u64, IssuerError> {
        let mut counters = self.counters.lock();
        let entry = counters.entry(domain_id).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    fn reset(&self, domain_id: u64, value: u64) -> Result<(), IssuerError> {
        self.counters.lock().insert(domain_id, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_increments_from_zero() {
        let issuer = InMemoryIssuer::new();
        assert_eq!(issuer.next(1).unwrap(), 1);
        assert_eq!(issuer.next(1).unwrap(), 2);
        assert_eq!(issuer.next(1).unwrap(), 3);
    }

    #[test]
    fn domains_are_independent() {
        let issuer = InMemoryIssuer::new();
        assert_eq!(issuer.next(1).unwrap(), 1);
        assert_eq!(issuer.next(2).unwrap(), 1);
        assert_eq!(issuer.next(1).unwrap(), 2);
    }

    #[test]
    fn initialize_seeds_restart_recovery() {
        let issuer = InMemoryIssuer::new();
        issuer.initialize(1, 9).unwrap();
        assert_eq!(issuer.next(1).unwrap(), 10);
    }

    #[test]
    fn initialize_never_moves_counter_backwards() {
        let issuer = InMemoryIssuer::new();
        issuer.next(1).unwrap();
        issuer.next(1).unwrap();
        issuer.next(1).unwrap(); // counter is now 3
        issuer.initialize(1, 1).unwrap();
        assert_eq!(issuer.next(1).unwrap(), 4);
    }

    #[test]
    fn reset_forces_the_counter_regardless_of_direction() {
        let issuer = InMemoryIssuer::new();
        issuer.next(1).unwrap();
        issuer.next(1).unwrap();
        issuer.reset(1, 0).unwrap();
        assert_eq!(issuer.next(1).unwrap(), 1);
    }
}
