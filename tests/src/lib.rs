//! # Cross-component test suite
//!
//! Hosts the end-to-end scenarios and cross-crate property checks that
//! span more than one `sl-*` crate: the redirect/issuance/experiment
//! flow through a real gateway router, and the fairness/determinism
//! properties of the experiment engine.

pub mod integration;
