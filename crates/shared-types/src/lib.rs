//! # Shared Types Crate
//!
//! Single source of truth for the domain entities (`Domain`, `ShortLink`,
//! `ABTest`, ...) plus the management-API envelope. Every other crate in
//! the workspace depends on this one instead of redefining them locally.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
