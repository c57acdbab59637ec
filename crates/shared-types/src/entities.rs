//! # Core Domain Entities
//!
//! Defines the entities shared across the short-link workspace. These are
//! plain records with no behavior beyond conversions; every component that
//! reads or writes one of these goes through its own port trait rather
//! than mutating fields directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// HTTP/transport protocol a domain is served under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

/// A managed host under which short codes are issued and resolved.
///
/// Obfuscation parameters (`xor_secret`, `xor_rot`, `enable_xor_obfuscation`)
/// are set once at creation and MUST NOT change afterward — see
/// Data-model invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub id: u64,
    pub host: String,
    pub protocol: Protocol,
    pub is_active: bool,
    pub pass_query_params: bool,
    pub random_suffix_length: u8,
    pub enable_checksum: bool,
    pub enable_xor_obfuscation: bool,
    pub xor_secret: u64,
    pub xor_rot: u8,
    pub default_start_number: u64,
    /// Free-form display metadata; no behavior is attached to these.
    pub site_name: String,
    pub icp_number: String,
    pub police_number: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Domain {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A short-code to destination-URL mapping under one `Domain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortLink {
    pub id: u64,
    /// Set only when the code was machine-issued by C3; `None` for custom codes.
    pub issuer_number: Option<u64>,
    pub domain_id: u64,
    pub host: String,
    pub protocol: Protocol,
    pub original_url: String,
    pub short_code: String,
    pub is_custom_code: bool,
    pub title: String,
    pub description: String,
    pub creator_ip: String,
    pub click_count: u64,
    pub expire_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ShortLink {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Resolvable: not deleted, active, not expired.
    pub fn is_resolvable(&self, now: DateTime<Utc>) -> bool {
        if self.is_deleted() || !self.is_active {
            return false;
        }
        match self.expire_at {
            Some(at) => at > now,
            None => true,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expire_at, Some(at) if at <= now)
    }

    pub fn full_url(&self) -> String {
        format!("{}://{}/{}", self.protocol.as_str(), self.host, self.short_code)
    }
}

/// Lifecycle state of an `ABTest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ABTestStatus {
    Draft,
    Running,
    Paused,
    Completed,
}

impl ABTestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ABTestStatus::Draft => "draft",
            ABTestStatus::Running => "running",
            ABTestStatus::Paused => "paused",
            ABTestStatus::Completed => "completed",
        }
    }

    /// Whether `self -> to` is a legal experiment status transition.
    pub fn can_transition_to(&self, to: ABTestStatus) -> bool {
        use ABTestStatus::*;
        matches!(
            (self, to),
            (Draft, Draft)
                | (Draft, Running)
                | (Running, Paused)
                | (Running, Running)
                | (Running, Completed)
                | (Paused, Running)
                | (Paused, Paused)
                | (Paused, Completed)
        )
    }
}

/// How traffic is divided among an experiment's variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficSplit {
    Equal,
    Weighted,
    Custom,
}

/// An A/B experiment attached to exactly one `ShortLink`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ABTest {
    pub id: u64,
    pub short_link_id: u64,
    pub name: String,
    pub description: String,
    pub status: ABTestStatus,
    pub traffic_split: TrafficSplit,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ABTest {
    /// Activation check, excluding the variant-count
    /// half of the check (callers supply the active variant count).
    pub fn is_time_active(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active || self.status != ABTestStatus::Running {
            return false;
        }
        if let Some(start) = self.start_time {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.end_time {
            if now > end {
                return false;
            }
        }
        true
    }
}

/// One arm of an `ABTest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ABTestVariant {
    pub id: u64,
    pub ab_test_id: u64,
    pub name: String,
    pub description: String,
    pub target_url: String,
    pub weight: u8,
    pub is_control: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recorded, deduplicated click attributed to one experiment variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ABTestClickStatistic {
    pub id: u64,
    pub ab_test_id: u64,
    pub variant_id: u64,
    pub short_link_id: u64,
    pub ip: String,
    pub user_agent: String,
    pub referer: String,
    pub query_params: String,
    pub session_id: String,
    pub click_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A best-effort, non-deduplicated click against a short link with no
/// active experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickStatistic {
    pub id: u64,
    pub short_link_id: u64,
    pub ip: String,
    pub user_agent: String,
    pub referer: String,
    pub query_params: String,
    pub click_at: DateTime<Utc>,
}

/// Maximum field lengths enforced before persisting a click.
pub mod click_limits {
    pub const IP: usize = 45;
    pub const USER_AGENT: usize = 1024;
    pub const REFERER: usize = 2048;
    pub const QUERY_PARAMS: usize = 2048;
}

/// Truncate a string to at most `max` Unicode scalar values, preserving
/// char boundaries.
pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    value.chars().take(max).collect()
}
