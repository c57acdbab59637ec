//! Session-id derivation.
//!
//! `session_id = MD5_hex(ip + ":" + user_agent + ":" + ab_test_id + ":" +
//! YYYY-MM-DD)`, stable for one (ip, user_agent, experiment) tuple for one
//! server-local calendar day.

use chrono::NaiveDate;

pub fn derive_session_id(ip: &str, user_agent: &str, ab_test_id: u64, date: NaiveDate) -> String {
    let input = format!("{ip}:{user_agent}:{ab_test_id}:{}", date.format("%Y-%m-%d"));
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// `Σ code_point(ch) for ch in session_id`, the PRNG seed
/// §4.7 step 1 specifies.
pub fn seed_from_session_id(session_id: &str) -> u64 {
    session_id.chars().map(|c| c as u64).sum()
}
