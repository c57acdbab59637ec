//! Statistical properties of variant selection (C7) that only show up
//! across a large population of distinct sessions, exercised directly
//! against the selection primitives rather than through 10,000 HTTP round
//! trips.

use chrono::Utc;
use shared_types::{ABTestVariant, TrafficSplit};
use sl_experiment_engine::{derive_session_id, select_variant};

const SAMPLE_SIZE: u64 = 10_000;
const TOLERANCE: f64 = 0.02;

fn variant(id: u64, name: &str, weight: u8) -> ABTestVariant {
    let now = Utc::now();
    ABTestVariant {
        id,
        ab_test_id: 1,
        name: name.to_string(),
        description: String::new(),
        target_url: format!("https://example.com/{name}"),
        weight,
        is_control: name == "control",
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn session_ids(count: u64) -> Vec<String> {
    let date = Utc::now().date_naive();
    (0..count)
        .map(|i| derive_session_id(&format!("203.0.113.{}", i % 255), &format!("ua-{i}"), 1, date))
        .collect()
}

#[test]
fn weighted_split_stays_within_two_percent_of_nominal() {
    let variants = vec![variant(1, "control", 60), variant(2, "treatment", 40)];
    let sessions = session_ids(SAMPLE_SIZE);
    // `derive_session_id` is deterministic per (ip, user_agent, day); two
    // distinct synthetic identities can collide at this scale, so dedup
    // before counting to keep the sample honestly at SAMPLE_SIZE distinct ids.
    let mut distinct: Vec<String> = sessions;
    distinct.sort();
    distinct.dedup();

    let mut counts = [0u64; 2];
    for session_id in &distinct {
        let picked = select_variant(session_id, TrafficSplit::Weighted, &variants).unwrap();
        counts[(picked.id - 1) as usize] += 1;
    }

    let total = distinct.len() as f64;
    let control_share = counts[0] as f64 / total;
    let treatment_share = counts[1] as f64 / total;

    assert!(
        (control_share - 0.60).abs() <= TOLERANCE,
        "control share {control_share} strayed from 0.60 by more than {TOLERANCE}"
    );
    assert!(
        (treatment_share - 0.40).abs() <= TOLERANCE,
        "treatment share {treatment_share} strayed from 0.40 by more than {TOLERANCE}"
    );
}

#[test]
fn equal_split_stays_within_two_percent_of_half() {
    let variants = vec![variant(1, "control", 50), variant(2, "treatment", 50)];
    let mut sessions = session_ids(SAMPLE_SIZE);
    sessions.sort();
    sessions.dedup();

    let mut counts = [0u64; 2];
    for session_id in &sessions {
        let picked = select_variant(session_id, TrafficSplit::Equal, &variants).unwrap();
        counts[(picked.id - 1) as usize] += 1;
    }

    let total = sessions.len() as f64;
    for share in counts.iter().map(|c| *c as f64 / total) {
        assert!((share - 0.5).abs() <= TOLERANCE, "share {share} strayed from 0.5 by more than {TOLERANCE}");
    }
}

#[test]
fn the_same_session_id_always_yields_the_same_variant_across_1000_calls() {
    let variants = vec![variant(1, "control", 50), variant(2, "treatment", 50)];
    let session_id = derive_session_id("198.51.100.7", "curl/8", 1, Utc::now().date_naive());

    let first = select_variant(&session_id, TrafficSplit::Equal, &variants).unwrap().id;
    for _ in 0..1000 {
        let picked = select_variant(&session_id, TrafficSplit::Equal, &variants).unwrap();
        assert_eq!(picked.id, first);
    }
}
