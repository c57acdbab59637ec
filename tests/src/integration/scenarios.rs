//! End-to-end scenarios driven over a real HTTP listener (see
//! [`super::harness`]). Each test below stands in for one of the worked
//! examples a reviewer would hand-trace against the redirect/issuance/
//! experiment pipeline.

use serde_json::json;

use super::harness;

#[tokio::test]
async fn auto_code_with_no_obfuscation_encodes_the_counter_value() {
    let server = harness::spawn().await;
    let domain = server
        .create_domain(json!({
            "host": "auto.test",
            "default_start_number": 9,
        }))
        .await;
    let domain_id = domain["data"]["id"].as_u64().unwrap();
    assert_eq!(domain_id > 0, true);

    let link = server
        .create_short_link(json!({
            "original_url": "https://example.com/landing",
            "domain": "auto.test",
        }))
        .await;

    assert_eq!(link["data"]["short_code"], "a");
    assert_eq!(link["data"]["issuer_number"], 10);
    assert_eq!(link["data"]["is_custom_code"], false);
}

#[tokio::test]
async fn checksum_and_suffix_preserve_the_documented_structure() {
    let server = harness::spawn().await;
    server
        .create_domain(json!({
            "host": "checksum.test",
            "default_start_number": 0,
            "random_suffix_length": 2,
            "enable_checksum": true,
        }))
        .await;

    let link = server
        .create_short_link(json!({
            "original_url": "https://example.com/promo",
            "domain": "checksum.test",
        }))
        .await;

    let code = link["data"]["short_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 4);
    assert!(code.starts_with('1'));

    let body = &code[..code.len() - 1];
    let expected_checksum = sl_codec::domain::checksum::checksum_glyph(body);
    assert_eq!(code.as_bytes()[3], expected_checksum);
}

#[tokio::test]
async fn custom_code_collision_is_rejected_as_a_conflict() {
    let server = harness::spawn().await;
    server.create_domain(json!({"host": "collide.test"})).await;

    let first = server
        .create_short_link(json!({
            "original_url": "https://example.com/one",
            "domain": "collide.test",
            "custom_code": "promo",
        }))
        .await;
    assert_eq!(first["code"], 0);
    assert_eq!(first["data"]["short_code"], "promo");

    let second = server
        .create_short_link(json!({
            "original_url": "https://example.com/two",
            "domain": "collide.test",
            "custom_code": "promo",
        }))
        .await;
    assert_eq!(second["code"], 409);
    assert!(second["data"].is_null());
}

#[tokio::test]
async fn expired_link_returns_410_and_records_no_click() {
    let server = harness::spawn().await;
    server.create_domain(json!({"host": "expire.test"})).await;

    let link = server
        .create_short_link(json!({
            "original_url": "https://example.com/expiring",
            "domain": "expire.test",
            "custom_code": "soon",
            "expire_at": (chrono::Utc::now() + chrono::Duration::milliseconds(300)).to_rfc3339(),
        }))
        .await;
    let short_link_id = link["data"]["id"].as_u64().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(600)).await;

    let response = server.get_redirect("expire.test", "soon").await;
    assert_eq!(response.status(), reqwest::StatusCode::GONE);

    let clicks: serde_json::Value = server
        .get_json(&format!("/api/v1/click_statistics?short_link_id={short_link_id}"))
        .await;
    assert_eq!(clicks["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_code_returns_404() {
    let server = harness::spawn().await;
    server.create_domain(json!({"host": "missing.test"})).await;

    let response = server.get_redirect("missing.test", "nope").await;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preview_resolves_without_incrementing_click_count() {
    let server = harness::spawn().await;
    server.create_domain(json!({"host": "preview.test"})).await;
    let link = server
        .create_short_link(json!({
            "original_url": "https://example.com/preview-target",
            "domain": "preview.test",
            "custom_code": "peek",
        }))
        .await;
    let short_link_id = link["data"]["id"].as_u64().unwrap();

    let preview = server.get_preview("preview.test", "peek").await;
    assert_eq!(preview["original_url"], "https://example.com/preview-target");

    let redirect = server.get_redirect("preview.test", "peek").await;
    assert_eq!(redirect.status(), reqwest::StatusCode::FOUND);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let stats: serde_json::Value = server
        .get_json(&format!("/api/v1/short_links/{short_link_id}/statistics"))
        .await;
    // The live redirect above is the only click that should have landed;
    // the preview call must not have contributed to the count.
    assert_eq!(stats["data"]["click_count"], 1);
}

#[tokio::test]
async fn query_params_are_appended_when_the_domain_permits_it() {
    let server = harness::spawn().await;
    server
        .create_domain(json!({"host": "query.test", "pass_query_params": true}))
        .await;
    server
        .create_short_link(json!({
            "original_url": "https://example.com/target",
            "domain": "query.test",
            "custom_code": "q",
        }))
        .await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let response = client
        .get(format!("{}/q?utm_source=campaign", server.base_url))
        .header("Host", "query.test")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::FOUND);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert_eq!(location, "https://example.com/target?utm_source=campaign");
}
