//! Spins up a real gateway router on an ephemeral port so scenario tests
//! drive the full C1-C9 stack the same way a client would, instead of
//! reaching into crate internals.

use std::net::SocketAddr;

use gateway_runtime::GatewayConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub struct TestServer {
    pub base_url: String,
    client: reqwest::Client,
}

/// Boots an in-memory-backed gateway (`GatewayConfig::default()`) and
/// serves it on `127.0.0.1:0`. The listening task is dropped along with
/// the `#[tokio::test]` runtime at the end of each test.
pub async fn spawn() -> TestServer {
    let state = gateway_runtime::build_state(&GatewayConfig::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = gateway_runtime::routes::router(state);

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}"),
        client: reqwest::Client::new(),
    }
}

impl TestServer {
    pub async fn create_domain(&self, body: Value) -> Value {
        self.post_json("/api/v1/domains", body).await
    }

    pub async fn create_short_link(&self, body: Value) -> Value {
        self.post_json("/api/v1/short_links", body).await
    }

    pub async fn update_short_link(&self, id: u64, body: Value) -> Value {
        self.client
            .put(format!("{}/api/v1/short_links/{id}", self.base_url))
            .json(&body)
            .send()
            .await
            .unwrap()
            .json::<Value>()
            .await
            .unwrap()
    }

    pub async fn create_ab_test(&self, body: Value) -> Value {
        self.post_json("/api/v1/ab_tests", body).await
    }

    pub async fn create_variant(&self, ab_test_id: u64, body: Value) -> Value {
        self.post_json(&format!("/api/v1/ab_tests/{ab_test_id}/variants"), body)
            .await
    }

    pub async fn start_experiment(&self, ab_test_id: u64) -> Value {
        self.client
            .post(format!("{}/api/v1/ab_tests/{ab_test_id}/start", self.base_url))
            .send()
            .await
            .unwrap()
            .json::<Value>()
            .await
            .unwrap()
    }

    async fn post_json(&self, path: &str, body: Value) -> Value {
        self.client
            .post(format!("{}{path}", self.base_url))
            .json(&body)
            .send()
            .await
            .unwrap()
            .json::<Value>()
            .await
            .unwrap()
    }

    /// `GET /{code}` with the given `Host` header, without following the
    /// redirect, so the caller can inspect the status and `Location`.
    pub async fn get_redirect(&self, host: &str, code: &str) -> reqwest::Response {
        let client = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build().unwrap();
        client
            .get(format!("{}/{code}", self.base_url))
            .header("Host", host)
            .send()
            .await
            .unwrap()
    }

    pub async fn get_preview(&self, host: &str, code: &str) -> Value {
        self.client
            .get(format!("{}/preview/{code}", self.base_url))
            .header("Host", host)
            .send()
            .await
            .unwrap()
            .json::<Value>()
            .await
            .unwrap()
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> T {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .unwrap()
            .json::<T>()
            .await
            .unwrap()
    }
}
