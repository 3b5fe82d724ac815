#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Everything here drives the real kernel code: real lifecycle, real
//! dispatcher, real registry. Only the template renderer is swapped out where a
//! test needs to observe render calls.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use trellis_kernel::content::BlockRegistry;
use trellis_kernel::lifecycle::{Lifecycle, ReadyContext};
use trellis_kernel::tap::{TapDispatcher, TapRegistry};
use trellis_kernel::{AppState, Config};

/// Fire `lifecycle` against `taps` and a fresh registry.
pub fn fire(lifecycle: &Lifecycle, taps: Arc<TapRegistry>) -> BlockRegistry {
    let dispatcher = TapDispatcher::new(taps);
    let registry = BlockRegistry::new();
    let report = lifecycle
        .fire_ready(ReadyContext::new(&dispatcher, &registry))
        .expect("ready event fires once");
    assert!(report.is_success(), "listener failures: {:?}", report.failures);
    registry
}

/// Test application with the bundled blocks and theme.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(&Config::default()).expect("default state assembles");
        let router = trellis_kernel::routes::app(state.clone());
        Self { state, router }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Response {
        self.request(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

/// Read a response body as a string.
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
