//! Shared fixtures for router tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use http_body_util::BodyExt;
use tower::ServiceExt;

use mimic_axum::{AxumContext, create_router};
use mimic_core::{
    FaultInjector, ProxyRegistry, StatusState, UpstreamClient, UpstreamError, UpstreamRequest,
    UpstreamResponse,
};

/// Upstream client returning a canned result and recording what it was sent.
#[derive(Default)]
pub struct StubUpstream {
    result: Mutex<Option<Result<UpstreamResponse, UpstreamError>>>,
    pub requests: Mutex<Vec<UpstreamRequest>>,
}

impl StubUpstream {
    pub fn responding(status: u16, body: &'static str) -> Arc<Self> {
        Self::responding_with(UpstreamResponse::new(status, body))
    }

    pub fn responding_with(response: UpstreamResponse) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Some(Ok(response))),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: UpstreamError) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Some(Err(err))),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamClient for StubUpstream {
    async fn execute(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        self.requests.lock().unwrap().push(request);
        self.result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(UpstreamError::Dispatch("no canned response".into())))
    }
}

/// Counts fault injections instead of performing them.
#[derive(Default)]
pub struct RecordingFaults {
    pub crashes: AtomicUsize,
    pub memory_spikes: AtomicUsize,
    pub cpu_spikes: AtomicUsize,
}

impl FaultInjector for RecordingFaults {
    fn crash(&self) {
        self.crashes.fetch_add(1, Ordering::SeqCst);
    }

    fn crash_requested(&self) -> bool {
        self.crashes.load(Ordering::SeqCst) > 0
    }

    fn spike_memory(&self) {
        self.memory_spikes.fetch_add(1, Ordering::SeqCst);
    }

    fn spike_cpu(&self) {
        self.cpu_spikes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Everything a test needs to poke at after building the router.
pub struct TestApp {
    pub router: Router,
    pub upstream: Arc<StubUpstream>,
    pub faults: Arc<RecordingFaults>,
    pub proxies: Arc<ProxyRegistry>,
}

impl TestApp {
    pub fn new(upstream: Arc<StubUpstream>) -> Self {
        Self::with_options(upstream, true, true, None)
    }

    pub fn with_options(
        upstream: Arc<StubUpstream>,
        healthy: bool,
        ready: bool,
        version_override: Option<&str>,
    ) -> Self {
        let faults = Arc::new(RecordingFaults::default());
        let ctx = AxumContext::new(
            StatusState::new(healthy, ready),
            upstream.clone(),
            faults.clone(),
            version_override.map(str::to_string),
        );
        let proxies = ctx.proxies.clone();
        Self {
            router: create_router(ctx),
            upstream,
            faults,
            proxies,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> Response<Body> {
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn put(&self, uri: &str) -> Response<Body> {
        self.send(Method::PUT, uri, None).await
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
