//! Router builder for the catalog HTTP server

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    Router,
};
use std::time::Duration;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::Uuid;

use crate::error::not_found_fallback;

/// Builder for constructing the main HTTP router.
///
/// Middleware is recorded and applied in `build`, after every route is in place,
/// so layers cover module routes regardless of call order.
pub struct RouterBuilder {
    router: Router,
    base_path: String,
    modules: Router,
    tracing: bool,
    request_id: bool,
    timeout: Option<Duration>,
}

impl RouterBuilder {
    /// Create a new router builder nesting modules under `base_path`
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            router: Router::new(),
            base_path: base_path.into(),
            modules: Router::new(),
            tracing: false,
            request_id: false,
            timeout: None,
        }
    }

    /// Add a top-level route
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under the base path
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        tracing::info!(
            module = module_name,
            "mounting module routes under {}",
            self.base_path
        );
        self.modules = self.modules.merge(module_router);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Add request ID middleware
    pub fn with_request_id(mut self) -> Self {
        self.request_id = true;
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(timeout_ms));
        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        let base_path = self.base_path.trim_end_matches('/');
        let mut router = if base_path.is_empty() {
            self.router.merge(self.modules)
        } else {
            self.router.nest(base_path, self.modules)
        };

        router = router.fallback(not_found_fallback);

        if let Some(timeout) = self.timeout {
            router = router.layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                timeout,
            ));
        }

        if self.tracing {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            );
        }

        if self.request_id {
            router = router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        }

        router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new("")
    }
}

/// Request ID generator for tracing
#[derive(Clone)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::now_v7()
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}
