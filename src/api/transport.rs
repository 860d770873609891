use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use reqwest::Url;

use crate::prelude::*;

/// Provider-specific network request, ready to be sent as is.
#[derive(Clone, Debug)]
#[must_use]
pub struct WireRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

/// Raw upstream response, successful or not.
#[derive(Clone, Debug)]
#[must_use]
pub struct WireResponse {
    pub status: StatusCode,
    pub body: String,
}

impl WireResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[cfg(test)]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

/// The only place where fetching actually touches the network.
///
/// Non-successful statuses must be returned as responses, so that providers can classify them.
/// An error means that there is no response at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: WireRequest) -> Result<WireResponse>;
}

#[cfg(test)]
pub mod stub {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Answers requests with a closure and counts the calls.
    pub struct StubTransport<F> {
        respond: F,
        n_calls: AtomicUsize,
    }

    impl<F> StubTransport<F>
    where
        F: Fn(&WireRequest) -> Result<WireResponse> + Send + Sync,
    {
        pub const fn new(respond: F) -> Self {
            Self { respond, n_calls: AtomicUsize::new(0) }
        }

        pub fn n_calls(&self) -> usize {
            self.n_calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl<F> Transport for StubTransport<F>
    where
        F: Fn(&WireRequest) -> Result<WireResponse> + Send + Sync,
    {
        async fn send(&self, request: WireRequest) -> Result<WireResponse> {
            self.n_calls.fetch_add(1, Ordering::Relaxed);

            // Let the concurrent fetches interleave like they would on the network.
            tokio::task::yield_now().await;

            (self.respond)(&request)
        }
    }

    /// Look up a query parameter of the request.
    pub fn query(request: &WireRequest, key: &str) -> Option<String> {
        request.url.query_pairs().find(|(name, _)| name == key).map(|(_, value)| value.into_owned())
    }
}
