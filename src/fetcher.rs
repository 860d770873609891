use std::collections::BTreeMap;

use futures_util::future::join_all;

use crate::{
    api::{DataProvider, Providers, Transport},
    core::{
        data_type::DataType,
        error::{FetchError, FetchResult},
        merge::combine,
        provider::Provider,
        request::FetchRequest,
    },
    prelude::*,
};

/// Single entry point for fetching data lines from any provider.
///
/// Requests longer than a provider accepts are split, fetched concurrently, and merged back.
pub struct Fetcher<T> {
    transport: T,
    providers: Providers,
}

impl<T: Transport> Fetcher<T> {
    pub const fn new(transport: T, providers: Providers) -> Self {
        Self { transport, providers }
    }

    #[cfg(test)]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Data types available from each registered provider, without touching the network.
    #[must_use]
    pub fn provider_data_types(&self) -> BTreeMap<Provider, Vec<DataType>> {
        self.providers.data_types()
    }

    /// Fetch one logical data line.
    ///
    /// # Panics
    ///
    /// Panics if the provider is not registered.
    #[instrument(
        skip_all,
        fields(provider = %request.provider, data_type = %request.data_type, time_span = ?request.time_span),
    )]
    pub async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        assert!(request.time_span.start <= request.time_span.end, "invalid time span");
        let Some(provider) = self.providers.get(request.provider) else {
            panic!("provider {} is not registered", request.provider);
        };

        if !provider.implements(request.data_type) {
            warn!("data type is not implemented by the provider");
            return Err(FetchError::TypeNotImplementedByProvider);
        }

        let safe_days = provider.supported_days_per_request(request);
        if request.time_span.days() <= i64::from(safe_days) {
            return self.fetch_once(provider, request).await;
        }

        let requests = request
            .time_span
            .split(safe_days)
            .into_iter()
            .map(|time_span| request.with_time_span(time_span))
            .collect::<Vec<_>>();
        info!(n_parts = requests.len(), safe_days, "splitting…");
        combine(join_all(requests.iter().map(|request| self.fetch_once(provider, request))).await)
    }

    /// Fetch all the requests concurrently.
    ///
    /// The results are in the same order as the requests.
    #[instrument(skip_all, fields(n_requests = requests.len()))]
    pub async fn fetch_all(&self, requests: &[FetchRequest]) -> Vec<FetchResult> {
        join_all(requests.iter().map(|request| self.fetch(request))).await
    }

    /// Issue exactly one network call.
    async fn fetch_once(&self, provider: &dyn DataProvider, request: &FetchRequest) -> FetchResult {
        let response = match self.transport.send(provider.build_request(request)).await {
            Ok(response) => response,
            Err(error) => {
                warn!("request failed: {error:#}");
                return Err(FetchError::ConnectionFailed);
            }
        };
        if response.status.is_success() {
            return provider.parse_response(&response, request);
        }
        Err(provider.parse_error(&response).unwrap_or_else(|| {
            warn!(status = %response.status, "unclassified error response");
            FetchError::ConnectionFailed
        }))
    }
}
