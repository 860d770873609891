use std::collections::BTreeMap;

use crate::{
    api::transport::{WireRequest, WireResponse},
    core::{
        data_type::DataType,
        error::{FetchError, FetchResult},
        provider::Provider,
        request::FetchRequest,
    },
};

/// Translates normalized requests into what an upstream endpoint understands, and back.
pub trait DataProvider: Send + Sync {
    /// Longest time span in days that the endpoint accepts in a single call.
    fn supported_days_per_request(&self, request: &FetchRequest) -> u32;

    /// Sorted data types that this provider can fetch.
    fn implemented_data_types(&self) -> Vec<DataType>;

    fn implements(&self, data_type: DataType) -> bool {
        self.implemented_data_types().contains(&data_type)
    }

    /// # Panics
    ///
    /// Panics if the data type is not implemented by the provider.
    fn build_request(&self, request: &FetchRequest) -> WireRequest;

    /// Parse a successful response.
    fn parse_response(&self, response: &WireResponse, request: &FetchRequest) -> FetchResult;

    /// Classify an unsuccessful response, or return [`None`] when it is unknown to the provider.
    fn parse_error(&self, response: &WireResponse) -> Option<FetchError>;
}

/// Provider implementations keyed by provider identity.
#[derive(Default)]
pub struct Providers(BTreeMap<Provider, Box<dyn DataProvider>>);

impl Providers {
    #[must_use]
    pub fn with(mut self, provider: Provider, implementation: impl DataProvider + 'static) -> Self {
        self.0.insert(provider, Box::new(implementation));
        self
    }

    #[must_use]
    pub fn get(&self, provider: Provider) -> Option<&dyn DataProvider> {
        self.0.get(&provider).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn data_types(&self) -> BTreeMap<Provider, Vec<DataType>> {
        self.0
            .iter()
            .map(|(provider, implementation)| (*provider, implementation.implemented_data_types()))
            .collect()
    }
}
