mod client;
pub mod fingrid;
pub mod fmi;
pub mod provider;
pub mod transport;

pub use self::{
    client::HttpTransport,
    provider::{DataProvider, Providers},
    transport::{Transport, WireRequest, WireResponse},
};
