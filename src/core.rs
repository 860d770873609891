pub mod data_type;
pub mod error;
pub mod line;
pub mod merge;
pub mod point;
pub mod provider;
pub mod request;
pub mod share;
pub mod span;
