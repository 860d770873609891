//! Saving and loading data lines as JSON.

use crate::{core::line::DataLine, prelude::*};

pub fn to_json(lines: &[DataLine]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(lines).context("failed to serialize the data lines")
}

pub fn from_json(bytes: &[u8]) -> Result<Vec<DataLine>> {
    serde_json::from_slice(bytes).context("failed to deserialize the data lines")
}
