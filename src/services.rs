//! Endpoint wrappers built on [`crate::client::Client::execute`].

pub mod signer;

pub use signer::*;
