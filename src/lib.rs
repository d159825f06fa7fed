//! Rust client for the Atomik signing service: OAuth 2.0 client-credentials tokens,
//! RSA-signed requests, and HMAC-verified responses in one crate.
//!
//! Every call made through [`client::Client::execute`] obtains a bearer token, signs the
//! canonical form of the request body with the client's RSA key, and refuses to hand back
//! any response whose `X-SIGNATURE` header does not match the server's HMAC over the
//! response body.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod canonical;
pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
pub mod obs;
pub mod services;
pub mod signature;
pub mod token;


mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
