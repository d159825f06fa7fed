//! Transport primitives shared by the token manager and the request executor.
//!
//! [`ReqwestHttpClient`] wraps the reqwest client so redirect policy, per-call timeouts, and
//! error classification live in one place. Every call goes through [`ReqwestHttpClient::send`],
//! which buffers the response into a [`RawResponse`] and maps transport failures onto the
//! client's error hierarchy: timeouts become [`ServerError::Timeout`], everything else a
//! [`TransportError`].

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use reqwest::{RequestBuilder, header::HeaderMap, redirect::Policy};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ServerError, TransportError},
};

/// Thin wrapper around [`ReqwestClient`].
///
/// Signed endpoints answer directly, so the default client does not follow redirects; a
/// redirected request would reach a path that was not part of the signature.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds the default client (no redirects).
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(Policy::none())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Sends `request` under `timeout` and buffers the full response.
	pub(crate) async fn send(
		&self,
		endpoint: &str,
		request: RequestBuilder,
		timeout: StdDuration,
	) -> Result<RawResponse> {
		let response =
			request.timeout(timeout).send().await.map_err(|e| map_reqwest_error(endpoint, e))?;
		let status = response.status().as_u16();
		let headers = response.headers().to_owned();
		let body = response.bytes().await.map_err(|e| map_reqwest_error(endpoint, e))?.to_vec();

		Ok(RawResponse { status, headers, body })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Fully buffered HTTP response.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Returns a header value when it is present and valid visible ASCII.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Returns a header value or [`ServerError::MissingHeader`].
	pub fn required_header(&self, name: &'static str) -> Result<&str, ServerError> {
		self.header(name).ok_or(ServerError::MissingHeader { header: name })
	}

	/// Decodes the body as JSON, reporting the path of the first mismatch.
	pub fn json<T>(&self) -> Result<T, ServerError>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ServerError::MalformedBody { status: self.status, source })
	}

	/// Lossy UTF-8 view of the body for diagnostics.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Classifies a reqwest failure for the call to `endpoint`.
pub(crate) fn map_reqwest_error(endpoint: &str, e: ReqwestError) -> Error {
	if e.is_timeout() {
		return ServerError::Timeout { endpoint: endpoint.to_owned(), source: Box::new(e) }.into();
	}
	if e.is_builder() {
		return ConfigError::RequestBuild { endpoint: endpoint.to_owned(), source: Box::new(e) }
			.into();
	}

	TransportError::network(endpoint, e).into()
}
