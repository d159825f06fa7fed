//! Client-level error types shared across token, signing, and request layers.
//!
//! Protocol-level failures surface as [`Error`]; business-level failures (a non-200 response
//! whose signature verifies) are returned as [`crate::envelope::Envelope::Error`] instead.

// self
use crate::{
	_prelude::*, auth::CredentialsError, canonical::CanonicalError, signature::SignError,
};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token endpoint refused the client credentials.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Server answered in a way the protocol does not allow.
	#[error(transparent)]
	Server(#[from] ServerError),
	/// Transport failure (DNS, TCP, TLS) other than a timeout.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Outbound request could not be signed.
	#[error(transparent)]
	Sign(#[from] SignError),
}
impl Error {
	/// Returns `true` when a network call exceeded the configured timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Server(ServerError::Timeout { .. }))
	}

	/// Returns `true` when the response signature could not be verified.
	pub fn is_invalid_signature(&self) -> bool {
		matches!(self, Self::Server(ServerError::InvalidSignature(_)))
	}

	/// Returns `true` for every [`ServerError`], including timeouts and signature failures.
	pub fn is_server(&self) -> bool {
		matches!(self, Self::Server(_))
	}

	/// Returns `true` when the token endpoint rejected the credentials.
	pub fn is_auth(&self) -> bool {
		matches!(self, Self::Auth(_))
	}
}
impl From<InvalidSignatureError> for Error {
	fn from(e: InvalidSignatureError) -> Self {
		ServerError::from(e).into()
	}
}

/// Token endpoint answered with a non-200 status.
#[derive(Debug, ThisError)]
#[error("Token endpoint rejected the client credentials with HTTP {status}.")]
pub struct AuthError {
	/// HTTP status code returned by the token endpoint.
	pub status: u16,
	/// Leading part of the response body, kept for diagnostics.
	pub body_preview: String,
}
impl AuthError {
	const PREVIEW_LIMIT: usize = 256;

	/// Builds an error from the status and raw body, truncating the body preview.
	pub fn new(status: u16, body: &str) -> Self {
		let body_preview = match body.char_indices().nth(Self::PREVIEW_LIMIT) {
			Some((idx, _)) => body[..idx].to_owned(),
			None => body.to_owned(),
		};

		Self { status, body_preview }
	}
}

/// Protocol-level server failures.
#[derive(Debug, ThisError)]
pub enum ServerError {
	/// The call did not complete within the configured timeout.
	#[error("Request to `{endpoint}` timed out.")]
	Timeout {
		/// Path of the endpoint that timed out.
		endpoint: String,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Response body is not valid JSON or does not match the expected shape.
	#[error("Server returned a malformed body (HTTP {status}).")]
	MalformedBody {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A header the protocol requires is absent or not valid text.
	#[error("Response is missing the `{header}` header.")]
	MissingHeader {
		/// Header name.
		header: &'static str,
	},
	/// The response signature did not verify.
	#[error(transparent)]
	InvalidSignature(#[from] InvalidSignatureError),
}

/// Reasons a response signature is rejected.
#[derive(Debug, ThisError)]
pub enum InvalidSignatureError {
	/// The received signature differs from the computed digest.
	#[error("Response signature does not match the computed digest (HTTP {status}).")]
	Mismatch {
		/// HTTP status code of the rejected response.
		status: u16,
	},
	/// `X-TIMESTAMP` is not an ISO-8601 date-time.
	#[error("Response timestamp `{value}` is not ISO-8601.")]
	Timestamp {
		/// Raw header value.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: time::error::Parse,
	},
	/// The response body could not be put into canonical form.
	#[error("Response body could not be canonicalized.")]
	Canonical(#[source] CanonicalError),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{endpoint}`.")]
	Network {
		/// Path of the endpoint being called.
		endpoint: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint: endpoint.into(), source: Box::new(src) }
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Credentials failed validation.
	#[error(transparent)]
	Credentials(#[from] CredentialsError),
	/// Endpoint path cannot be joined onto the base URL.
	#[error("Endpoint path `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A header name or value cannot be encoded.
	#[error("Header `{name}` cannot be encoded.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// The request could not be assembled by the transport.
	#[error("Request to `{endpoint}` could not be built.")]
	RequestBuild {
		/// Path of the endpoint being called.
		endpoint: String,
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
