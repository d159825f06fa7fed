//! Immutable client credentials and their validating builder.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{PrivateKey, Secret},
	error::ConfigError,
};

/// Validation failures raised by [`CredentialsBuilder`] and [`PrivateKey::from_pem`].
#[derive(Debug, ThisError)]
pub enum CredentialsError {
	/// Client identifier is empty.
	#[error("Client identifier must not be empty.")]
	EmptyClientId,
	/// Client identifier contains `|`, which would make the string-to-sign ambiguous.
	#[error("Client identifier must not contain `|`.")]
	AmbiguousClientId,
	/// No client secret was provided.
	#[error("Client secret is required.")]
	MissingClientSecret,
	/// No base URL was provided.
	#[error("Base URL is required.")]
	MissingBaseUrl,
	/// Base URL uses a scheme other than http or https.
	#[error("Base URL scheme `{scheme}` is not supported.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// No private key was provided.
	#[error("Private key is required.")]
	MissingPrivateKey,
	/// Timeout is zero.
	#[error("Timeout must be greater than zero.")]
	ZeroTimeout,
	/// PKCS#8 PEM could not be decoded.
	#[error("Private key is not a valid PKCS#8 RSA key.")]
	InvalidPkcs8Key {
		/// Underlying decoding failure.
		#[source]
		source: rsa::pkcs8::Error,
	},
	/// PKCS#1 PEM could not be decoded.
	#[error("Private key is not a valid PKCS#1 RSA key.")]
	InvalidPkcs1Key {
		/// Underlying decoding failure.
		#[source]
		source: rsa::pkcs1::Error,
	},
}

/// Everything the client needs to authenticate: RSA key, OAuth client pair, service location,
/// and the timeout applied to every network call.
#[derive(Clone)]
pub struct Credentials {
	client_id: String,
	client_secret: Secret,
	base_url: Url,
	private_key: PrivateKey,
	timeout: StdDuration,
}
impl Credentials {
	/// Timeout applied when none is configured.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(15);

	/// Starts a builder for the provided client identifier.
	pub fn builder(client_id: impl Into<String>) -> CredentialsBuilder {
		CredentialsBuilder::new(client_id)
	}

	/// OAuth client identifier; also sent as `X-CLIENT-KEY` and used as the response HMAC key.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// OAuth client secret.
	pub fn client_secret(&self) -> &Secret {
		&self.client_secret
	}

	/// Service base URL.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Request signing key.
	pub fn private_key(&self) -> &PrivateKey {
		&self.private_key
	}

	/// Per-call network timeout.
	pub fn timeout(&self) -> StdDuration {
		self.timeout
	}

	/// Resolves `path` against the base URL by appending it, so base URLs with a path prefix
	/// keep that prefix.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let base = self.base_url.as_str().trim_end_matches('/');
		let joined = if path.starts_with('/') { format!("{base}{path}") } else { format!("{base}/{path}") };

		Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidEndpoint { path: path.to_owned(), source })
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("base_url", &self.base_url.as_str())
			.field("private_key", &self.private_key)
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Builder for [`Credentials`].
#[derive(Debug)]
pub struct CredentialsBuilder {
	client_id: String,
	client_secret: Option<Secret>,
	base_url: Option<Url>,
	private_key: Option<PrivateKey>,
	timeout: StdDuration,
}
impl CredentialsBuilder {
	fn new(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: None,
			base_url: None,
			private_key: None,
			timeout: Credentials::DEFAULT_TIMEOUT,
		}
	}

	/// Sets the OAuth client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(Secret::new(secret));

		self
	}

	/// Sets the service base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Sets the request signing key.
	pub fn private_key(mut self, key: PrivateKey) -> Self {
		self.private_key = Some(key);

		self
	}

	/// Overrides the per-call timeout (defaults to 15 seconds).
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Validates the configuration and produces [`Credentials`].
	pub fn build(self) -> Result<Credentials, CredentialsError> {
		if self.client_id.is_empty() {
			return Err(CredentialsError::EmptyClientId);
		}
		if self.client_id.contains('|') {
			return Err(CredentialsError::AmbiguousClientId);
		}

		let client_secret = self.client_secret.ok_or(CredentialsError::MissingClientSecret)?;
		let base_url = self.base_url.ok_or(CredentialsError::MissingBaseUrl)?;

		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(CredentialsError::UnsupportedScheme { scheme: base_url.scheme().to_owned() });
		}

		let private_key = self.private_key.ok_or(CredentialsError::MissingPrivateKey)?;

		if self.timeout.is_zero() {
			return Err(CredentialsError::ZeroTimeout);
		}

		Ok(Credentials { client_id: self.client_id, client_secret, base_url, private_key, timeout: self.timeout })
	}
}
