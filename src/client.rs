//! The signing-service client: owns credentials, transport, and the token cache.

pub mod execute;
pub mod request;

pub use request::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials},
	http::ReqwestHttpClient,
	services::Signer,
	token::TokenManager,
};

/// Authenticated client for the signing service.
///
/// Cloning is cheap; clones share the credentials, the HTTP connection pool, and the cached
/// token.
#[derive(Clone, Debug)]
pub struct Client {
	inner: Arc<ClientInner>,
}
impl Client {
	/// Builds a client with the default HTTP transport.
	pub fn new(credentials: Credentials) -> Result<Self> {
		let http_client = ReqwestHttpClient::new()?;

		Ok(Self::with_http_client(credentials, http_client))
	}

	/// Builds a client around a caller-supplied HTTP transport.
	pub fn with_http_client(credentials: Credentials, http_client: ReqwestHttpClient) -> Self {
		let credentials = Arc::new(credentials);
		let tokens = TokenManager::new(credentials.clone(), http_client.clone());

		Self { inner: Arc::new(ClientInner { credentials, http_client, tokens }) }
	}

	/// Credentials the client was built with.
	pub fn credentials(&self) -> &Credentials {
		&self.inner.credentials
	}

	/// Token cache backing every call.
	pub fn tokens(&self) -> &TokenManager {
		&self.inner.tokens
	}

	/// Returns a valid bearer token, refreshing it when needed.
	pub async fn get_token(&self) -> Result<AccessToken> {
		self.inner.tokens.get_token().await
	}

	/// Endpoints of the document signer service.
	pub fn signer(&self) -> Signer<'_> {
		Signer::new(self)
	}

	fn http_client(&self) -> &ReqwestHttpClient {
		&self.inner.http_client
	}
}

#[derive(Debug)]
struct ClientInner {
	credentials: Arc<Credentials>,
	http_client: ReqwestHttpClient,
	tokens: TokenManager,
}
