//! Bearer token lifecycle with single-flight refresh.
//!
//! [`TokenManager`] caches the access token issued by the client-credentials grant and refreshes
//! it only when it is absent or expired. Concurrent callers that observe a stale token queue on
//! one refresh guard, so the token endpoint is hit once per expiry. Failures leave the cache
//! untouched and are never retried.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials, TokenState},
	error::AuthError,
	http::ReqwestHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Path of the OAuth 2.0 token endpoint, relative to the base URL.
pub const TOKEN_PATH: &str = "/oauth/token/";

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
	#[serde(default = "TokenResponse::default_expires_in")]
	expires_in: f64,
}
impl TokenResponse {
	const DEFAULT_EXPIRES_IN: f64 = 3_600.;

	fn default_expires_in() -> f64 {
		Self::DEFAULT_EXPIRES_IN
	}

	/// Token lifetime; negative values mean already expired, out-of-range values saturate.
	fn lifetime(&self) -> Duration {
		Duration::saturating_seconds_f64(self.expires_in.max(0.))
	}
}

/// Owns the cached bearer token for one set of credentials.
#[derive(Debug)]
pub struct TokenManager {
	credentials: Arc<Credentials>,
	http_client: ReqwestHttpClient,
	cache: Mutex<Option<AccessToken>>,
	refresh_guard: AsyncMutex<()>,
}
impl TokenManager {
	/// Creates a manager with an empty cache.
	pub fn new(credentials: Arc<Credentials>, http_client: ReqwestHttpClient) -> Self {
		Self { credentials, http_client, cache: Mutex::new(None), refresh_guard: AsyncMutex::new(()) }
	}

	/// Returns a valid token, fetching a new one when the cache is absent or expired.
	pub async fn get_token(&self) -> Result<AccessToken> {
		if let Some(token) = self.cached_valid() {
			return Ok(token);
		}

		let _singleflight = self.refresh_guard.lock().await;

		// Another caller may have refreshed while this one waited.
		if let Some(token) = self.cached_valid() {
			return Ok(token);
		}

		#[cfg(feature = "tracing")]
		tracing::debug!(state = ?self.state(), "Refreshing access token.");

		let token = self.fetch().await?;

		*self.cache.lock() = Some(token.clone());

		Ok(token)
	}

	/// Returns the cached token without refreshing it, even if it is expired.
	pub fn current(&self) -> Option<AccessToken> {
		self.cache.lock().clone()
	}

	/// Installs `token` as the cached token, returning the previous one.
	pub fn replace(&self, token: AccessToken) -> Option<AccessToken> {
		self.cache.lock().replace(token)
	}

	/// Drops the cached token so the next call fetches a new one.
	pub fn invalidate(&self) -> Option<AccessToken> {
		self.cache.lock().take()
	}

	/// Lifecycle state of the cache right now.
	pub fn state(&self) -> TokenState {
		TokenState::of(self.cache.lock().as_ref(), OffsetDateTime::now_utc())
	}

	fn cached_valid(&self) -> Option<AccessToken> {
		let now = OffsetDateTime::now_utc();

		self.cache.lock().as_ref().filter(|token| !token.is_expired_at(now)).cloned()
	}

	async fn fetch(&self) -> Result<AccessToken> {
		const KIND: CallKind = CallKind::TokenFetch;

		let span = CallSpan::new(KIND, TOKEN_PATH);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.exchange_client_credentials()).await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_e, "Token request failed.");

				obs::record_call_outcome(KIND, CallOutcome::Failure);
			},
		}

		result
	}

	async fn exchange_client_credentials(&self) -> Result<AccessToken> {
		let credentials = &self.credentials;
		let endpoint = credentials.endpoint(TOKEN_PATH)?;
		let request = self
			.http_client
			.post(endpoint)
			.basic_auth(credentials.client_id(), Some(credentials.client_secret().expose()))
			.form(&[("grant_type", "client_credentials")]);
		let response = self.http_client.send(TOKEN_PATH, request, self.timeout()).await?;

		if response.status != 200 {
			return Err(AuthError::new(response.status, &response.body_text()).into());
		}

		let issued_at = OffsetDateTime::now_utc();
		let payload = response.json::<TokenResponse>()?;

		let lifetime = payload.lifetime();

		Ok(AccessToken::new(payload.access_token, issued_at, lifetime))
	}

	fn timeout(&self) -> StdDuration {
		self.credentials.timeout()
	}
}
