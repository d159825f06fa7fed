//! Bearer token record, redacting secret wrapper, and token lifecycle states.

// self
use crate::_prelude::*;

/// Client secret or bearer token value.
///
/// `Debug` and `Display` print `<redacted>`; the raw value is only reachable through
/// [`Secret::expose`], which the Basic and Bearer header builders call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret(String);
impl Secret {
	/// Takes ownership of `value`.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw value for building the `Authorization` header.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Lifecycle state of the cached bearer token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenState {
	/// No token has been issued yet.
	Absent,
	/// The cached token can be used.
	Valid,
	/// The cached token reached its expiry instant.
	Expired,
}
impl TokenState {
	/// Classifies an optional cached token at `instant`.
	pub fn of(token: Option<&AccessToken>, instant: OffsetDateTime) -> Self {
		match token {
			None => Self::Absent,
			Some(token) if token.is_expired_at(instant) => Self::Expired,
			Some(_) => Self::Valid,
		}
	}
}

/// Bearer token issued by the token endpoint. Replaced as a whole on refresh.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
	/// Access token secret; callers must avoid logging it.
	pub secret: Secret,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	/// Instant from which the token is considered expired.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Creates a token issued at `issued_at` that lives for `expires_in`.
	///
	/// The expiry saturates at the representable range, so server-supplied lifetimes can never
	/// overflow.
	pub fn new(secret: impl Into<String>, issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		Self { secret: Secret::new(secret), issued_at, expires_at: issued_at.saturating_add(expires_in) }
	}

	/// Returns `true` once `instant >= expires_at`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// `Authorization` header value.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &self.secret)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
