//! Signature engine: RSA request signatures and HMAC response verification.
//!
//! Outbound requests are signed over `client_id|METHOD|path|timestamp|canonical_body` with
//! RSA PKCS#1 v1.5 / SHA-256 and the base64 signature travels in `X-SIGNATURE`. Inbound
//! responses carry an HMAC-SHA256 hex digest over `client_id|status|timestamp|canonical_body`
//! keyed with the client id, which the client recomputes and compares in constant time.

pub mod request;
pub mod response;
pub mod timestamp;

pub use request::*;
pub use response::*;
pub use timestamp::*;

// self
use crate::{_prelude::*, canonical::CanonicalError};

/// Header carrying the signing timestamp (requests and responses).
pub const HEADER_TIMESTAMP: &str = "X-TIMESTAMP";
/// Header carrying the signature (requests and responses).
pub const HEADER_SIGNATURE: &str = "X-SIGNATURE";
/// Header identifying the client on signed requests.
pub const HEADER_CLIENT_KEY: &str = "X-CLIENT-KEY";

/// Failures raised while signing an outbound request.
#[derive(Debug, ThisError)]
pub enum SignError {
	/// The request body could not be put into canonical form.
	#[error(transparent)]
	Canonical(#[from] CanonicalError),
	/// The RSA primitive rejected the digest.
	#[error("RSA signing failed.")]
	Rsa(#[source] rsa::signature::Error),
}

fn join_fields(fields: &[&str]) -> String {
	fields.join("|")
}
