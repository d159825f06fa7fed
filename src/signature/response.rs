//! Symmetric response verification.

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
// self
use crate::{
	canonical::{self, CanonicalError, Payload},
	signature::{IsoTimestamp, join_fields},
};

type HmacSha256 = Hmac<Sha256>;

/// Builds the response string-to-sign from an already canonical body.
pub fn response_string_to_sign(
	client_id: &str,
	http_status: u16,
	timestamp: &IsoTimestamp,
	canonical_body: &str,
) -> String {
	join_fields(&[client_id, &http_status.to_string(), &timestamp.to_string(), canonical_body])
}

/// Computes the lowercase hex HMAC-SHA256 the server attaches to a response.
///
/// The HMAC key is the UTF-8 encoding of `client_id`.
pub fn sign_response(
	client_id: &str,
	http_status: u16,
	timestamp: &IsoTimestamp,
	body: &Payload,
) -> Result<String, CanonicalError> {
	let canonical_body = canonical::canonicalize(body)?;
	let message = response_string_to_sign(client_id, http_status, timestamp, &canonical_body);
	let mut mac = HmacSha256::new_from_slice(client_id.as_bytes())
		.expect("HMAC-SHA256 accepts keys of any length.");

	mac.update(message.as_bytes());

	Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Recomputes the response signature and compares it to `received_signature` in constant time.
pub fn verify_response(
	client_id: &str,
	http_status: u16,
	timestamp: &IsoTimestamp,
	body: &Payload,
	received_signature: &str,
) -> Result<bool, CanonicalError> {
	let expected = sign_response(client_id, http_status, timestamp, body)?;

	Ok(bool::from(expected.as_bytes().ct_eq(received_signature.as_bytes())))
}
