//! Asymmetric request signing.

// self
use crate::{
	_prelude::*,
	auth::PrivateKey,
	canonical::{self, Payload},
	signature::{
		HEADER_CLIENT_KEY, HEADER_SIGNATURE, HEADER_TIMESTAMP, IsoTimestamp, SignError,
		join_fields,
	},
};

/// Builds the request string-to-sign from an already canonical body.
pub fn request_string_to_sign(
	client_id: &str,
	method: &str,
	path: &str,
	timestamp: &IsoTimestamp,
	canonical_body: &str,
) -> String {
	join_fields(&[client_id, method, path, &timestamp.to_string(), canonical_body])
}

/// Signs a request and returns the base64 RSA signature.
///
/// PKCS#1 v1.5 is deterministic, so identical inputs always produce identical signatures.
pub fn sign_request(
	private_key: &PrivateKey,
	client_id: &str,
	method: &str,
	path: &str,
	timestamp: &IsoTimestamp,
	body: &Payload,
) -> Result<String, SignError> {
	let canonical_body = canonical::canonicalize(body)?;
	let message = request_string_to_sign(client_id, method, path, timestamp, &canonical_body);

	private_key.sign_base64(message.as_bytes()).map_err(SignError::Rsa)
}

/// The `X-TIMESTAMP` / `X-SIGNATURE` / `X-CLIENT-KEY` triple attached to a signed request.
///
/// `timestamp` is the exact string that was signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedHeaders {
	/// `X-TIMESTAMP` value.
	pub timestamp: String,
	/// `X-SIGNATURE` value.
	pub signature: String,
	/// `X-CLIENT-KEY` value.
	pub client_key: String,
}
impl SignedHeaders {
	/// Signs `body` at `timestamp` and captures the resulting header values.
	pub fn generate(
		private_key: &PrivateKey,
		client_id: &str,
		method: &str,
		path: &str,
		body: &Payload,
		timestamp: IsoTimestamp,
	) -> Result<Self, SignError> {
		let signature = sign_request(private_key, client_id, method, path, &timestamp, body)?;

		Ok(Self { timestamp: timestamp.to_string(), signature, client_key: client_id.to_owned() })
	}

	/// Header name/value pairs in the order they are attached.
	pub fn pairs(&self) -> [(&'static str, &str); 3] {
		[
			(HEADER_TIMESTAMP, self.timestamp.as_str()),
			(HEADER_SIGNATURE, self.signature.as_str()),
			(HEADER_CLIENT_KEY, self.client_key.as_str()),
		]
	}
}
