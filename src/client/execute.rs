//! Authenticated request execution: token, signature, transport, verification, classification.

// crates.io
use reqwest::{
	RequestBuilder,
	header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
	multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	canonical::Payload,
	client::{AuthenticatedRequest, Client},
	envelope::{self, Envelope, ResponseMeta},
	error::{ConfigError, InvalidSignatureError},
	http::{self, RawResponse},
	obs::{self, CallKind, CallOutcome, CallSpan},
	signature::{self, HEADER_SIGNATURE, HEADER_TIMESTAMP, IsoTimestamp, SignedHeaders},
};

impl Client {
	/// Performs a signed call and returns the verified, classified response.
	///
	/// Makes one network call when a valid token is cached and two when it must be refreshed.
	/// Protocol failures (transport, timeouts, missing headers, bad signatures) are returned as
	/// [`Error`]; a verified non-200 response is returned as [`Envelope::Error`].
	pub async fn execute<T>(&self, request: AuthenticatedRequest) -> Result<Envelope<T>>
	where
		T: DeserializeOwned,
	{
		const KIND: CallKind = CallKind::SignedRequest;

		let span = CallSpan::new(KIND, request.path());

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.send_signed(request)).await;

		match &result {
			Ok(envelope) => {
				span.record_status(envelope.meta().status_code);

				let outcome =
					if envelope.ok() { CallOutcome::Success } else { CallOutcome::Rejected };

				obs::record_call_outcome(KIND, outcome);
			},
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// [`Client::execute`] without a typed payload.
	pub async fn execute_value(&self, request: AuthenticatedRequest) -> Result<Envelope<Value>> {
		self.execute(request).await
	}

	async fn send_signed<T>(&self, request: AuthenticatedRequest) -> Result<Envelope<T>>
	where
		T: DeserializeOwned,
	{
		let credentials = self.credentials();
		let token = self.get_token().await?;
		let body = Payload::Map(request.signing_body());
		let signed = SignedHeaders::generate(
			credentials.private_key(),
			credentials.client_id(),
			request.method().as_str(),
			request.path(),
			&body,
			IsoTimestamp::now_utc(),
		)?;
		let mut headers = request.headers().clone();

		insert_header(&mut headers, AUTHORIZATION.as_str(), &token.bearer())?;

		for (name, value) in signed.pairs() {
			insert_header(&mut headers, name, value)?;
		}

		let endpoint = credentials.endpoint(request.path())?;
		let builder =
			self.http_client().request(request.method().clone(), endpoint).headers(headers);
		let builder = attach_body(builder, &request)?;
		let response =
			self.http_client().send(request.path(), builder, credentials.timeout()).await?;

		self.verify_and_classify(response)
	}

	fn verify_and_classify<T>(&self, response: RawResponse) -> Result<Envelope<T>>
	where
		T: DeserializeOwned,
	{
		let body = response.json::<Value>()?;
		let signature = response.required_header(HEADER_SIGNATURE)?;
		let timestamp_iso = response.required_header(HEADER_TIMESTAMP)?;

		verify_body(self.credentials().client_id(), response.status, signature, timestamp_iso, &body)
			.inspect_err(|_e| {
				#[cfg(feature = "tracing")]
				tracing::warn!(status = response.status, error = %_e, "Response signature rejected.");
			})?;

		let meta = ResponseMeta {
			signature: signature.to_owned(),
			timestamp_iso: timestamp_iso.to_owned(),
			status_code: response.status,
		};

		Ok(envelope::classify(meta, body)?)
	}
}

/// Checks the `X-SIGNATURE` of a response against the HMAC of its canonical body.
pub fn verify_body(
	client_id: &str,
	status: u16,
	signature: &str,
	timestamp_iso: &str,
	body: &Value,
) -> Result<(), InvalidSignatureError> {
	let timestamp = IsoTimestamp::parse(timestamp_iso).map_err(|source| {
		InvalidSignatureError::Timestamp { value: timestamp_iso.to_owned(), source }
	})?;
	let verified =
		signature::verify_response(client_id, status, &timestamp, &Payload::from(body), signature)
			.map_err(InvalidSignatureError::Canonical)?;

	if verified { Ok(()) } else { Err(InvalidSignatureError::Mismatch { status }) }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), ConfigError> {
	let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
	let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
	let value = HeaderValue::from_str(value).map_err(|_| invalid())?;

	headers.insert(name, value);

	Ok(())
}

fn attach_body(builder: RequestBuilder, request: &AuthenticatedRequest) -> Result<RequestBuilder> {
	if !request.files().is_empty() {
		let mut form = Form::new();

		for (key, value) in request.form_fields() {
			form = form.text(key.clone(), value.clone());
		}
		for (field, file) in request.files() {
			let part = Part::bytes(file.content().to_vec())
				.file_name(file.filename().to_owned())
				.mime_str(file.mime_type())
				.map_err(|e| http::map_reqwest_error(request.path(), e))?;

			form = form.part(field.clone(), part);
		}

		return Ok(builder.multipart(form));
	}
	if !request.form_fields().is_empty() {
		return Ok(builder.form(request.form_fields()));
	}
	if let Some(json) = request.json_body() {
		return Ok(builder.json(json));
	}

	Ok(builder)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::signature::sign_response;

	const TIMESTAMP: &str = "2024-05-01T12:30:45+00:00";
	const SUCCESS_HMAC: &str = "67dc47d525ab6df60ead1af3ac3992eef2369d776d71838d69470b1aad81cc8a";

	#[test]
	fn verified_bodies_pass() {
		verify_body("client-123", 200, SUCCESS_HMAC, TIMESTAMP, &json!({ "tx_hash": "0xdead" }))
			.expect("Server vector should verify.");
	}

	#[test]
	fn status_is_part_of_the_digest() {
		let err =
			verify_body("client-123", 201, SUCCESS_HMAC, TIMESTAMP, &json!({ "tx_hash": "0xdead" }))
				.expect_err("Changed status should not verify.");

		assert!(matches!(err, InvalidSignatureError::Mismatch { status: 201 }));
	}

	#[test]
	fn unparsable_timestamps_are_signature_failures() {
		let err = verify_body("client-123", 200, SUCCESS_HMAC, "not-a-time", &json!({}))
			.expect_err("Garbage timestamp should fail.");

		assert!(matches!(err, InvalidSignatureError::Timestamp { ref value, .. } if value == "not-a-time"));
	}

	#[test]
	fn scalar_bodies_cannot_be_verified() {
		let timestamp = IsoTimestamp::parse(TIMESTAMP).expect("Timestamp fixture should parse.");
		let signature = sign_response("client-123", 200, &timestamp, &Payload::from(&json!({})))
			.expect("Empty mapping should sign.");
		let err = verify_body("client-123", 200, &signature, TIMESTAMP, &json!("plain text"))
			.expect_err("Scalar body should fail.");

		assert!(matches!(err, InvalidSignatureError::Canonical(_)));
	}

	#[test]
	fn protocol_headers_are_normalized() {
		let mut headers = HeaderMap::new();

		insert_header(&mut headers, HEADER_SIGNATURE, "abc").expect("Header should encode.");

		assert_eq!(headers.get("x-signature"), Some(&HeaderValue::from_static("abc")));
		assert!(matches!(
			insert_header(&mut headers, HEADER_SIGNATURE, "line\nbreak"),
			Err(ConfigError::InvalidHeader { .. })
		));
	}
}
