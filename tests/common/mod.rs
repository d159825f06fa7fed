//! Shared fixtures for the integration tests: mock token endpoint, signed mock responses, and a
//! client pointing at the mock server.

#![allow(dead_code)]

// std
use std::time::Duration;
// crates.io
use httpmock::{HttpMockRequest, Mock, prelude::*};
use serde_json::Value;
// self
use atomik::{
	auth::{Credentials, PrivateKey},
	canonical::Payload,
	client::Client,
	http::ReqwestHttpClient,
	reqwest,
	signature::{self, IsoTimestamp, request_string_to_sign},
	token::TOKEN_PATH,
	url::Url,
};

pub const CLIENT_ID: &str = "client-123";
pub const CLIENT_SECRET: &str = "secret-456";
pub const KEY_PEM: &str = include_str!("../fixtures/client_key.pem");

pub fn build_client(server: &MockServer) -> Client {
	build_client_with_timeout(server, Credentials::DEFAULT_TIMEOUT)
}

pub fn build_client_with_timeout(server: &MockServer, timeout: Duration) -> Client {
	let credentials = Credentials::builder(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.base_url(Url::parse(&server.base_url()).expect("Mock base URL should parse."))
		.private_key(PrivateKey::from_pem(KEY_PEM).expect("Fixture private key should parse."))
		.timeout(timeout)
		.build()
		.expect("Fixture credentials should build.");

	Client::with_http_client(credentials, test_reqwest_http_client())
}

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

pub async fn mock_token<'a>(server: &'a MockServer, access_token: &str) -> Mock<'a> {
	let body = format!(r#"{{"access_token":"{access_token}","expires_in":3600}}"#);

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

/// Returns `(X-SIGNATURE, X-TIMESTAMP)` for a response the server would send right now.
pub fn sign_body(status: u16, body: &Value) -> (String, String) {
	let timestamp = IsoTimestamp::now_utc();
	let signature = signature::sign_response(CLIENT_ID, status, &timestamp, &Payload::from(body))
		.expect("Mock response body should canonicalize.");

	(signature, timestamp.to_string())
}

/// Checks the `X-SIGNATURE` of a captured request against the fixture key, recomputing the
/// string-to-sign from the captured `X-TIMESTAMP` and `X-CLIENT-KEY` headers.
pub fn request_signature_verifies(
	request: &HttpMockRequest,
	method: &str,
	path: &str,
	canonical_body: &str,
) -> bool {
	let header = |name: &str| {
		request.headers().get(name).and_then(|value| value.to_str().ok()).map(str::to_owned)
	};
	let (Some(timestamp), Some(signature), Some(client_key)) =
		(header("x-timestamp"), header("x-signature"), header("x-client-key"))
	else {
		return false;
	};
	let Ok(timestamp) = IsoTimestamp::parse(&timestamp) else {
		return false;
	};
	let message = request_string_to_sign(&client_key, method, path, &timestamp, canonical_body);
	let key = PrivateKey::from_pem(KEY_PEM).expect("Fixture private key should parse.");

	client_key == CLIENT_ID && key.verify_base64(message.as_bytes(), &signature)
}
