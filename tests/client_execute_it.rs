mod common;

// std
use std::time::Duration;
// crates.io
use httpmock::{HttpMockRequest, prelude::*};
use serde_json::json;
use time::OffsetDateTime;
// self
use atomik::{
	auth::AccessToken,
	canonical::{self, FilePart},
	client::AuthenticatedRequest,
	envelope::{Envelope, ErrorBody},
	error::{Error, InvalidSignatureError, ServerError},
	reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue},
	services::{Signer, VerifyResponse},
	token::TOKEN_PATH,
};
use common::*;

#[tokio::test]
async fn verified_success_returns_typed_envelope() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server, "abc").await;
	let body = json!({ "tx_hash": "0xdead" });
	let (signature, timestamp) = sign_body(200, &body);
	let service = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(Signer::VERIFY_PATH)
				.header("authorization", "Bearer abc")
				.header("x-client-key", CLIENT_ID)
				.header_exists("x-signature")
				.header_exists("x-timestamp")
				.json_body(json!({ "hash": "abc" }));
			then.status(200)
				.header("X-SIGNATURE", signature.as_str())
				.header("X-TIMESTAMP", timestamp.as_str())
				.body(body.to_string());
		})
		.await;
	let client = build_client(&server);
	let request = AuthenticatedRequest::post(Signer::VERIFY_PATH).json(json!({ "hash": "abc" }));
	let envelope = client
		.execute::<VerifyResponse>(request.clone())
		.await
		.expect("Verified response should produce an envelope.");

	assert!(envelope.ok());
	assert_eq!(envelope.meta().signature, signature);
	assert_eq!(envelope.meta().timestamp_iso, timestamp);
	assert_eq!(envelope.meta().status_code, 200);
	assert_eq!(
		envelope.into_result().expect("Envelope should be a success.").tx_hash,
		"0xdead"
	);

	client.execute_value(request).await.expect("Cached token should be reused.");

	token.assert_calls_async(1).await;
	service.assert_calls_async(2).await;
}

#[tokio::test]
async fn garbage_signature_is_rejected_without_envelope() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let (_, timestamp) = sign_body(200, &json!({ "tx_hash": "0xdead" }));
	let _service = server
		.mock_async(|when, then| {
			when.method(POST).path(Signer::VERIFY_PATH);
			then.status(200)
				.header("X-SIGNATURE", "garbage")
				.header("X-TIMESTAMP", timestamp.as_str())
				.body(r#"{"tx_hash":"0xdead"}"#);
		})
		.await;
	let client = build_client(&server);
	let err = client
		.execute_value(AuthenticatedRequest::post(Signer::VERIFY_PATH).json(json!({ "hash": "abc" })))
		.await
		.expect_err("Garbage signature should fail.");

	assert!(err.is_invalid_signature());
	assert!(matches!(
		err,
		Error::Server(ServerError::InvalidSignature(InvalidSignatureError::Mismatch { status: 200 }))
	));
}

#[tokio::test]
async fn tampered_body_is_rejected() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let (signature, timestamp) = sign_body(200, &json!({ "tx_hash": "0xdead" }));
	let _service = server
		.mock_async(|when, then| {
			when.method(POST).path(Signer::VERIFY_PATH);
			then.status(200)
				.header("X-SIGNATURE", signature.as_str())
				.header("X-TIMESTAMP", timestamp.as_str())
				.body(r#"{"tx_hash":"0xbeef"}"#);
		})
		.await;
	let client = build_client(&server);
	let err = client
		.execute_value(AuthenticatedRequest::post(Signer::VERIFY_PATH))
		.await
		.expect_err("Body that differs from the signed one should fail.");

	assert!(err.is_invalid_signature());
}

#[tokio::test]
async fn verified_business_error_is_returned_as_error_envelope() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let body = json!({ "error": "file not found" });
	let (signature, timestamp) = sign_body(500, &body);
	let _service = server
		.mock_async(|when, then| {
			when.method(POST).path(Signer::VERIFY_PATH);
			then.status(500)
				.header("X-SIGNATURE", signature.as_str())
				.header("X-TIMESTAMP", timestamp.as_str())
				.body(body.to_string());
		})
		.await;
	let client = build_client(&server);
	let envelope = client
		.execute::<VerifyResponse>(
			AuthenticatedRequest::post(Signer::VERIFY_PATH).json(json!({ "hash": "abc" })),
		)
		.await
		.expect("Verified business error should not be a protocol error.");

	assert!(!envelope.ok());

	match envelope {
		Envelope::Error { meta, error } => {
			assert_eq!(meta.status_code, 500);
			assert_eq!(error, ErrorBody::Message("file not found".into()));
		},
		other => panic!("Unexpected envelope: {other:?}"),
	}
}

#[tokio::test]
async fn missing_signature_header_is_a_server_error() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let (_, timestamp) = sign_body(200, &json!({}));
	let _service = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/ping/");
			then.status(200).header("X-TIMESTAMP", timestamp.as_str()).body("{}");
		})
		.await;
	let client = build_client(&server);
	let err = client
		.execute_value(AuthenticatedRequest::get("/api/ping/"))
		.await
		.expect_err("Response without signature should fail.");

	assert!(matches!(err, Error::Server(ServerError::MissingHeader { header: "X-SIGNATURE" })));
	assert!(!err.is_invalid_signature());
}

#[tokio::test]
async fn missing_timestamp_header_is_a_server_error() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let (signature, _) = sign_body(200, &json!({}));
	let _service = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/ping/");
			then.status(200).header("X-SIGNATURE", signature.as_str()).body("{}");
		})
		.await;
	let client = build_client(&server);
	let err = client
		.execute_value(AuthenticatedRequest::get("/api/ping/"))
		.await
		.expect_err("Response without timestamp should fail.");

	assert!(matches!(err, Error::Server(ServerError::MissingHeader { header: "X-TIMESTAMP" })));
}

#[tokio::test]
async fn non_json_body_is_a_server_error() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let _service = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/ping/");
			then.status(502).body("<html>Bad Gateway</html>");
		})
		.await;
	let client = build_client(&server);
	let err = client
		.execute_value(AuthenticatedRequest::get("/api/ping/"))
		.await
		.expect_err("HTML body should fail.");

	assert!(matches!(err, Error::Server(ServerError::MalformedBody { status: 502, .. })));
}

#[tokio::test]
async fn rejected_credentials_stop_before_the_service_call() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401).body(r#"{"error":"invalid_client"}"#);
		})
		.await;
	let service = server
		.mock_async(|when, then| {
			when.method(POST).path(Signer::VERIFY_PATH);
			then.status(200).body("{}");
		})
		.await;
	let client = build_client(&server);
	let err = client
		.execute_value(AuthenticatedRequest::post(Signer::VERIFY_PATH))
		.await
		.expect_err("Rejected credentials should fail.");

	assert!(err.is_auth());

	token.assert_calls_async(1).await;
	service.assert_calls_async(0).await;
}

#[tokio::test]
async fn expired_token_is_refreshed_before_the_call() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server, "fresh").await;
	let body = json!({ "tx_hash": "0xdead" });
	let (signature, timestamp) = sign_body(200, &body);
	let service = server
		.mock_async(|when, then| {
			when.method(POST).path(Signer::VERIFY_PATH).header("authorization", "Bearer fresh");
			then.status(200)
				.header("X-SIGNATURE", signature.as_str())
				.header("X-TIMESTAMP", timestamp.as_str())
				.body(body.to_string());
		})
		.await;
	let client = build_client(&server);

	client.tokens().replace(AccessToken::new(
		"stale",
		OffsetDateTime::now_utc() - time::Duration::hours(2),
		time::Duration::hours(1),
	));

	let envelope = client
		.execute::<VerifyResponse>(AuthenticatedRequest::post(Signer::VERIFY_PATH))
		.await
		.expect("Refreshed token should be used.");

	assert!(envelope.ok());

	token.assert_calls_async(1).await;
	service.assert_calls_async(1).await;
}

#[tokio::test]
async fn form_fields_are_sent_urlencoded() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let body = json!({ "tx_hash": "0xdead" });
	let (signature, timestamp) = sign_body(200, &body);
	let service = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(Signer::VERIFY_PATH)
				.form_urlencoded_tuple("hash", "abc");
			then.status(200)
				.header("X-SIGNATURE", signature.as_str())
				.header("X-TIMESTAMP", timestamp.as_str())
				.body(body.to_string());
		})
		.await;
	let client = build_client(&server);
	let envelope = client
		.execute_value(AuthenticatedRequest::post(Signer::VERIFY_PATH).form("hash", "abc"))
		.await
		.expect("Form request should succeed.");

	assert_eq!(
		envelope.into_result().expect("Envelope should be a success.")["tx_hash"],
		"0xdead"
	);

	service.assert_calls_async(1).await;
}

#[tokio::test]
async fn slow_service_times_out() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let _service = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/slow/");
			then.status(200).delay(Duration::from_millis(500)).body("{}");
		})
		.await;
	let client = build_client_with_timeout(&server, Duration::from_millis(100));
	let err = client
		.execute_value(AuthenticatedRequest::get("/api/slow/"))
		.await
		.expect_err("Slow service should time out.");

	assert!(err.is_timeout());
	assert_eq!(
		client.tokens().current().expect("Token should stay cached.").secret.expose(),
		"abc"
	);
}

#[tokio::test]
async fn protocol_headers_override_caller_headers() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let body = json!({ "tx_hash": "0xdead" });
	let (signature, timestamp) = sign_body(200, &body);
	let request = AuthenticatedRequest::post(Signer::VERIFY_PATH)
		.json(json!({ "hash": "abc" }))
		.header(AUTHORIZATION, HeaderValue::from_static("Bearer evil"))
		.header(HeaderName::from_static("x-signature"), HeaderValue::from_static("forged"))
		.header(HeaderName::from_static("x-request-id"), HeaderValue::from_static("42"));
	let canonical_body = canonical::canonicalize(&request.signing_body().into())
		.expect("Request body should canonicalize.");
	let service = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(Signer::VERIFY_PATH)
				.header("authorization", "Bearer abc")
				.header("x-request-id", "42")
				.is_true(move |req: &HttpMockRequest| {
					request_signature_verifies(req, "POST", Signer::VERIFY_PATH, &canonical_body)
				});
			then.status(200)
				.header("X-SIGNATURE", signature.as_str())
				.header("X-TIMESTAMP", timestamp.as_str())
				.body(body.to_string());
		})
		.await;
	let client = build_client(&server);
	let envelope = client
		.execute_value(request)
		.await
		.expect("Request with overridden headers should succeed.");

	assert!(envelope.ok());

	service.assert_calls_async(1).await;
}

#[tokio::test]
async fn multipart_signature_covers_fields_and_file_content() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let body = json!({ "tx_hash": "0xdead" });
	let (signature, timestamp) = sign_body(200, &body);
	let request = AuthenticatedRequest::post(Signer::SIGN_PATH)
		.form("note", "quarterly report")
		.file("file", FilePart::pdf("report.pdf", b"%PDF-1.4 demo".to_vec()));
	let canonical_body = canonical::canonicalize(&request.signing_body().into())
		.expect("Request body should canonicalize.");

	assert_eq!(canonical_body, r#"{"note":"quarterly report","file":"JVBERi0xLjQgZGVtbw=="}"#);

	let service = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(Signer::SIGN_PATH)
				.body_includes("%PDF-1.4 demo")
				.body_includes("quarterly report")
				.is_true(move |req: &HttpMockRequest| {
					request_signature_verifies(req, "POST", Signer::SIGN_PATH, &canonical_body)
				});
			then.status(200)
				.header("X-SIGNATURE", signature.as_str())
				.header("X-TIMESTAMP", timestamp.as_str())
				.body(body.to_string());
		})
		.await;
	let client = build_client(&server);
	let envelope = client.execute_value(request).await.expect("Multipart request should succeed.");

	assert!(envelope.ok());

	service.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_requests_sign_an_empty_mapping() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, "abc").await;
	let body = json!({});
	let (signature, timestamp) = sign_body(200, &body);
	let service = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/ping/").is_true(|req: &HttpMockRequest| {
				request_signature_verifies(req, "GET", "/api/ping/", "{}")
			});
			then.status(200)
				.header("X-SIGNATURE", signature.as_str())
				.header("X-TIMESTAMP", timestamp.as_str())
				.body(body.to_string());
		})
		.await;
	let client = build_client(&server);

	client
		.execute_value(AuthenticatedRequest::get("/api/ping/"))
		.await
		.expect("Signed GET should succeed.");

	service.assert_calls_async(1).await;
}
