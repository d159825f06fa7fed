//! Signs a PDF against a local mock of the signing service: the mock issues a token, answers the
//! upload with an HMAC-signed receipt, and the client verifies it before returning the receipt.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use atomik::{
	auth::{Credentials, PrivateKey},
	canonical::{FilePart, Payload},
	client::Client,
	http::ReqwestHttpClient,
	reqwest,
	services::Signer,
	signature::{self, IsoTimestamp},
	token::TOKEN_PATH,
	url::Url,
};

const CLIENT_ID: &str = "demo-client";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"expires_in\":900}");
		})
		.await;
	let receipt = json!({ "tx_hash": "0xdead" });
	let timestamp = IsoTimestamp::now_utc();
	let receipt_signature =
		signature::sign_response(CLIENT_ID, 200, &timestamp, &Payload::from(&receipt))?;
	let sign_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(Signer::SIGN_PATH).header_exists("x-signature");
			then.status(200)
				.header("X-SIGNATURE", receipt_signature.as_str())
				.header("X-TIMESTAMP", timestamp.to_string())
				.body(receipt.to_string());
		})
		.await;
	let credentials = Credentials::builder(CLIENT_ID)
		.client_secret("super-secret")
		.base_url(Url::parse(&server.base_url())?)
		.private_key(PrivateKey::from_pem(include_str!("../tests/fixtures/client_key.pem"))?)
		.build()?;
	// The mock server presents a self-signed certificate.
	let http_client = ReqwestHttpClient::with_client(
		reqwest::Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = Client::with_http_client(credentials, http_client);
	let envelope = client.signer().sign(FilePart::pdf("contract.pdf", b"%PDF-1.4 demo".to_vec())).await?;

	println!("Verified response (HTTP {}).", envelope.meta().status_code);

	match envelope.into_result() {
		Ok(receipt) => println!("Document anchored in transaction {}.", receipt.tx_hash),
		Err(error) => println!("Service refused the document: {error}."),
	}

	token_mock.assert_async().await;
	sign_mock.assert_async().await;

	Ok(())
}
