//! Document signer endpoints: anchor a file, verify a hash, fetch a stored record.

// crates.io
use serde_json::json;
// self
use crate::{
	_prelude::*,
	canonical::FilePart,
	client::{AuthenticatedRequest, Client},
	envelope::Envelope,
};

/// Receipt returned after a file is signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignResponse {
	/// Transaction hash anchoring the signature.
	pub tx_hash: String,
}

/// Receipt returned when a hash is found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
	/// Transaction hash anchoring the signature.
	pub tx_hash: String,
}

/// Stored record of a signed file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
	/// Location or content of the stored file, as reported by the service.
	pub file: String,
	/// Document hash.
	pub hash: String,
	/// Transaction hash anchoring the signature.
	pub tx_hash: String,
	/// Hash algorithm used by the service.
	pub hash_option: String,
}

/// Borrowed handle to the signer endpoints of a [`Client`].
#[derive(Clone, Copy, Debug)]
pub struct Signer<'a> {
	client: &'a Client,
}
impl<'a> Signer<'a> {
	/// Upload endpoint.
	pub const SIGN_PATH: &'static str = "/api/services/signer/sign/";
	/// Hash lookup endpoint.
	pub const VERIFY_PATH: &'static str = "/api/services/signer/verify/";

	pub(crate) fn new(client: &'a Client) -> Self {
		Self { client }
	}

	/// Uploads `file` as the multipart field `file` and signs it.
	pub async fn sign(&self, file: FilePart) -> Result<Envelope<SignResponse>> {
		self.client.execute(AuthenticatedRequest::post(Self::SIGN_PATH).file("file", file)).await
	}

	/// Looks up a previously signed document by hash.
	pub async fn verify(&self, hash: &str) -> Result<Envelope<VerifyResponse>> {
		self.client
			.execute(AuthenticatedRequest::post(Self::VERIFY_PATH).json(json!({ "hash": hash })))
			.await
	}

	/// Fetches the stored record for `hash`.
	pub async fn get_file(&self, hash: &str) -> Result<Envelope<FileRecord>> {
		self.client.execute(AuthenticatedRequest::get(Self::file_path(hash))).await
	}

	/// Path of the record endpoint for `hash`.
	pub fn file_path(hash: &str) -> String {
		format!("/api/services/signer/files/{hash}/")
	}
}
