//! Builder describing one authenticated call.

// crates.io
use reqwest::{
	Method,
	header::{HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
// self
use crate::canonical::{FilePart, Payload, PayloadMap};

/// A call to a service endpoint, before signing.
///
/// Form fields, a JSON body, and file attachments may be combined. They are merged into a
/// single mapping for signing, while the transport picks one body encoding: multipart when
/// files are attached, then urlencoded form, then JSON.
#[derive(Clone, Debug)]
pub struct AuthenticatedRequest {
	method: Method,
	path: String,
	form: Vec<(String, String)>,
	json: Option<Value>,
	files: Vec<(String, FilePart)>,
	headers: HeaderMap,
}
impl AuthenticatedRequest {
	/// Starts a request for `method` on `path` (relative to the base URL, e.g. `/api/x/`).
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			form: Vec::new(),
			json: None,
			files: Vec::new(),
			headers: HeaderMap::new(),
		}
	}

	/// Starts a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Starts a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Appends a form field.
	pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.form.push((key.into(), value.into()));

		self
	}

	/// Sets the JSON body.
	pub fn json(mut self, body: Value) -> Self {
		self.json = Some(body);

		self
	}

	/// Attaches a file under the multipart field `field`.
	pub fn file(mut self, field: impl Into<String>, part: FilePart) -> Self {
		self.files.push((field.into(), part));

		self
	}

	/// Adds a caller header. Protocol headers set by the client take precedence.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// HTTP method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Endpoint path, exactly as it is signed.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Form fields in insertion order.
	pub fn form_fields(&self) -> &[(String, String)] {
		&self.form
	}

	/// JSON body, if any.
	pub fn json_body(&self) -> Option<&Value> {
		self.json.as_ref()
	}

	/// File attachments in insertion order.
	pub fn files(&self) -> &[(String, FilePart)] {
		&self.files
	}

	/// Caller headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Merged view of form fields, JSON object fields, and files, in that order.
	///
	/// Later sources win on a key collision and the key keeps its first position. A JSON body
	/// that is not an object contributes nothing.
	pub fn signing_body(&self) -> PayloadMap {
		let mut merged: PayloadMap =
			self.form.iter().map(|(key, value)| (key.as_str(), value.as_str())).collect();

		if let Some(Value::Object(object)) = &self.json {
			merged.merge(object.iter().map(|(key, value)| (key.as_str(), Payload::from(value))).collect());
		}

		merged.merge(
			self.files.iter().map(|(field, part)| (field.as_str(), Payload::File(part.clone()))).collect(),
		);

		merged
	}
}
