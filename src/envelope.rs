//! Typed response envelopes produced after a response signature verifies.
//!
//! A verified 200 becomes [`Envelope::Success`] carrying the decoded payload; any other verified
//! status becomes [`Envelope::Error`] carrying the server's error description. Protocol failures
//! never reach this module.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, error::ServerError};

/// Response headers and status shared by both envelope variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
	/// Raw `X-SIGNATURE` header value.
	pub signature: String,
	/// Raw `X-TIMESTAMP` header value.
	pub timestamp_iso: String,
	/// HTTP status code.
	pub status_code: u16,
}

/// Outcome of a verified call.
#[derive(Clone, Debug, PartialEq)]
pub enum Envelope<T> {
	/// Status 200.
	Success {
		/// Response headers and status.
		meta: ResponseMeta,
		/// Decoded payload.
		response: T,
	},
	/// Any non-200 status; a business-level failure.
	Error {
		/// Response headers and status.
		meta: ResponseMeta,
		/// Error description reported by the server.
		error: ErrorBody,
	},
}
impl<T> Envelope<T> {
	/// `true` for [`Envelope::Success`].
	pub fn ok(&self) -> bool {
		matches!(self, Self::Success { .. })
	}

	/// Response headers and status.
	pub fn meta(&self) -> &ResponseMeta {
		match self {
			Self::Success { meta, .. } | Self::Error { meta, .. } => meta,
		}
	}

	/// Drops the metadata and splits the variants into a [`std::result::Result`].
	pub fn into_result(self) -> std::result::Result<T, ErrorBody> {
		match self {
			Self::Success { response, .. } => Ok(response),
			Self::Error { error, .. } => Err(error),
		}
	}

	/// Transforms the success payload, keeping the metadata.
	pub fn map<U, F>(self, f: F) -> Envelope<U>
	where
		F: FnOnce(T) -> U,
	{
		match self {
			Self::Success { meta, response } => Envelope::Success { meta, response: f(response) },
			Self::Error { meta, error } => Envelope::Error { meta, error },
		}
	}
}

/// Error description carried by an [`Envelope::Error`], keeping the shape the server sent.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
	/// A single message.
	Message(String),
	/// A list of messages.
	Messages(Vec<String>),
	/// Field-level details.
	Detail(Map<String, Value>),
	/// A list of detail mappings.
	Details(Vec<Map<String, Value>>),
	/// Anything else, kept verbatim.
	Other(Value),
}
impl ErrorBody {
	/// Flattens the body into human-readable lines.
	pub fn messages(&self) -> Vec<String> {
		match self {
			Self::Message(message) => vec![message.clone()],
			Self::Messages(messages) => messages.clone(),
			Self::Detail(detail) => detail_lines(detail),
			Self::Details(details) => details.iter().flat_map(detail_lines).collect(),
			Self::Other(value) => vec![value.to_string()],
		}
	}
}
impl From<Value> for ErrorBody {
	fn from(value: Value) -> Self {
		match value {
			Value::String(message) => Self::Message(message),
			Value::Object(detail) => Self::Detail(detail),
			Value::Array(items) if items.iter().all(Value::is_string) => Self::Messages(
				items
					.into_iter()
					.filter_map(|item| match item {
						Value::String(message) => Some(message),
						_ => None,
					})
					.collect(),
			),
			Value::Array(items) if items.iter().all(Value::is_object) => Self::Details(
				items
					.into_iter()
					.filter_map(|item| match item {
						Value::Object(detail) => Some(detail),
						_ => None,
					})
					.collect(),
			),
			other => Self::Other(other),
		}
	}
}
impl Display for ErrorBody {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.messages().join("; "))
	}
}

/// Builds the envelope for a verified response body.
///
/// Error bodies are taken from the `error` key when the body is a mapping that has one, and
/// from the whole body otherwise.
pub fn classify<T>(meta: ResponseMeta, body: Value) -> Result<Envelope<T>, ServerError>
where
	T: DeserializeOwned,
{
	let status = meta.status_code;

	if status == 200 {
		let response = serde_path_to_error::deserialize(body)
			.map_err(|source| ServerError::MalformedBody { status, source })?;

		return Ok(Envelope::Success { meta, response });
	}

	let error = match body {
		Value::Object(mut object) if object.contains_key("error") =>
			object.remove("error").unwrap_or(Value::Null),
		other => other,
	};

	Ok(Envelope::Error { meta, error: error.into() })
}

fn detail_lines(detail: &Map<String, Value>) -> Vec<String> {
	detail
		.iter()
		.map(|(field, value)| match value {
			Value::String(text) => format!("{field}: {text}"),
			other => format!("{field}: {other}"),
		})
		.collect()
}
