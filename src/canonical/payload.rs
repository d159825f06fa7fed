//! Payload values accepted by the canonical serializer.

// std
use std::{
	fs::File,
	io::{Read, Seek},
	path::Path,
};
// self
use crate::{_prelude::*, canonical::CanonicalError};

/// A request or response body value as seen by the signature protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
	/// Text, signed verbatim.
	Text(String),
	/// Raw bytes, signed as base64.
	Binary(Vec<u8>),
	/// Uploaded file, signed as the base64 of its content.
	File(FilePart),
	/// Ordered mapping.
	Map(PayloadMap),
	/// Sequence.
	List(Vec<Payload>),
	/// Value the protocol has no encoding for (numbers, booleans, null); signed as `null`.
	Unsupported(&'static str),
}
impl Payload {
	/// Returns a stable label describing the value kind.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Text(_) => "string",
			Self::Binary(_) => "binary",
			Self::File(_) => "file",
			Self::Map(_) => "mapping",
			Self::List(_) => "sequence",
			Self::Unsupported(kind) => *kind,
		}
	}
}
impl From<String> for Payload {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<&str> for Payload {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<Vec<u8>> for Payload {
	fn from(value: Vec<u8>) -> Self {
		Self::Binary(value)
	}
}
impl From<FilePart> for Payload {
	fn from(value: FilePart) -> Self {
		Self::File(value)
	}
}
impl From<PayloadMap> for Payload {
	fn from(value: PayloadMap) -> Self {
		Self::Map(value)
	}
}
impl From<Vec<Payload>> for Payload {
	fn from(value: Vec<Payload>) -> Self {
		Self::List(value)
	}
}
impl From<&serde_json::Value> for Payload {
	fn from(value: &serde_json::Value) -> Self {
		use serde_json::Value;

		match value {
			Value::String(text) => Self::Text(text.clone()),
			Value::Object(object) =>
				Self::Map(object.iter().map(|(key, value)| (key.clone(), Self::from(value))).collect()),
			Value::Array(items) => Self::List(items.iter().map(Self::from).collect()),
			Value::Number(_) => Self::Unsupported("number"),
			Value::Bool(_) => Self::Unsupported("bool"),
			Value::Null => Self::Unsupported("null"),
		}
	}
}

/// Insertion-ordered mapping with last-writer-wins semantics.
///
/// Re-inserting an existing key replaces its value but keeps its original position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PayloadMap(Vec<(String, Payload)>);
impl PayloadMap {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces `key`, returning the previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Payload>) -> Option<Payload> {
		let key = key.into();
		let value = value.into();

		match self.0.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, slot)) => Some(std::mem::replace(slot, value)),
			None => {
				self.0.push((key, value));

				None
			},
		}
	}

	/// Folds every entry of `other` into `self`; entries from `other` win on collision.
	pub fn merge(&mut self, other: PayloadMap) {
		for (key, value) in other.0 {
			self.insert(key, value);
		}
	}

	/// Looks up a value by key.
	pub fn get(&self, key: &str) -> Option<&Payload> {
		self.0.iter().find(|(existing, _)| existing == key).map(|(_, value)| value)
	}

	/// Iterates entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Payload)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when the mapping has no entries.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for PayloadMap
where
	K: Into<String>,
	V: Into<Payload>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut map = Self::new();

		for (key, value) in iter {
			map.insert(key, value);
		}

		map
	}
}
impl IntoIterator for PayloadMap {
	type IntoIter = std::vec::IntoIter<(String, Payload)>;
	type Item = (String, Payload);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// File attachment sent as a multipart part.
///
/// Only the content takes part in the signature; the filename and MIME type travel with the
/// upload but are not signed.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
	filename: String,
	content: Vec<u8>,
	mime_type: String,
}
impl FilePart {
	/// MIME type the signer endpoints expect for documents.
	pub const PDF: &'static str = "application/pdf";

	/// Creates a part from in-memory content.
	pub fn new(
		filename: impl Into<String>,
		content: impl Into<Vec<u8>>,
		mime_type: impl Into<String>,
	) -> Self {
		Self { filename: filename.into(), content: content.into(), mime_type: mime_type.into() }
	}

	/// Creates an `application/pdf` part.
	pub fn pdf(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
		Self::new(filename, content, Self::PDF)
	}

	/// Reads the whole stream from its start; the stream keeps its current position.
	pub fn from_reader<R>(
		filename: impl Into<String>,
		stream: &mut R,
		mime_type: impl Into<String>,
	) -> Result<Self, CanonicalError>
	where
		R: ?Sized + Read + Seek,
	{
		let content = super::read_stream(stream)?;

		Ok(Self::new(filename, content, mime_type))
	}

	/// Opens `path` as an `application/pdf` part named after the file's base name.
	pub fn open_pdf(path: impl AsRef<Path>) -> Result<Self, CanonicalError> {
		let path = path.as_ref();
		let filename = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default();
		let mut file = File::open(path)?;

		Self::from_reader(filename, &mut file, Self::PDF)
	}

	/// File name sent with the upload.
	pub fn filename(&self) -> &str {
		&self.filename
	}

	/// Raw content.
	pub fn content(&self) -> &[u8] {
		&self.content
	}

	/// MIME type sent with the upload.
	pub fn mime_type(&self) -> &str {
		&self.mime_type
	}
}
impl Debug for FilePart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FilePart")
			.field("filename", &self.filename)
			.field("len", &self.content.len())
			.field("mime_type", &self.mime_type)
			.finish()
	}
}
