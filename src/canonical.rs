//! Canonical serializer producing the signature input for request and response bodies.
//!
//! The canonical form is compact JSON (`,` and `:` separators, no whitespace) in which every
//! leaf is a string: blobs and file parts become base64, mappings nested inside a container
//! are embedded as the JSON *string* of their own canonical form, and values the protocol
//! has no encoding for collapse to `null`. Keys keep their insertion order; sorting them would
//! change the signature.

mod json;
pub mod payload;

pub use payload::*;

// std
use std::io::{Read, Seek, SeekFrom};
// crates.io
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
// self
use crate::_prelude::*;

/// Failures raised while producing a canonical body.
#[derive(Debug, ThisError)]
pub enum CanonicalError {
	/// Only mappings and sequences may be canonicalized at the top level.
	#[error("Canonical form requires a mapping or sequence at the top level, found {kind}.")]
	NotAContainer {
		/// Kind label of the rejected value.
		kind: &'static str,
	},
	/// A stream could not be read or repositioned.
	#[error("Stream could not be read for canonicalization.")]
	Io(#[from] std::io::Error),
}

/// Encodes `payload` into its canonical string.
///
/// The top-level value must be a [`Payload::Map`] or [`Payload::List`].
pub fn canonicalize(payload: &Payload) -> Result<String, CanonicalError> {
	let mut out = String::new();

	match payload {
		Payload::Map(map) => write_map(&mut out, map),
		Payload::List(items) => write_list(&mut out, items),
		other => return Err(CanonicalError::NotAContainer { kind: other.kind() }),
	}

	Ok(out)
}

/// Canonicalizes a JSON value, as received in a response body.
pub fn canonicalize_json(value: &serde_json::Value) -> Result<String, CanonicalError> {
	canonicalize(&Payload::from(value))
}

/// Reads the whole stream from its start and returns the base64 encoding of its content.
///
/// The stream is left at the position it had before the call.
pub fn encode_stream<R>(stream: &mut R) -> Result<String, CanonicalError>
where
	R: ?Sized + Read + Seek,
{
	let content = read_stream(stream)?;

	Ok(BASE64.encode(content))
}

pub(crate) fn read_stream<R>(stream: &mut R) -> std::io::Result<Vec<u8>>
where
	R: ?Sized + Read + Seek,
{
	let position = stream.stream_position()?;

	stream.seek(SeekFrom::Start(0))?;

	let mut content = Vec::new();
	let read = stream.read_to_end(&mut content);

	stream.seek(SeekFrom::Start(position))?;
	read?;

	Ok(content)
}

fn write_map(out: &mut String, map: &PayloadMap) {
	out.push('{');

	for (idx, (key, value)) in map.iter().enumerate() {
		if idx > 0 {
			out.push(',');
		}

		json::write_str(out, key);
		out.push(':');
		write_value(out, value);
	}

	out.push('}');
}

fn write_list(out: &mut String, items: &[Payload]) {
	out.push('[');

	for (idx, item) in items.iter().enumerate() {
		if idx > 0 {
			out.push(',');
		}

		write_value(out, item);
	}

	out.push(']');
}

fn write_value(out: &mut String, value: &Payload) {
	match value {
		Payload::Text(text) => json::write_str(out, text),
		Payload::Binary(bytes) => json::write_str(out, &BASE64.encode(bytes)),
		Payload::File(part) => json::write_str(out, &BASE64.encode(part.content())),
		Payload::Map(map) => {
			let mut nested = String::new();

			write_map(&mut nested, map);
			json::write_str(out, &nested);
		},
		Payload::List(items) => write_list(out, items),
		Payload::Unsupported(kind) => {
			#[cfg(feature = "tracing")]
			tracing::debug!(kind = *kind, "Payload value has no canonical encoding; emitting null.");
			#[cfg(not(feature = "tracing"))]
			let _ = kind;

			out.push_str("null");
		},
	}
}
