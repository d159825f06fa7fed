// std
use std::fmt::Write;

/// Appends `value` as a JSON string literal, escaping everything outside printable ASCII.
///
/// Non-ASCII characters are written as lowercase `\uXXXX` escapes (surrogate pairs above the
/// BMP), matching the server's encoder byte for byte.
pub(super) fn write_str(out: &mut String, value: &str) {
	out.push('"');

	for ch in value.chars() {
		match ch {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			'\u{08}' => out.push_str("\\b"),
			'\u{0c}' => out.push_str("\\f"),
			' '..='~' => out.push(ch),
			_ => {
				let mut units = [0_u16; 2];

				for unit in ch.encode_utf16(&mut units) {
					let _ = write!(out, "\\u{unit:04x}");
				}
			},
		}
	}

	out.push('"');
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn encoded(value: &str) -> String {
		let mut out = String::new();

		write_str(&mut out, value);

		out
	}

	#[test]
	fn printable_ascii_is_verbatim() {
		assert_eq!(encoded("tx 0xdead/~"), "\"tx 0xdead/~\"");
	}

	#[test]
	fn control_and_quote_characters_are_escaped() {
		assert_eq!(encoded("a\"b\\c\nd\re\tf\u{08}g\u{0c}"), r#""a\"b\\c\nd\re\tf\bg\f""#);
		assert_eq!(encoded("\u{01}\u{7f}"), r#""\u0001\u007f""#);
	}

	#[test]
	fn non_ascii_uses_utf16_escapes() {
		assert_eq!(encoded("café"), r#""caf\u00e9""#);
		assert_eq!(encoded("😀"), r#""\ud83d\ude00""#);
	}
}
