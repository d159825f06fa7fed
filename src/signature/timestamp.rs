//! ISO-8601 timestamps truncated to whole seconds, as fed into both signature algorithms.

// crates.io
use time::{PrimitiveDateTime, UtcOffset, format_description::well_known::Iso8601, macros};
// self
use crate::_prelude::*;

/// A signing timestamp: a date-time with an optional UTC offset.
///
/// Both the request and the response protocol sign the [`Display`] form, which is
/// `YYYY-MM-DDTHH:MM:SS` followed by `+HH:MM` when an offset is known. Sub-second precision is
/// dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IsoTimestamp {
	datetime: PrimitiveDateTime,
	offset: Option<UtcOffset>,
}
impl IsoTimestamp {
	/// Current UTC time.
	pub fn now_utc() -> Self {
		OffsetDateTime::now_utc().into()
	}

	/// Wraps a date-time that carries no offset.
	pub fn naive(datetime: PrimitiveDateTime) -> Self {
		Self { datetime, offset: None }
	}

	/// Parses an ISO-8601 date-time with or without offset and fractional seconds.
	///
	/// A single space is accepted in place of the `T` separator.
	pub fn parse(value: &str) -> Result<Self, time::error::Parse> {
		let normalized = match value.as_bytes().get(10) {
			Some(b' ') => format!("{}T{}", &value[..10], &value[11..]),
			_ => value.to_owned(),
		};

		if let Ok(instant) = OffsetDateTime::parse(&normalized, &Iso8601::DEFAULT) {
			return Ok(instant.into());
		}

		PrimitiveDateTime::parse(&normalized, &Iso8601::DEFAULT).map(Self::naive)
	}

	/// Date-time component.
	pub fn datetime(&self) -> PrimitiveDateTime {
		self.datetime
	}

	/// Offset component, if any.
	pub fn offset(&self) -> Option<UtcOffset> {
		self.offset
	}
}
impl From<OffsetDateTime> for IsoTimestamp {
	fn from(instant: OffsetDateTime) -> Self {
		Self {
			datetime: PrimitiveDateTime::new(instant.date(), instant.time()),
			offset: Some(instant.offset()),
		}
	}
}
impl FromStr for IsoTimestamp {
	type Err = time::error::Parse;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl Display for IsoTimestamp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let rendered = self
			.datetime
			.format(macros::format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
			.map_err(|_| std::fmt::Error)?;

		f.write_str(&rendered)?;

		if let Some(offset) = self.offset {
			let (hours, minutes, seconds) = offset.as_hms();
			let sign = if offset.is_negative() { '-' } else { '+' };

			write!(f, "{sign}{:02}:{:02}", hours.unsigned_abs(), minutes.unsigned_abs())?;

			// Only sub-minute offsets carry a seconds component.
			if seconds != 0 {
				write!(f, ":{:02}", seconds.unsigned_abs())?;
			}
		}

		Ok(())
	}
}
