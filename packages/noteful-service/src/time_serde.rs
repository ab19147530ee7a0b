//! RFC 3339 timestamps for `#[serde(with = "crate::time_serde")]` fields.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

/// Writes the instant in UTC, so equal instants always serialize identically.
pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let text = value.to_offset(UtcOffset::UTC).format(&Rfc3339).map_err(S::Error::custom)?;

	serializer.serialize_str(&text)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let text = Cow::<str>::deserialize(deserializer)?;

	OffsetDateTime::parse(&text, &Rfc3339).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
	use serde::{Deserialize, Serialize};
	use time::macros::datetime;

	use super::*;

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Stamp {
		#[serde(with = "crate::time_serde")]
		at: OffsetDateTime,
	}

	#[test]
	fn offsets_are_normalized_to_utc() {
		let stamp = Stamp { at: datetime!(2024-05-06 09:30:00 +02:00) };
		let json = serde_json::to_string(&stamp).expect("serialize");

		assert_eq!(json, r#"{"at":"2024-05-06T07:30:00Z"}"#);
		assert_eq!(serde_json::from_str::<Stamp>(&json).expect("deserialize"), stamp);
	}

	#[test]
	fn rejects_non_rfc3339_text() {
		assert!(serde_json::from_str::<Stamp>(r#"{"at":"yesterday"}"#).is_err());
	}
}
