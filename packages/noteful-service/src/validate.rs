use uuid::Uuid;

use crate::{Error, Result};

/// Parses a path identifier. Only syntax is checked; existence is the store's concern.
pub fn parse_id(raw: &str) -> Result<Uuid> {
	Uuid::parse_str(raw)
		.map_err(|_| Error::InvalidIdentifier { message: "The `id` is not valid".to_string() })
}

/// Parses an optional reference to another entity. Empty strings count as absent.
pub fn parse_reference(raw: Option<&str>, field: &str) -> Result<Option<Uuid>> {
	match raw {
		None | Some("") => Ok(None),
		Some(raw) => Uuid::parse_str(raw).map(Some).map_err(|_| Error::InvalidReference {
			message: format!("The `{field}` is not valid"),
		}),
	}
}

/// Returns the value of a required text field, rejecting missing and blank values.
pub fn required_text(value: Option<&str>, field: &str) -> Result<String> {
	match value {
		Some(value) if !value.trim().is_empty() => {
			storable_text(value, field)?;

			Ok(value.to_string())
		},
		_ => Err(Error::Validation { message: format!("Missing `{field}` in request body") }),
	}
}

/// Rejects text the store cannot hold. Postgres `text` has no room for the NUL character.
pub fn storable_text(value: &str, field: &str) -> Result<()> {
	if value.contains('\0') {
		return Err(Error::Validation {
			message: format!("The `{field}` must not contain NUL characters"),
		});
	}

	Ok(())
}
