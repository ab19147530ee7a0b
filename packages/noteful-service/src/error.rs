pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A required field is missing or blank.
	#[error("{message}")]
	Validation { message: String },
	/// A path identifier is not syntactically valid.
	#[error("{message}")]
	InvalidIdentifier { message: String },
	/// A referencing field in a body or query is not syntactically valid.
	#[error("{message}")]
	InvalidReference { message: String },
	#[error("{message}")]
	DuplicateName { message: String },
	#[error("{message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Validation { .. } => "ValidationError",
			Self::InvalidIdentifier { .. } => "InvalidIdentifier",
			Self::InvalidReference { .. } => "InvalidReference",
			Self::DuplicateName { .. } => "DuplicateName",
			Self::NotFound { .. } => "NotFound",
			Self::Storage { .. } => "StoreError",
		}
	}

	pub(crate) fn not_found() -> Self {
		Self::NotFound { message: "Not Found".to_string() }
	}

	/// Translates a unique-name violation into `message`; other store failures pass through.
	pub(crate) fn from_write(err: noteful_storage::Error, message: &str) -> Self {
		match err {
			noteful_storage::Error::Conflict(_) =>
				Self::DuplicateName { message: message.to_string() },
			other => other.into(),
		}
	}
}

impl From<noteful_storage::Error> for Error {
	fn from(err: noteful_storage::Error) -> Self {
		match err {
			noteful_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			noteful_storage::Error::Conflict(message) => Self::DuplicateName { message },
		}
	}
}
