#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Conflict: {0}")]
	Conflict(String),
}
impl Error {
	/// Maps unique-index violations to [`Error::Conflict`] and passes everything else through.
	pub(crate) fn from_write(err: sqlx::Error, field: &str) -> Self {
		match &err {
			sqlx::Error::Database(db_err) if db_err.is_unique_violation() =>
				Self::Conflict(format!("{field} already exists.")),
			_ => Self::Sqlx(err),
		}
	}
}
