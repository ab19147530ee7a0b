//! Queries shared by the two name-keyed collections, folders and tags.

use sqlx::{FromRow, PgPool, postgres::PgRow};
use uuid::Uuid;

use crate::{Error, Result, models::CascadeReport};

const LABEL_COLUMNS: &str = "id, name, created_at, updated_at";

#[derive(Clone, Copy, Debug)]
pub(crate) enum LabelTable {
	Folders,
	Tags,
}
impl LabelTable {
	fn as_str(self) -> &'static str {
		match self {
			Self::Folders => "folders",
			Self::Tags => "tags",
		}
	}

	fn conflict_field(self) -> &'static str {
		match self {
			Self::Folders => "Folder name",
			Self::Tags => "Tag name",
		}
	}

	/// Statement that detaches every note from the label bound as `$1`.
	fn detach_sql(self) -> &'static str {
		match self {
			Self::Folders => "\
UPDATE notes
SET folder_id = NULL, updated_at = now()
WHERE folder_id = $1",
			Self::Tags => "\
UPDATE notes
SET tags = array_remove(tags, $1), updated_at = now()
WHERE $1 = ANY(tags)",
		}
	}
}

pub(crate) async fn list<T>(pool: &PgPool, table: LabelTable) -> Result<Vec<T>>
where
	T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
	let sql =
		format!("SELECT {LABEL_COLUMNS} FROM {} ORDER BY name COLLATE \"C\" ASC", table.as_str());
	let rows = sqlx::query_as::<_, T>(&sql).fetch_all(pool).await?;

	Ok(rows)
}

pub(crate) async fn find<T>(pool: &PgPool, table: LabelTable, id: Uuid) -> Result<Option<T>>
where
	T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
	let sql = format!("SELECT {LABEL_COLUMNS} FROM {} WHERE id = $1", table.as_str());
	let row = sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(pool).await?;

	Ok(row)
}

pub(crate) async fn find_many<T>(pool: &PgPool, table: LabelTable, ids: &[Uuid]) -> Result<Vec<T>>
where
	T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!("SELECT {LABEL_COLUMNS} FROM {} WHERE id = ANY($1)", table.as_str());
	let rows = sqlx::query_as::<_, T>(&sql).bind(ids).fetch_all(pool).await?;

	Ok(rows)
}

pub(crate) async fn insert<T>(pool: &PgPool, table: LabelTable, name: &str) -> Result<T>
where
	T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
	let sql =
		format!("INSERT INTO {} (name) VALUES ($1) RETURNING {LABEL_COLUMNS}", table.as_str());

	sqlx::query_as::<_, T>(&sql)
		.bind(name)
		.fetch_one(pool)
		.await
		.map_err(|err| Error::from_write(err, table.conflict_field()))
}

pub(crate) async fn rename<T>(
	pool: &PgPool,
	table: LabelTable,
	id: Uuid,
	name: &str,
) -> Result<Option<T>>
where
	T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
	let sql = format!(
		"\
UPDATE {}
SET name = $1, updated_at = now()
WHERE id = $2
RETURNING {LABEL_COLUMNS}",
		table.as_str()
	);

	sqlx::query_as::<_, T>(&sql)
		.bind(name)
		.bind(id)
		.fetch_optional(pool)
		.await
		.map_err(|err| Error::from_write(err, table.conflict_field()))
}

/// Detaches referencing notes and removes the label in one transaction.
///
/// Notes carry no foreign key to their labels, so a note written concurrently with a reference to
/// the label after the detach statement runs keeps that reference. Readers treat such dangling
/// ids as absent.
pub(crate) async fn delete_cascade(
	pool: &PgPool,
	table: LabelTable,
	id: Uuid,
) -> Result<CascadeReport> {
	let mut tx = pool.begin().await?;
	let notes_updated =
		sqlx::query(table.detach_sql()).bind(id).execute(&mut *tx).await?.rows_affected();
	let delete_sql = format!("DELETE FROM {} WHERE id = $1", table.as_str());
	let removed = sqlx::query(&delete_sql).bind(id).execute(&mut *tx).await?.rows_affected() > 0;

	tx.commit().await?;

	Ok(CascadeReport { removed, notes_updated })
}
