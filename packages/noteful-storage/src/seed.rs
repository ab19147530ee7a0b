//! Bulk inserts with caller-chosen ids, used to load fixture data.

use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{Error, Result, db::Db, models::NewNote, schema};

const BATCH_SIZE: usize = 1_000;

#[derive(Clone, Debug)]
pub struct LabelSeed {
	pub id: Uuid,
	pub name: String,
}

#[derive(Clone, Debug)]
pub struct NoteSeed {
	pub id: Uuid,
	pub note: NewNote,
}

/// A full data set for [`Db::reload`].
#[derive(Clone, Debug, Default)]
pub struct SeedData {
	pub folders: Vec<LabelSeed>,
	pub tags: Vec<LabelSeed>,
	pub notes: Vec<NoteSeed>,
}

/// Rows inserted per table by [`Db::reload`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
	pub folders: u64,
	pub tags: u64,
	pub notes: u64,
}

impl Db {
	/// Drops every table, recreates the schema, and inserts `data`, all in one transaction.
	/// On failure the previous tables and rows are left as they were.
	pub async fn reload(&self, data: &SeedData) -> Result<SeedReport> {
		let mut tx = self.pool.begin().await?;

		Db::lock_schema(&mut tx).await?;
		sqlx::query(Db::DROP_TABLES).execute(&mut *tx).await?;
		sqlx::raw_sql(&schema::render_schema()).execute(&mut *tx).await?;

		let report = SeedReport {
			notes: insert_notes(&mut tx, &data.notes).await?,
			folders: insert_labels(&mut tx, "folders", "Folder name", &data.folders).await?,
			tags: insert_labels(&mut tx, "tags", "Tag name", &data.tags).await?,
		};

		tx.commit().await?;

		tracing::warn!(?report, "Replaced notes, tags, and folders with seed data.");

		Ok(report)
	}

	pub async fn insert_folders(&self, rows: &[LabelSeed]) -> Result<u64> {
		let mut tx = self.pool.begin().await?;
		let inserted = insert_labels(&mut tx, "folders", "Folder name", rows).await?;

		tx.commit().await?;

		Ok(inserted)
	}

	pub async fn insert_tags(&self, rows: &[LabelSeed]) -> Result<u64> {
		let mut tx = self.pool.begin().await?;
		let inserted = insert_labels(&mut tx, "tags", "Tag name", rows).await?;

		tx.commit().await?;

		Ok(inserted)
	}

	pub async fn insert_notes(&self, rows: &[NoteSeed]) -> Result<u64> {
		let mut tx = self.pool.begin().await?;
		let inserted = insert_notes(&mut tx, rows).await?;

		tx.commit().await?;

		Ok(inserted)
	}
}

/// Inserts notes in slice order, so insertion order is the `created_at` tie-break.
async fn insert_notes(conn: &mut PgConnection, rows: &[NoteSeed]) -> Result<u64> {
	let mut inserted = 0;

	for batch in rows.chunks(BATCH_SIZE) {
		let mut builder: QueryBuilder<Postgres> =
			QueryBuilder::new("INSERT INTO notes (id, title, content, folder_id, tags) ");

		builder.push_values(batch, |mut row, seed| {
			row.push_bind(seed.id)
				.push_bind(seed.note.title.as_str())
				.push_bind(seed.note.content.as_deref())
				.push_bind(seed.note.folder_id)
				.push_bind(seed.note.tags.as_slice());
		});

		inserted += builder.build().execute(&mut *conn).await?.rows_affected();
	}

	Ok(inserted)
}

async fn insert_labels(
	conn: &mut PgConnection,
	table: &'static str,
	conflict_field: &str,
	rows: &[LabelSeed],
) -> Result<u64> {
	let mut inserted = 0;

	for batch in rows.chunks(BATCH_SIZE) {
		let mut builder: QueryBuilder<Postgres> =
			QueryBuilder::new(format!("INSERT INTO {table} (id, name) "));

		builder.push_values(batch, |mut row, seed| {
			row.push_bind(seed.id).push_bind(seed.name.as_str());
		});

		inserted += builder
			.build()
			.execute(&mut *conn)
			.await
			.map_err(|err| Error::from_write(err, conflict_field))?
			.rows_affected();
	}

	Ok(inserted)
}
