use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
	Result,
	models::{NewNote, Note, NoteFilter, NotePatch},
};

pub(crate) const NOTE_COLUMNS: &str =
	"id, seq, title, content, folder_id, tags, created_at, updated_at";

pub(crate) async fn list(pool: &PgPool, filter: &NoteFilter) -> Result<Vec<Note>> {
	let mut builder: QueryBuilder<Postgres> =
		QueryBuilder::new(format!("SELECT {NOTE_COLUMNS} FROM notes WHERE TRUE"));

	if let Some(term) = filter.search_term.as_deref() {
		let pattern = like_pattern(term);

		builder.push(" AND (title ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" OR content ILIKE ");
		builder.push_bind(pattern);
		builder.push(")");
	}
	if let Some(folder_id) = filter.folder_id {
		builder.push(" AND folder_id = ");
		builder.push_bind(folder_id);
	}
	if let Some(tag_id) = filter.tag_id {
		builder.push(" AND ");
		builder.push_bind(tag_id);
		builder.push(" = ANY(tags)");
	}

	builder.push(" ORDER BY created_at ASC, seq ASC");

	let notes = builder.build_query_as::<Note>().fetch_all(pool).await?;

	Ok(notes)
}

pub(crate) async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Note>> {
	let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1");
	let note = sqlx::query_as::<_, Note>(&sql).bind(id).fetch_optional(pool).await?;

	Ok(note)
}

pub(crate) async fn insert(pool: &PgPool, note: &NewNote) -> Result<Note> {
	let sql = format!(
		"\
INSERT INTO notes (title, content, folder_id, tags)
VALUES ($1, $2, $3, $4)
RETURNING {NOTE_COLUMNS}"
	);
	let note = sqlx::query_as::<_, Note>(&sql)
		.bind(note.title.as_str())
		.bind(note.content.as_deref())
		.bind(note.folder_id)
		.bind(note.tags.as_slice())
		.fetch_one(pool)
		.await?;

	Ok(note)
}

pub(crate) async fn update(pool: &PgPool, id: Uuid, patch: &NotePatch) -> Result<Option<Note>> {
	let mut builder: QueryBuilder<Postgres> =
		QueryBuilder::new("UPDATE notes SET updated_at = now()");

	if let Some(title) = patch.title.as_deref() {
		builder.push(", title = ");
		builder.push_bind(title);
	}
	if let Some(content) = patch.content.as_ref() {
		builder.push(", content = ");
		builder.push_bind(content.as_deref());
	}
	if let Some(folder_id) = patch.folder_id {
		builder.push(", folder_id = ");
		builder.push_bind(folder_id);
	}

	builder.push(" WHERE id = ");
	builder.push_bind(id);
	builder.push(format!(" RETURNING {NOTE_COLUMNS}"));

	let note = builder.build_query_as::<Note>().fetch_optional(pool).await?;

	Ok(note)
}

pub(crate) async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
	let result = sqlx::query("DELETE FROM notes WHERE id = $1").bind(id).execute(pool).await?;

	Ok(result.rows_affected() > 0)
}

/// Builds an `ILIKE` pattern that matches `term` literally anywhere in the value.
pub(crate) fn like_pattern(term: &str) -> String {
	let mut pattern = String::with_capacity(term.len() + 2);

	pattern.push('%');

	for ch in term.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			pattern.push('\\');
		}

		pattern.push(ch);
	}

	pattern.push('%');

	pattern
}
