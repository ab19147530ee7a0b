use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Folder {
	pub id: Uuid,
	pub name: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Tag {
	pub id: Uuid,
	pub name: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// A stored note. `seq` is the store's insertion counter and only breaks `created_at` ties.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Note {
	pub id: Uuid,
	pub seq: i64,
	pub title: String,
	pub content: Option<String>,
	pub folder_id: Option<Uuid>,
	pub tags: Vec<Uuid>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewNote {
	pub title: String,
	pub content: Option<String>,
	pub folder_id: Option<Uuid>,
	pub tags: Vec<Uuid>,
}

/// Partial note update. The outer `Option` means "leave unchanged"; for `content` and
/// `folder_id` an inner `None` clears the field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotePatch {
	pub title: Option<String>,
	pub content: Option<Option<String>>,
	pub folder_id: Option<Option<Uuid>>,
}
impl NotePatch {
	pub fn is_empty(&self) -> bool {
		self.title.is_none() && self.content.is_none() && self.folder_id.is_none()
	}
}

/// Conjunction of optional note filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteFilter {
	/// Case-insensitive literal substring matched against `title` or `content`.
	pub search_term: Option<String>,
	pub folder_id: Option<Uuid>,
	pub tag_id: Option<Uuid>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CascadeReport {
	pub removed: bool,
	pub notes_updated: u64,
}
