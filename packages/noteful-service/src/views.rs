//! Public representations. Store-internal fields such as the note insertion counter are dropped.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use noteful_storage::models::{Folder, Note, Tag};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderView {
	pub id: Uuid,
	pub name: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Folder> for FolderView {
	fn from(folder: Folder) -> Self {
		Self {
			id: folder.id,
			name: folder.name,
			created_at: folder.created_at,
			updated_at: folder.updated_at,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagView {
	pub id: Uuid,
	pub name: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Tag> for TagView {
	fn from(tag: Tag) -> Self {
		Self { id: tag.id, name: tag.name, created_at: tag.created_at, updated_at: tag.updated_at }
	}
}

/// A note with its tags resolved inline, in the note's own tag order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView {
	pub id: Uuid,
	pub title: String,
	pub content: Option<String>,
	pub folder_id: Option<Uuid>,
	pub tags: Vec<TagView>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl NoteView {
	pub(crate) fn new(note: Note, tags: Vec<TagView>) -> Self {
		Self {
			id: note.id,
			title: note.title,
			content: note.content,
			folder_id: note.folder_id,
			tags,
			created_at: note.created_at,
			updated_at: note.updated_at,
		}
	}
}
