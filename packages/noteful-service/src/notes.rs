use std::{
	collections::{HashMap, HashSet},
	sync::Arc,
};

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use noteful_storage::{
	Store,
	models::{NewNote, Note, NoteFilter, NotePatch},
};

use crate::{
	Error, Result,
	validate::{parse_id, parse_reference, required_text, storable_text},
	views::{NoteView, TagView},
};

/// Query string of `GET /api/notes`. Every filter is optional and they combine with AND.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteQuery {
	pub search_term: Option<String>,
	pub folder_id: Option<String>,
	pub tag_id: Option<String>,
}

/// Body of a note creation. Fields outside this set are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCreateRequest {
	pub title: Option<String>,
	pub content: Option<String>,
	pub folder_id: Option<String>,
	pub tags: Option<Vec<String>>,
}

/// Body of a partial note update. A missing key leaves the field alone and `null` clears it.
/// Tags cannot be changed through an update.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdateRequest {
	#[serde(default, deserialize_with = "present")]
	pub title: Option<Option<String>>,
	#[serde(default, deserialize_with = "present")]
	pub content: Option<Option<String>>,
	#[serde(default, deserialize_with = "present")]
	pub folder_id: Option<Option<String>>,
}

pub struct NoteService {
	store: Arc<dyn Store>,
}
impl NoteService {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self { store }
	}

	pub async fn list(&self, query: NoteQuery) -> Result<Vec<NoteView>> {
		if let Some(term) = &query.search_term {
			storable_text(term, "searchTerm")?;
		}

		let filter = NoteFilter {
			search_term: query.search_term.filter(|term| !term.is_empty()),
			folder_id: parse_reference(query.folder_id.as_deref(), "folderId")?,
			tag_id: parse_reference(query.tag_id.as_deref(), "tagId")?,
		};
		let notes = self.store.list_notes(&filter).await?;

		self.populate(notes).await
	}

	pub async fn get(&self, id: &str) -> Result<NoteView> {
		let id = parse_id(id)?;
		let note = self.store.find_note(id).await?.ok_or_else(Error::not_found)?;

		self.populate_one(note).await
	}

	pub async fn create(&self, req: NoteCreateRequest) -> Result<NoteView> {
		let title = required_text(req.title.as_deref(), "title")?;

		if let Some(content) = &req.content {
			storable_text(content, "content")?;
		}

		let folder_id = parse_reference(req.folder_id.as_deref(), "folderId")?;
		let tags = parse_tag_ids(req.tags.as_deref().unwrap_or_default())?;
		let note = self
			.store
			.insert_note(&NewNote { title, content: req.content, folder_id, tags })
			.await?;

		tracing::info!(note_id = %note.id, tag_count = note.tags.len(), "Note created.");

		self.populate_one(note).await
	}

	pub async fn update(&self, id: &str, req: NoteUpdateRequest) -> Result<NoteView> {
		let id = parse_id(id)?;
		let patch = build_patch(req)?;
		let note = if patch.is_empty() {
			self.store.find_note(id).await?
		} else {
			self.store.update_note(id, &patch).await?
		}
		.ok_or_else(Error::not_found)?;

		tracing::info!(note_id = %note.id, changed = !patch.is_empty(), "Note updated.");

		self.populate_one(note).await
	}

	/// Removes the note. Unknown ids succeed.
	pub async fn delete(&self, id: &str) -> Result<()> {
		let id = parse_id(id)?;
		let removed = self.store.delete_note(id).await?;

		tracing::info!(note_id = %id, removed, "Note deleted.");

		Ok(())
	}

	async fn populate_one(&self, note: Note) -> Result<NoteView> {
		let mut views = self.populate(vec![note]).await?;

		views.pop().ok_or_else(Error::not_found)
	}

	/// Resolves every referenced tag with one lookup. Tags that no longer exist are skipped.
	async fn populate(&self, notes: Vec<Note>) -> Result<Vec<NoteView>> {
		let mut seen = HashSet::new();
		let ids = notes
			.iter()
			.flat_map(|note| note.tags.iter().copied())
			.filter(|id| seen.insert(*id))
			.collect::<Vec<_>>();
		let tags = self
			.store
			.find_tags(&ids)
			.await?
			.into_iter()
			.map(|tag| (tag.id, TagView::from(tag)))
			.collect::<HashMap<_, _>>();

		Ok(notes
			.into_iter()
			.map(|note| {
				let resolved = note.tags.iter().filter_map(|id| tags.get(id).cloned()).collect();

				NoteView::new(note, resolved)
			})
			.collect())
	}
}

fn parse_tag_ids(raw: &[String]) -> Result<Vec<Uuid>> {
	raw.iter()
		.map(|value| {
			Uuid::parse_str(value).map_err(|_| Error::InvalidReference {
				message: format!("The tag id `{value}` is not valid"),
			})
		})
		.collect()
}

fn build_patch(req: NoteUpdateRequest) -> Result<NotePatch> {
	let title = match req.title {
		None => None,
		Some(title) => Some(required_text(title.as_deref(), "title")?),
	};

	if let Some(Some(content)) = &req.content {
		storable_text(content, "content")?;
	}

	let folder_id = match req.folder_id {
		None => None,
		Some(folder_id) => Some(parse_reference(folder_id.as_deref(), "folderId")?),
	};

	Ok(NotePatch { title, content: req.content, folder_id })
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key (`None`, via `default`).
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn update_request_distinguishes_null_from_missing() {
		let req: NoteUpdateRequest =
			serde_json::from_str(r#"{"content": null}"#).expect("Failed to parse update.");

		assert_eq!(req.title, None);
		assert_eq!(req.content, Some(None));
		assert_eq!(req.folder_id, None);
	}

	#[test]
	fn update_request_ignores_tags_and_unknown_fields() {
		let req: NoteUpdateRequest =
			serde_json::from_str(r#"{"title": "Dogs", "tags": ["x"], "foo": 1}"#)
				.expect("Failed to parse update.");
		let patch = build_patch(req).expect("Failed to build patch.");

		assert_eq!(patch.title.as_deref(), Some("Dogs"));
		assert!(patch.content.is_none());
		assert!(patch.folder_id.is_none());
	}

	#[test]
	fn empty_folder_id_clears_on_update() {
		let req: NoteUpdateRequest =
			serde_json::from_str(r#"{"folderId": ""}"#).expect("Failed to parse update.");
		let patch = build_patch(req).expect("Failed to build patch.");

		assert_eq!(patch.folder_id, Some(None));
	}

	#[test]
	fn null_title_is_a_validation_error() {
		let req: NoteUpdateRequest =
			serde_json::from_str(r#"{"title": null}"#).expect("Failed to parse update.");
		let err = build_patch(req).expect_err("Expected validation error.");

		assert!(matches!(err, Error::Validation { .. }));
	}

	#[test]
	fn nul_in_patched_content_is_a_validation_error() {
		let req: NoteUpdateRequest =
			serde_json::from_str(r#"{"content": "a\u0000b"}"#).expect("Failed to parse update.");
		let err = build_patch(req).expect_err("Expected validation error.");

		assert_eq!(err.to_string(), "The `content` must not contain NUL characters");
	}

	#[test]
	fn bad_tag_id_is_named_in_the_message() {
		let good = Uuid::new_v4().to_string();
		let err = parse_tag_ids(&[good, "not-an-id".to_string()])
			.expect_err("Expected invalid reference.");

		assert_eq!(err.to_string(), "The tag id `not-an-id` is not valid");
	}
}
