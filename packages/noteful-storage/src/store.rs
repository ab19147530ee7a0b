use std::{future::Future, pin::Pin};

use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	labels::{self, LabelTable},
	models::{CascadeReport, Folder, NewNote, Note, NoteFilter, NotePatch, Tag},
	notes,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Repository interface over the three collections.
///
/// Writes that violate a unique name index fail with [`crate::Error::Conflict`]. Lookups by id
/// return `None` instead of failing when nothing matches.
pub trait Store
where
	Self: Send + Sync,
{
	/// Folders ordered by name.
	fn list_folders(&self) -> BoxFuture<'_, Result<Vec<Folder>>>;

	fn find_folder(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Folder>>>;

	fn insert_folder<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Folder>>;

	fn rename_folder<'a>(
		&'a self,
		id: Uuid,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<Folder>>>;

	/// Clears `folder_id` on every note pointing at `id`, then removes the folder.
	fn delete_folder(&self, id: Uuid) -> BoxFuture<'_, Result<CascadeReport>>;

	/// Tags ordered by name.
	fn list_tags(&self) -> BoxFuture<'_, Result<Vec<Tag>>>;

	fn find_tag(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Tag>>>;

	/// Tags whose id is in `ids`, in no particular order. Unknown ids are skipped.
	fn find_tags<'a>(&'a self, ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Tag>>>;

	fn insert_tag<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Tag>>;

	fn rename_tag<'a>(&'a self, id: Uuid, name: &'a str) -> BoxFuture<'a, Result<Option<Tag>>>;

	/// Pulls `id` out of every note's tag list, then removes the tag.
	fn delete_tag(&self, id: Uuid) -> BoxFuture<'_, Result<CascadeReport>>;

	/// Notes matching every filter, oldest first with insertion order breaking ties.
	fn list_notes<'a>(&'a self, filter: &'a NoteFilter) -> BoxFuture<'a, Result<Vec<Note>>>;

	fn find_note(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Note>>>;

	fn insert_note<'a>(&'a self, note: &'a NewNote) -> BoxFuture<'a, Result<Note>>;

	fn update_note<'a>(
		&'a self,
		id: Uuid,
		patch: &'a NotePatch,
	) -> BoxFuture<'a, Result<Option<Note>>>;

	/// Returns whether a note was removed.
	fn delete_note(&self, id: Uuid) -> BoxFuture<'_, Result<bool>>;
}

impl Store for Db {
	fn list_folders(&self) -> BoxFuture<'_, Result<Vec<Folder>>> {
		Box::pin(labels::list(&self.pool, LabelTable::Folders))
	}

	fn find_folder(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Folder>>> {
		Box::pin(labels::find(&self.pool, LabelTable::Folders, id))
	}

	fn insert_folder<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Folder>> {
		Box::pin(labels::insert(&self.pool, LabelTable::Folders, name))
	}

	fn rename_folder<'a>(
		&'a self,
		id: Uuid,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<Folder>>> {
		Box::pin(labels::rename(&self.pool, LabelTable::Folders, id, name))
	}

	fn delete_folder(&self, id: Uuid) -> BoxFuture<'_, Result<CascadeReport>> {
		Box::pin(labels::delete_cascade(&self.pool, LabelTable::Folders, id))
	}

	fn list_tags(&self) -> BoxFuture<'_, Result<Vec<Tag>>> {
		Box::pin(labels::list(&self.pool, LabelTable::Tags))
	}

	fn find_tag(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Tag>>> {
		Box::pin(labels::find(&self.pool, LabelTable::Tags, id))
	}

	fn find_tags<'a>(&'a self, ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Tag>>> {
		Box::pin(labels::find_many(&self.pool, LabelTable::Tags, ids))
	}

	fn insert_tag<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Tag>> {
		Box::pin(labels::insert(&self.pool, LabelTable::Tags, name))
	}

	fn rename_tag<'a>(&'a self, id: Uuid, name: &'a str) -> BoxFuture<'a, Result<Option<Tag>>> {
		Box::pin(labels::rename(&self.pool, LabelTable::Tags, id, name))
	}

	fn delete_tag(&self, id: Uuid) -> BoxFuture<'_, Result<CascadeReport>> {
		Box::pin(labels::delete_cascade(&self.pool, LabelTable::Tags, id))
	}

	fn list_notes<'a>(&'a self, filter: &'a NoteFilter) -> BoxFuture<'a, Result<Vec<Note>>> {
		Box::pin(notes::list(&self.pool, filter))
	}

	fn find_note(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Note>>> {
		Box::pin(notes::find(&self.pool, id))
	}

	fn insert_note<'a>(&'a self, note: &'a NewNote) -> BoxFuture<'a, Result<Note>> {
		Box::pin(notes::insert(&self.pool, note))
	}

	fn update_note<'a>(
		&'a self,
		id: Uuid,
		patch: &'a NotePatch,
	) -> BoxFuture<'a, Result<Option<Note>>> {
		Box::pin(notes::update(&self.pool, id, patch))
	}

	fn delete_note(&self, id: Uuid) -> BoxFuture<'_, Result<bool>> {
		Box::pin(notes::delete(&self.pool, id))
	}
}
