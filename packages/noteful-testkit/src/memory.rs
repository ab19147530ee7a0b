use std::{
	future,
	sync::{
		Mutex, MutexGuard,
		atomic::{AtomicBool, Ordering},
	},
};

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use noteful_storage::{
	BoxFuture, Error, Result, Store,
	models::{CascadeReport, Folder, NewNote, Note, NoteFilter, NotePatch, Tag},
};

/// In-process [`Store`] with the same ordering, uniqueness, search, and cascade rules as the
/// Postgres store.
#[derive(Default)]
pub struct MemoryStore {
	inner: Mutex<Inner>,
	unavailable: AtomicBool,
}

#[derive(Default)]
struct Inner {
	folders: Vec<Folder>,
	tags: Vec<Tag>,
	notes: Vec<Note>,
	next_seq: i64,
	last_tick: Option<OffsetDateTime>,
}
impl Inner {
	/// Strictly increasing timestamps at microsecond precision, like `timestamptz`.
	fn tick(&mut self) -> OffsetDateTime {
		let now = OffsetDateTime::now_utc();
		let now = now.replace_nanosecond(now.microsecond() * 1_000).unwrap_or(now);
		let next = match self.last_tick {
			Some(last) if now <= last => last + Duration::microseconds(1),
			_ => now,
		};

		self.last_tick = Some(next);

		next
	}
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// While set, every operation fails the way a lost database connection does.
	pub fn set_unavailable(&self, unavailable: bool) {
		self.unavailable.store(unavailable, Ordering::SeqCst);
	}

	pub fn folder_count(&self) -> usize {
		self.lock().folders.len()
	}

	pub fn tag_count(&self) -> usize {
		self.lock().tags.len()
	}

	pub fn note_count(&self) -> usize {
		self.lock().notes.len()
	}

	fn lock(&self) -> MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn run<T, F>(&self, op: F) -> BoxFuture<'_, Result<T>>
	where
		T: Send + 'static,
		F: FnOnce(&mut Inner) -> Result<T>,
	{
		let result = if self.unavailable.load(Ordering::SeqCst) {
			Err(Error::Sqlx(sqlx::Error::PoolClosed))
		} else {
			op(&mut *self.lock())
		};

		Box::pin(future::ready(result))
	}
}

impl Store for MemoryStore {
	fn list_folders(&self) -> BoxFuture<'_, Result<Vec<Folder>>> {
		self.run(|inner| {
			let mut folders = inner.folders.clone();

			folders.sort_by(|a, b| a.name.cmp(&b.name));

			Ok(folders)
		})
	}

	fn find_folder(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Folder>>> {
		self.run(move |inner| Ok(inner.folders.iter().find(|folder| folder.id == id).cloned()))
	}

	fn insert_folder<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Folder>> {
		self.run(move |inner| {
			encodable([name])?;

			if inner.folders.iter().any(|folder| folder.name == name) {
				return Err(Error::Conflict("Folder name already exists.".to_string()));
			}

			let now = inner.tick();
			let folder = Folder {
				id: Uuid::new_v4(),
				name: name.to_string(),
				created_at: now,
				updated_at: now,
			};

			inner.folders.push(folder.clone());

			Ok(folder)
		})
	}

	fn rename_folder<'a>(
		&'a self,
		id: Uuid,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<Folder>>> {
		self.run(move |inner| {
			encodable([name])?;

			let Some(index) = inner.folders.iter().position(|folder| folder.id == id) else {
				return Ok(None);
			};

			if inner.folders.iter().any(|folder| folder.id != id && folder.name == name) {
				return Err(Error::Conflict("Folder name already exists.".to_string()));
			}

			let now = inner.tick();
			let folder = &mut inner.folders[index];

			folder.name = name.to_string();
			folder.updated_at = now;

			Ok(Some(folder.clone()))
		})
	}

	fn delete_folder(&self, id: Uuid) -> BoxFuture<'_, Result<CascadeReport>> {
		self.run(move |inner| {
			let now = inner.tick();
			let mut notes_updated = 0;

			for note in inner.notes.iter_mut().filter(|note| note.folder_id == Some(id)) {
				note.folder_id = None;
				note.updated_at = now;
				notes_updated += 1;
			}

			let before = inner.folders.len();

			inner.folders.retain(|folder| folder.id != id);

			Ok(CascadeReport { removed: inner.folders.len() < before, notes_updated })
		})
	}

	fn list_tags(&self) -> BoxFuture<'_, Result<Vec<Tag>>> {
		self.run(|inner| {
			let mut tags = inner.tags.clone();

			tags.sort_by(|a, b| a.name.cmp(&b.name));

			Ok(tags)
		})
	}

	fn find_tag(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Tag>>> {
		self.run(move |inner| Ok(inner.tags.iter().find(|tag| tag.id == id).cloned()))
	}

	fn find_tags<'a>(&'a self, ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Tag>>> {
		self.run(move |inner| {
			Ok(inner.tags.iter().filter(|tag| ids.contains(&tag.id)).cloned().collect())
		})
	}

	fn insert_tag<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Tag>> {
		self.run(move |inner| {
			encodable([name])?;

			if inner.tags.iter().any(|tag| tag.name == name) {
				return Err(Error::Conflict("Tag name already exists.".to_string()));
			}

			let now = inner.tick();
			let tag = Tag {
				id: Uuid::new_v4(),
				name: name.to_string(),
				created_at: now,
				updated_at: now,
			};

			inner.tags.push(tag.clone());

			Ok(tag)
		})
	}

	fn rename_tag<'a>(&'a self, id: Uuid, name: &'a str) -> BoxFuture<'a, Result<Option<Tag>>> {
		self.run(move |inner| {
			encodable([name])?;

			let Some(index) = inner.tags.iter().position(|tag| tag.id == id) else {
				return Ok(None);
			};

			if inner.tags.iter().any(|tag| tag.id != id && tag.name == name) {
				return Err(Error::Conflict("Tag name already exists.".to_string()));
			}

			let now = inner.tick();
			let tag = &mut inner.tags[index];

			tag.name = name.to_string();
			tag.updated_at = now;

			Ok(Some(tag.clone()))
		})
	}

	fn delete_tag(&self, id: Uuid) -> BoxFuture<'_, Result<CascadeReport>> {
		self.run(move |inner| {
			let now = inner.tick();
			let mut notes_updated = 0;

			for note in inner.notes.iter_mut().filter(|note| note.tags.contains(&id)) {
				note.tags.retain(|tag_id| *tag_id != id);
				note.updated_at = now;
				notes_updated += 1;
			}

			let before = inner.tags.len();

			inner.tags.retain(|tag| tag.id != id);

			Ok(CascadeReport { removed: inner.tags.len() < before, notes_updated })
		})
	}

	fn list_notes<'a>(&'a self, filter: &'a NoteFilter) -> BoxFuture<'a, Result<Vec<Note>>> {
		self.run(move |inner| {
			encodable(filter.search_term.as_deref())?;

			let term = filter.search_term.as_deref().map(str::to_lowercase);
			let mut notes = inner
				.notes
				.iter()
				.filter(|note| match term.as_deref() {
					Some(term) =>
						note.title.to_lowercase().contains(term)
							|| note
								.content
								.as_deref()
								.map(|content| content.to_lowercase().contains(term))
								.unwrap_or(false),
					None => true,
				})
				.filter(|note| filter.folder_id.is_none_or(|id| note.folder_id == Some(id)))
				.filter(|note| filter.tag_id.is_none_or(|id| note.tags.contains(&id)))
				.cloned()
				.collect::<Vec<_>>();

			notes.sort_by_key(|note| (note.created_at, note.seq));

			Ok(notes)
		})
	}

	fn find_note(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Note>>> {
		self.run(move |inner| Ok(inner.notes.iter().find(|note| note.id == id).cloned()))
	}

	fn insert_note<'a>(&'a self, note: &'a NewNote) -> BoxFuture<'a, Result<Note>> {
		self.run(move |inner| {
			encodable(Some(note.title.as_str()).into_iter().chain(note.content.as_deref()))?;

			let now = inner.tick();

			inner.next_seq += 1;

			let note = Note {
				id: Uuid::new_v4(),
				seq: inner.next_seq,
				title: note.title.clone(),
				content: note.content.clone(),
				folder_id: note.folder_id,
				tags: note.tags.clone(),
				created_at: now,
				updated_at: now,
			};

			inner.notes.push(note.clone());

			Ok(note)
		})
	}

	fn update_note<'a>(
		&'a self,
		id: Uuid,
		patch: &'a NotePatch,
	) -> BoxFuture<'a, Result<Option<Note>>> {
		self.run(move |inner| {
			let content = patch.content.iter().flatten().map(String::as_str);

			encodable(patch.title.as_deref().into_iter().chain(content))?;

			let Some(index) = inner.notes.iter().position(|note| note.id == id) else {
				return Ok(None);
			};
			let now = inner.tick();
			let note = &mut inner.notes[index];

			if let Some(title) = patch.title.as_ref() {
				note.title = title.clone();
			}
			if let Some(content) = patch.content.as_ref() {
				note.content = content.clone();
			}
			if let Some(folder_id) = patch.folder_id {
				note.folder_id = folder_id;
			}

			note.updated_at = now;

			Ok(Some(note.clone()))
		})
	}

	fn delete_note(&self, id: Uuid) -> BoxFuture<'_, Result<bool>> {
		self.run(move |inner| {
			let before = inner.notes.len();

			inner.notes.retain(|note| note.id != id);

			Ok(inner.notes.len() < before)
		})
	}
}

/// Fails like the Postgres `text` encoder does on an embedded NUL character.
fn encodable<'a>(texts: impl IntoIterator<Item = &'a str>) -> Result<()> {
	if texts.into_iter().any(|text| text.contains('\0')) {
		return Err(Error::Sqlx(sqlx::Error::Protocol(
			"invalid byte sequence for encoding \"UTF8\": 0x00".to_string(),
		)));
	}

	Ok(())
}
