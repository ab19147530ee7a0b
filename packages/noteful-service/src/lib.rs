pub mod folders;
pub mod notes;
pub mod tags;
pub mod time_serde;
pub mod validate;
pub mod views;

mod error;

pub use error::{Error, Result};
pub use folders::FolderService;
pub use notes::{NoteCreateRequest, NoteQuery, NoteService, NoteUpdateRequest};
pub use tags::TagService;
pub use views::{FolderView, NoteView, TagView};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use noteful_storage::Store;

/// Body of a folder or tag create/rename.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NameRequest {
	pub name: Option<String>,
}
impl NameRequest {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: Some(name.into()) }
	}
}

/// The three collection services, all sharing one injected store.
pub struct NotefulService {
	pub folders: FolderService,
	pub tags: TagService,
	pub notes: NoteService,
}
impl NotefulService {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self {
			folders: FolderService::new(store.clone()),
			tags: TagService::new(store.clone()),
			notes: NoteService::new(store),
		}
	}
}
