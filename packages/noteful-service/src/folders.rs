use std::sync::Arc;

use noteful_storage::Store;

use crate::{
	Error, NameRequest, Result,
	validate::{parse_id, required_text},
	views::FolderView,
};

const DUPLICATE_FOLDER: &str = "The folder name already exists";

pub struct FolderService {
	store: Arc<dyn Store>,
}
impl FolderService {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self { store }
	}

	pub async fn list(&self) -> Result<Vec<FolderView>> {
		let folders = self.store.list_folders().await?;

		Ok(folders.into_iter().map(FolderView::from).collect())
	}

	pub async fn get(&self, id: &str) -> Result<FolderView> {
		let id = parse_id(id)?;
		let folder = self.store.find_folder(id).await?.ok_or_else(Error::not_found)?;

		Ok(folder.into())
	}

	pub async fn create(&self, req: NameRequest) -> Result<FolderView> {
		let name = required_text(req.name.as_deref(), "name")?;
		let folder = self.store.insert_folder(&name).await.map_err(|err| {
			let err = Error::from_write(err, DUPLICATE_FOLDER);

			if matches!(err, Error::DuplicateName { .. }) {
				tracing::warn!(name = %name, "Rejected duplicate folder name.");
			}

			err
		})?;

		tracing::info!(folder_id = %folder.id, "Folder created.");

		Ok(folder.into())
	}

	pub async fn update(&self, id: &str, req: NameRequest) -> Result<FolderView> {
		let id = parse_id(id)?;
		let name = required_text(req.name.as_deref(), "name")?;
		let folder = self
			.store
			.rename_folder(id, &name)
			.await
			.map_err(|err| Error::from_write(err, DUPLICATE_FOLDER))?
			.ok_or_else(Error::not_found)?;

		tracing::info!(folder_id = %folder.id, "Folder renamed.");

		Ok(folder.into())
	}

	/// Removes the folder after clearing it from every note that referenced it. Unknown ids
	/// succeed.
	pub async fn delete(&self, id: &str) -> Result<()> {
		let id = parse_id(id)?;
		let report = self.store.delete_folder(id).await?;

		tracing::info!(
			folder_id = %id,
			removed = report.removed,
			notes_updated = report.notes_updated,
			"Folder deleted."
		);

		Ok(())
	}
}
