use std::sync::Arc;

use noteful_storage::Store;

use crate::{
	Error, NameRequest, Result,
	validate::{parse_id, required_text},
	views::TagView,
};

const DUPLICATE_TAG: &str = "The tag name already exists";

pub struct TagService {
	store: Arc<dyn Store>,
}
impl TagService {
	pub fn new(store: Arc<dyn Store>) -> Self {
		Self { store }
	}

	pub async fn list(&self) -> Result<Vec<TagView>> {
		let tags = self.store.list_tags().await?;

		Ok(tags.into_iter().map(TagView::from).collect())
	}

	pub async fn get(&self, id: &str) -> Result<TagView> {
		let id = parse_id(id)?;
		let tag = self.store.find_tag(id).await?.ok_or_else(Error::not_found)?;

		Ok(tag.into())
	}

	pub async fn create(&self, req: NameRequest) -> Result<TagView> {
		let name = required_text(req.name.as_deref(), "name")?;

		match self.store.insert_tag(&name).await {
			Ok(tag) => {
				tracing::info!(tag_id = %tag.id, "Tag created.");

				Ok(tag.into())
			},
			Err(err) => {
				let err = Error::from_write(err, DUPLICATE_TAG);

				if matches!(err, Error::DuplicateName { .. }) {
					tracing::warn!(name = %name, "Rejected duplicate tag name.");
				}

				Err(err)
			},
		}
	}

	/// Renames a tag. A tag removed between validation and the write yields `NotFound`.
	pub async fn update(&self, id: &str, req: NameRequest) -> Result<TagView> {
		let id = parse_id(id)?;
		let name = required_text(req.name.as_deref(), "name")?;
		let Some(tag) = self
			.store
			.rename_tag(id, &name)
			.await
			.map_err(|err| Error::from_write(err, DUPLICATE_TAG))?
		else {
			return Err(Error::not_found());
		};

		tracing::info!(tag_id = %tag.id, "Tag renamed.");

		Ok(tag.into())
	}

	/// Pulls the tag out of every note's tag list, then removes it. Unknown ids succeed.
	pub async fn delete(&self, id: &str) -> Result<()> {
		let id = parse_id(id)?;
		let report = self.store.delete_tag(id).await?;

		tracing::info!(
			tag_id = %id,
			removed = report.removed,
			notes_updated = report.notes_updated,
			"Tag deleted."
		);

		Ok(())
	}
}
