use std::{
	collections::HashSet,
	fs,
	path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use serde::{Deserialize, de::DeserializeOwned};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use noteful_storage::{
	db::Db,
	models::NewNote,
	seed::{LabelSeed, NoteSeed, SeedData},
};

/// Drops and reloads the database from JSON fixtures.
#[derive(Debug, Parser)]
#[command(
	version = noteful_cli::VERSION,
	rename_all = "kebab",
	styles = noteful_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Directory holding `folders.json`, `tags.json`, and `notes.json`.
	#[arg(long, short = 'd', value_name = "DIR", default_value = "db/seed")]
	pub seed_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct LabelFixture {
	id: Uuid,
	name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteFixture {
	id: Uuid,
	title: String,
	content: Option<String>,
	folder_id: Option<Uuid>,
	#[serde(default)]
	tags: Vec<Uuid>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = noteful_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let fixtures = load_fixtures(&args.seed_dir)?;
	let db = Db::connect(&config.storage.postgres).await?;
	let result = db.reload(&fixtures).await;

	db.close().await;

	let report = result.wrap_err("Failed to reload seed data.")?;

	tracing::info!(
		notes = report.notes,
		folders = report.folders,
		tags = report.tags,
		"Seed data inserted."
	);

	Ok(())
}

pub fn load_fixtures(dir: &Path) -> color_eyre::Result<SeedData> {
	let folders = read_json::<LabelFixture>(&dir.join("folders.json"))?;
	let tags = read_json::<LabelFixture>(&dir.join("tags.json"))?;
	let notes = read_json::<NoteFixture>(&dir.join("notes.json"))?;

	check_unique_names("folders", &folders)?;
	check_unique_names("tags", &tags)?;

	for note in &notes {
		if note.title.trim().is_empty() {
			return Err(eyre::eyre!("Seed note {} has an empty title.", note.id));
		}
	}

	Ok(SeedData {
		folders: folders.into_iter().map(LabelFixture::into_seed).collect(),
		tags: tags.into_iter().map(LabelFixture::into_seed).collect(),
		notes: notes.into_iter().map(NoteFixture::into_seed).collect(),
	})
}

fn read_json<T>(path: &Path) -> color_eyre::Result<Vec<T>>
where
	T: DeserializeOwned,
{
	let raw = fs::read_to_string(path)
		.wrap_err_with(|| format!("Failed to read seed file at {path:?}."))?;

	serde_json::from_str(&raw).wrap_err_with(|| format!("Failed to parse seed file at {path:?}."))
}

fn check_unique_names(kind: &str, rows: &[LabelFixture]) -> color_eyre::Result<()> {
	let mut seen = HashSet::new();

	for row in rows {
		if !seen.insert(row.name.as_str()) {
			return Err(eyre::eyre!("Seed {kind} repeat the name {:?}.", row.name));
		}
	}

	Ok(())
}

impl LabelFixture {
	fn into_seed(self) -> LabelSeed {
		LabelSeed { id: self.id, name: self.name }
	}
}

impl NoteFixture {
	fn into_seed(self) -> NoteSeed {
		NoteSeed {
			id: self.id,
			note: NewNote {
				title: self.title,
				content: self.content,
				folder_id: self.folder_id,
				tags: self.tags,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bundled_seed_dir() -> PathBuf {
		Path::new(env!("CARGO_MANIFEST_DIR")).join("../../db/seed")
	}

	#[test]
	fn bundled_fixtures_load_and_reference_known_ids() {
		let fixtures = load_fixtures(&bundled_seed_dir()).expect("Failed to load fixtures.");
		let folder_ids = fixtures.folders.iter().map(|row| row.id).collect::<HashSet<_>>();
		let tag_ids = fixtures.tags.iter().map(|row| row.id).collect::<HashSet<_>>();

		assert!(!fixtures.notes.is_empty());

		for seed in &fixtures.notes {
			if let Some(folder_id) = seed.note.folder_id {
				assert!(folder_ids.contains(&folder_id), "Unknown folder on {}.", seed.id);
			}
			for tag_id in &seed.note.tags {
				assert!(tag_ids.contains(tag_id), "Unknown tag on {}.", seed.id);
			}
		}
	}

	#[test]
	fn bundled_fixtures_include_a_search_hit_for_car() {
		let fixtures = load_fixtures(&bundled_seed_dir()).expect("Failed to load fixtures.");
		let hits = fixtures
			.notes
			.iter()
			.filter(|seed| {
				let title = seed.note.title.to_lowercase();
				let content = seed.note.content.as_deref().unwrap_or_default().to_lowercase();

				title.contains("car") || content.contains("car")
			})
			.count();

		assert_eq!(hits, 1);
	}

	#[test]
	fn duplicate_fixture_names_are_rejected() {
		let rows = vec![
			LabelFixture { id: Uuid::new_v4(), name: "Work".to_string() },
			LabelFixture { id: Uuid::new_v4(), name: "Work".to_string() },
		];
		let err = check_unique_names("folders", &rows).expect_err("Expected duplicate error.");

		assert!(err.to_string().contains("Work"));
	}
}
