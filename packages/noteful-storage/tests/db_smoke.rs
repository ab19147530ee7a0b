use uuid::Uuid;

use noteful_storage::{
	Error, Store,
	models::{NewNote, NoteFilter, NotePatch},
	seed::{LabelSeed, NoteSeed, SeedData, SeedReport},
};
use noteful_testkit::TestDatabase;

fn new_note(title: &str, content: Option<&str>) -> NewNote {
	NewNote { title: title.to_string(), content: content.map(str::to_string), ..Default::default() }
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set NOTEFUL_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = noteful_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set NOTEFUL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = test_db.open().await.expect("Failed to open test database.");

	db.ensure_schema().await.expect("Schema bootstrap must be repeatable.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name IN ('folders', 'tags', 'notes')",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 3);

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set NOTEFUL_PG_DSN to run."]
async fn duplicate_names_conflict() {
	let Some(base_dsn) = noteful_testkit::env_dsn() else {
		eprintln!("Skipping duplicate_names_conflict; set NOTEFUL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = test_db.open().await.expect("Failed to open test database.");

	db.insert_folder("Work").await.expect("Failed to insert folder.");

	let err = db.insert_folder("Work").await.expect_err("Expected a conflict.");

	assert!(matches!(err, Error::Conflict(_)), "Unexpected error: {err:?}");

	let other = db.insert_tag("foo").await.expect("Failed to insert tag.");

	db.insert_tag("bar").await.expect("Failed to insert tag.");

	let err = db.rename_tag(other.id, "bar").await.expect_err("Expected a conflict.");

	assert!(matches!(err, Error::Conflict(_)), "Unexpected error: {err:?}");

	let renamed = db.rename_tag(other.id, "foo").await.expect("Renaming to itself must succeed.");

	assert_eq!(renamed.map(|tag| tag.name), Some("foo".to_string()));

	let missing = db.rename_folder(Uuid::new_v4(), "Trash").await.expect("Rename must not fail.");

	assert!(missing.is_none());

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set NOTEFUL_PG_DSN to run."]
async fn folder_and_tag_deletes_cascade_into_notes() {
	let Some(base_dsn) = noteful_testkit::env_dsn() else {
		eprintln!(
			"Skipping folder_and_tag_deletes_cascade_into_notes; set NOTEFUL_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = test_db.open().await.expect("Failed to open test database.");
	let folder = db.insert_folder("Work").await.expect("Failed to insert folder.");
	let foo = db.insert_tag("foo").await.expect("Failed to insert tag.");
	let bar = db.insert_tag("bar").await.expect("Failed to insert tag.");
	let note = db
		.insert_note(&NewNote {
			title: "cats".to_string(),
			content: None,
			folder_id: Some(folder.id),
			tags: vec![foo.id, bar.id],
		})
		.await
		.expect("Failed to insert note.");
	let report = db.delete_folder(folder.id).await.expect("Failed to delete folder.");

	assert!(report.removed);
	assert_eq!(report.notes_updated, 1);

	let report = db.delete_tag(foo.id).await.expect("Failed to delete tag.");

	assert!(report.removed);
	assert_eq!(report.notes_updated, 1);

	let stored =
		db.find_note(note.id).await.expect("Failed to find note.").expect("Note must persist.");

	assert_eq!(stored.folder_id, None);
	assert_eq!(stored.tags, vec![bar.id]);
	assert!(db.find_folder(folder.id).await.expect("Lookup must not fail.").is_none());

	let report = db.delete_folder(folder.id).await.expect("Repeat delete must succeed.");

	assert!(!report.removed);
	assert_eq!(report.notes_updated, 0);

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set NOTEFUL_PG_DSN to run."]
async fn search_is_literal_and_case_insensitive() {
	let Some(base_dsn) = noteful_testkit::env_dsn() else {
		eprintln!(
			"Skipping search_is_literal_and_case_insensitive; set NOTEFUL_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = test_db.open().await.expect("Failed to open test database.");

	for (title, content) in [
		("Cars and cats", None),
		("Dogs", Some("a CARTON of milk")),
		("100% cats", Some("under_score")),
		("Birds", Some("nothing here")),
	] {
		db.insert_note(&new_note(title, content)).await.expect("Failed to insert note.");
	}

	let search =
		|term: &str| NoteFilter { search_term: Some(term.to_string()), ..Default::default() };
	let titles = |notes: Vec<noteful_storage::models::Note>| {
		notes.into_iter().map(|note| note.title).collect::<Vec<_>>()
	};
	let found = db.list_notes(&search("car")).await.expect("Failed to search.");

	assert_eq!(titles(found), vec!["Cars and cats", "Dogs"]);

	let found = db.list_notes(&search("%")).await.expect("Failed to search.");

	assert_eq!(titles(found), vec!["100% cats"]);

	let found = db.list_notes(&search("_")).await.expect("Failed to search.");

	assert_eq!(titles(found), vec!["100% cats"]);

	let found = db.list_notes(&search("Not a Valid Search")).await.expect("Failed to search.");

	assert!(found.is_empty());

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set NOTEFUL_PG_DSN to run."]
async fn notes_keep_insertion_order_and_patch_fields() {
	let Some(base_dsn) = noteful_testkit::env_dsn() else {
		eprintln!(
			"Skipping notes_keep_insertion_order_and_patch_fields; set NOTEFUL_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = test_db.open().await.expect("Failed to open test database.");
	let mut ids = Vec::new();

	for title in ["first", "second", "third"] {
		let note = db.insert_note(&new_note(title, Some("body"))).await.expect("Failed to insert.");

		ids.push(note.id);
	}

	let listed = db.list_notes(&NoteFilter::default()).await.expect("Failed to list notes.");

	assert_eq!(listed.iter().map(|note| note.id).collect::<Vec<_>>(), ids);

	let patched = db
		.update_note(ids[1], &NotePatch { content: Some(None), ..Default::default() })
		.await
		.expect("Failed to update note.")
		.expect("Note must exist.");

	assert_eq!(patched.title, "second");
	assert_eq!(patched.content, None);
	assert!(patched.updated_at >= patched.created_at);
	assert!(db.update_note(Uuid::new_v4(), &NotePatch::default()).await.is_ok());
	assert!(db.delete_note(ids[0]).await.expect("Failed to delete note."));
	assert!(!db.delete_note(ids[0]).await.expect("Repeat delete must not fail."));

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set NOTEFUL_PG_DSN to run."]
async fn seeding_keeps_caller_ids() {
	let Some(base_dsn) = noteful_testkit::env_dsn() else {
		eprintln!("Skipping seeding_keeps_caller_ids; set NOTEFUL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = test_db.open().await.expect("Failed to open test database.");
	let id = Uuid::new_v4();
	let rows = vec![LabelSeed { id, name: "Archive".to_string() }];

	assert_eq!(db.insert_folders(&rows).await.expect("Failed to seed folders."), 1);

	let folder = db.find_folder(id).await.expect("Lookup must not fail.").expect("Seeded folder.");

	assert_eq!(folder.name, "Archive");

	let err = db.insert_folders(&rows).await.expect_err("Expected a conflict.");

	assert!(matches!(err, Error::Conflict(_)));

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set NOTEFUL_PG_DSN to run."]
async fn failed_reload_keeps_previous_data() {
	let Some(base_dsn) = noteful_testkit::env_dsn() else {
		eprintln!(
			"Skipping failed_reload_keeps_previous_data; set NOTEFUL_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = test_db.open().await.expect("Failed to open test database.");
	let kept = db.insert_folder("Keep").await.expect("Failed to insert folder.");
	let label = |name: &str| LabelSeed { id: Uuid::new_v4(), name: name.to_string() };
	let broken = SeedData {
		folders: vec![label("Archive")],
		tags: vec![label("foo"), label("foo")],
		notes: vec![NoteSeed { id: Uuid::new_v4(), note: new_note("cats", None) }],
	};
	let err = db.reload(&broken).await.expect_err("Expected a conflict.");

	assert!(matches!(err, Error::Conflict(_)), "Unexpected error: {err:?}");

	let folders = db.list_folders().await.expect("Failed to list folders.");

	assert_eq!(folders.iter().map(|folder| folder.id).collect::<Vec<_>>(), vec![kept.id]);
	assert!(db.list_notes(&NoteFilter::default()).await.expect("Failed to list notes.").is_empty());

	let valid = SeedData { tags: vec![label("foo")], ..broken };
	let report = db.reload(&valid).await.expect("Failed to reload.");

	assert_eq!(report, SeedReport { folders: 1, tags: 1, notes: 1 });
	assert!(db.find_folder(kept.id).await.expect("Lookup must not fail.").is_none());

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
