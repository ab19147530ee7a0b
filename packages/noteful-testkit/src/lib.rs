//! Test fixtures: throwaway Postgres databases and an in-memory [`noteful_storage::Store`].

mod error;
mod memory;

pub use error::{Error, Result};
pub use memory::MemoryStore;

use std::{env, future::Future, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

use noteful_storage::db::Db;

pub const DSN_ENV: &str = "NOTEFUL_PG_DSN";

/// Maintenance databases tried, in order, for `CREATE DATABASE` and `DROP DATABASE`.
const MAINTENANCE_DATABASES: [&str; 2] = ["postgres", "template1"];

/// A uniquely named database created for one test. It is dropped by [`TestDatabase::cleanup`],
/// or on drop if cleanup never ran.
pub struct TestDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("{DSN_ENV} is not a valid DSN: {err}.")))?;
		let (maintenance, mut conn) = maintenance_connection(&base).await?;
		let name = format!("noteful_test_{}", Uuid::new_v4().simple());

		sqlx::query(&format!(r#"CREATE DATABASE "{name}""#))
			.execute(&mut conn)
			.await
			.map_err(|err| Error::Message(format!("Could not create {name}: {err}.")))?;

		conn.close().await?;

		let dsn = database_dsn(&base, &name);

		Ok(Self { name, dsn, maintenance, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn postgres_config(&self, pool_max_conns: u32) -> noteful_config::Postgres {
		noteful_config::Postgres { dsn: self.dsn.clone(), pool_max_conns }
	}

	/// Connects a small pool to this database and bootstraps the schema.
	pub async fn open(&self) -> Result<Db> {
		let db = Db::connect(&self.postgres_config(2)).await?;

		db.ensure_schema().await?;

		Ok(db)
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.drop_now().await
	}

	async fn drop_now(&mut self) -> Result<()> {
		if !self.dropped {
			drop_database(&self.maintenance, &self.name).await?;

			self.dropped = true;
		}

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let maintenance = self.maintenance.clone();
		let outcome = thread::spawn(move || {
			let runtime = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| Error::Message(format!("Cleanup runtime failed: {err}.")))?;

			runtime.block_on(drop_database(&maintenance, &name))
		})
		.join();

		match outcome {
			Ok(Ok(())) => {},
			Ok(Err(err)) => eprintln!("Test database cleanup failed: {err}"),
			Err(_) => eprintln!("Test database cleanup thread panicked."),
		}
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

/// Runs `f` against a fresh database and drops the database afterwards, whatever `f` returned.
pub async fn with_test_db<F, Fut, T>(base_dsn: &str, f: F) -> Result<T>
where
	F: FnOnce(&TestDatabase) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let mut db = TestDatabase::new(base_dsn).await?;
	let result = f(&db).await;
	let cleanup = db.drop_now().await;

	match (result, cleanup) {
		(Ok(value), Ok(())) => Ok(value),
		(Ok(_), Err(err)) => Err(err),
		(Err(err), cleanup) => {
			if let Err(cleanup_err) = cleanup {
				eprintln!("Test database cleanup failed: {cleanup_err}");
			}

			Err(err)
		},
	}
}

/// The DSN of `base` retargeted at database `name`.
fn database_dsn(base: &PgConnectOptions, name: &str) -> String {
	base.clone().database(name).to_url_lossy().to_string()
}

async fn maintenance_connection(
	base: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let mut errors = Vec::new();

	for database in MAINTENANCE_DATABASES {
		let options = base.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => errors.push(format!("{database}: {err}")),
		}
	}

	Err(Error::Message(format!("No maintenance database reachable ({}).", errors.join("; "))))
}

async fn drop_database(maintenance: &PgConnectOptions, name: &str) -> Result<()> {
	let mut conn = PgConnection::connect_with(maintenance).await?;

	// `WITH (FORCE)` terminates sessions still attached to the database (Postgres 13+).
	sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#))
		.execute(&mut conn)
		.await
		.map_err(|err| Error::Message(format!("Could not drop {name}: {err}.")))?;

	conn.close().await?;

	Ok(())
}
