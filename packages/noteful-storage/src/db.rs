use sqlx::{PgConnection, PgPool, postgres::PgPoolOptions};

use crate::{Result, schema};

const SCHEMA_LOCK_ID: i64 = 6_683_385;

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub(crate) const DROP_TABLES: &str = "DROP TABLE IF EXISTS notes, tags, folders";

	pub async fn connect(cfg: &noteful_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Creates the tables and their indexes when missing. Concurrent callers are serialized on
	/// a transaction-scoped advisory lock.
	pub async fn ensure_schema(&self) -> Result<()> {
		let mut tx = self.pool.begin().await?;

		Self::lock_schema(&mut tx).await?;
		sqlx::raw_sql(&schema::render_schema()).execute(&mut *tx).await?;

		tx.commit().await?;

		tracing::debug!("Schema is up to date.");

		Ok(())
	}

	pub async fn close(&self) {
		self.pool.close().await;
	}

	/// Holds the schema lock until `conn`'s transaction ends.
	pub(crate) async fn lock_schema(conn: &mut PgConnection) -> Result<()> {
		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(SCHEMA_LOCK_ID).execute(conn).await?;

		Ok(())
	}
}
