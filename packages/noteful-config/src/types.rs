use serde::Deserialize;

pub const ENVIRONMENTS: [&str; 3] = ["development", "production", "test"];

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// One of "development", "production", or "test". Error details are only exposed in
	/// development.
	#[serde(default = "default_environment")]
	pub environment: String,
}
impl Service {
	pub fn is_development(&self) -> bool {
		self.environment == "development"
	}
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	#[serde(default = "default_pool_max_conns")]
	pub pool_max_conns: u32,
}

fn default_environment() -> String {
	"production".to_string()
}

fn default_pool_max_conns() -> u32 {
	10
}
