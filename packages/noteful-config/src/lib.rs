mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, ENVIRONMENTS, Postgres, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty"));
	}
	if !ENVIRONMENTS.contains(&cfg.service.environment.as_str()) {
		return Err(Error::invalid(
			"service.environment",
			format!("must be one of {}", ENVIRONMENTS.join(", ")),
		));
	}
	if cfg.storage.postgres.dsn.is_empty() {
		return Err(Error::invalid("storage.postgres.dsn", "must be non-empty"));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::invalid("storage.postgres.pool_max_conns", "must be greater than zero"));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.http_bind = cfg.service.http_bind.trim().to_string();
	cfg.service.environment = cfg.service.environment.trim().to_ascii_lowercase();
	cfg.storage.postgres.dsn = cfg.storage.postgres.dsn.trim().to_string();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
