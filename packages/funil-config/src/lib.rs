mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Commissions, Config, LlmProviderConfig, Postgres, Providers, Service, Storage, Webhooks,
};

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
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.llm.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.llm.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.llm.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.llm.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.providers.llm.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite number.".to_string(),
		});
	}

	for (label, percent) in [
		("commissions.default_mrr_percent", cfg.commissions.default_mrr_percent),
		("commissions.default_projeto_percent", cfg.commissions.default_projeto_percent),
	] {
		if !percent.is_finite() {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number."),
			});
		}
		if !(0.0..=100.0).contains(&percent) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-100.0."),
			});
		}
	}

	if cfg.webhooks.known_origins.is_empty() {
		return Err(Error::Validation {
			message: "webhooks.known_origins must be non-empty.".to_string(),
		});
	}

	for origin in &cfg.webhooks.known_origins {
		if origin.trim().is_empty() {
			return Err(Error::Validation {
				message: "webhooks.known_origins cannot contain blank entries.".to_string(),
			});
		}
		if origin != &origin.trim().to_lowercase() {
			return Err(Error::Validation {
				message: format!("webhooks.known_origins entry {origin:?} must be lowercase."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for origin in &mut cfg.webhooks.known_origins {
		*origin = origin.trim().to_string();
	}
}
