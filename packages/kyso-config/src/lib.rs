mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Api, Config, Mutations, Render, Service, SettingsCache, Storage};

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
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if !(cfg.api.base_url.starts_with("http://") || cfg.api.base_url.starts_with("https://")) {
		return Err(Error::Validation {
			message: "api.base_url must start with http:// or https://.".to_string(),
		});
	}
	if cfg.api.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "api.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.content_prefix.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.content_prefix must be non-empty.".to_string(),
		});
	}
	if cfg.storage.content_prefix.contains('/') {
		return Err(Error::Validation {
			message: "storage.content_prefix must not contain '/'.".to_string(),
		});
	}
	if cfg.storage.local_store_dir.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "storage.local_store_dir must be non-empty.".to_string(),
		});
	}
	if cfg.render.frame_resize_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "render.frame_resize_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.render.frame_max_height_px == 0 {
		return Err(Error::Validation {
			message: "render.frame_max_height_px must be greater than zero.".to_string(),
		});
	}
	if cfg.settings_cache.ttl_seconds == 0 {
		return Err(Error::Validation {
			message: "settings_cache.ttl_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.mutations.max_attempts == 0 {
		return Err(Error::Validation {
			message: "mutations.max_attempts must be at least one.".to_string(),
		});
	}
	if cfg.mutations.base_backoff_ms > cfg.mutations.max_backoff_ms {
		return Err(Error::Validation {
			message: "mutations.base_backoff_ms must be less than or equal to mutations.max_backoff_ms."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.api.token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false) {
		cfg.api.token = None;
	}

	cfg.storage.content_prefix = cfg.storage.content_prefix.trim().to_string();

	while cfg.api.base_url.ends_with('/') {
		cfg.api.base_url.pop();
	}
}
