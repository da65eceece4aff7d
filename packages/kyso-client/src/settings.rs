//! Public platform settings behind a read-through cache.
//!
//! Cached entries carry a schema version and a fetch time. A version mismatch or an expired entry
//! triggers a refetch; when the refetch fails the stale entry is served, and with no entry at all the
//! built-in defaults are. Reading settings therefore never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Duration, OffsetDateTime};

use kyso_storage::LocalStore;

use crate::{ApiClient, BoxFuture, Result};

pub const SETTINGS_SCHEMA_VERSION: u32 = 1;
pub const SETTINGS_CACHE_KEY: &str = "kyso-settings";

const KEY_CAPTCHA_ENABLED: &str = "HCAPTCHA_ENABLED";
const KEY_CAPTCHA_SITE_KEY: &str = "HCAPTCHA_SITE_KEY";
const KEY_ONBOARDING_MESSAGES: &str = "ONBOARDING_MESSAGES";
const KEY_PUBLIC_CHANNELS: &str = "ALLOW_PUBLIC_CHANNELS";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct SettingEntry {
	pub key: String,
	#[serde(default)]
	pub value: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct OnboardingMessages {
	pub welcome_message: String,
	pub demo_url: String,
	pub first_cta: String,
	pub first_cta_url: String,
}
impl Default for OnboardingMessages {
	fn default() -> Self {
		Self {
			welcome_message: "Kyso is a workspace to publish, share and discuss your data science results."
				.to_string(),
			demo_url: "https://www.youtube.com/embed/4dJ8MYYV5WQ".to_string(),
			first_cta: "Explore the reports published by your team.".to_string(),
			first_cta_url: "/".to_string(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicSettings {
	pub captcha_enabled: bool,
	pub captcha_site_key: Option<String>,
	pub onboarding_messages: OnboardingMessages,
	pub public_channels_visible: bool,
}
impl Default for PublicSettings {
	fn default() -> Self {
		Self {
			captcha_enabled: false,
			captcha_site_key: None,
			onboarding_messages: OnboardingMessages::default(),
			public_channels_visible: true,
		}
	}
}
impl PublicSettings {
	/// Maps the key/value list onto typed settings. Unknown keys are ignored and malformed values
	/// keep their defaults.
	pub fn from_entries(entries: &[SettingEntry]) -> Self {
		let mut settings = Self::default();

		for entry in entries {
			match entry.key.as_str() {
				KEY_CAPTCHA_ENABLED =>
					if let Some(flag) = parse_flag(&entry.key, &entry.value) {
						settings.captcha_enabled = flag;
					},
				KEY_CAPTCHA_SITE_KEY => {
					settings.captcha_site_key =
						Some(entry.value.trim().to_string()).filter(|key| !key.is_empty());
				},
				KEY_ONBOARDING_MESSAGES => match serde_json::from_str::<OnboardingMessages>(&entry.value) {
					Ok(messages) => settings.onboarding_messages = messages,
					Err(err) => {
						tracing::warn!(key = %entry.key, error = %err, "Malformed onboarding messages setting.");
					},
				},
				KEY_PUBLIC_CHANNELS =>
					if let Some(flag) = parse_flag(&entry.key, &entry.value) {
						settings.public_channels_visible = flag;
					},
				_ => {},
			}
		}

		settings
	}
}

/// Where a settings read was served from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsOrigin {
	Fetched,
	Cached,
	Stale,
	Defaults,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsLookup {
	pub settings: PublicSettings,
	pub origin: SettingsOrigin,
}

pub trait SettingsSource
where
	Self: Send + Sync,
{
	fn fetch_public_settings<'a>(&'a self) -> BoxFuture<'a, Result<Vec<SettingEntry>>>;
}

impl SettingsSource for ApiClient {
	fn fetch_public_settings<'a>(&'a self) -> BoxFuture<'a, Result<Vec<SettingEntry>>> {
		Box::pin(async move { self.get_data(self.url(&["settings", "public"])).await })
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct CachedSettings {
	schema_version: u32,
	#[serde(with = "time::serde::rfc3339")]
	fetched_at: OffsetDateTime,
	entries: Vec<SettingEntry>,
}

pub struct SettingsCache<S> {
	source: S,
	store: LocalStore,
	ttl: Duration,
}
impl<S> SettingsCache<S>
where
	S: SettingsSource,
{
	pub fn new(source: S, store: LocalStore, cfg: &kyso_config::SettingsCache) -> Self {
		let ttl = Duration::seconds(i64::try_from(cfg.ttl_seconds).unwrap_or(i64::MAX));

		Self { source, store, ttl }
	}

	pub async fn get(&self, now: OffsetDateTime) -> SettingsLookup {
		let cached = self.read_cached();

		if let Some(entry) = cached.as_ref().filter(|entry| self.is_fresh(entry, now)) {
			return SettingsLookup {
				settings: PublicSettings::from_entries(&entry.entries),
				origin: SettingsOrigin::Cached,
			};
		}

		self.fetch_or_fallback(cached, now).await
	}

	/// Ignores any cached entry and refetches.
	pub async fn refresh(&self, now: OffsetDateTime) -> SettingsLookup {
		let cached = self.read_cached();

		self.fetch_or_fallback(cached, now).await
	}

	async fn fetch_or_fallback(
		&self,
		cached: Option<CachedSettings>,
		now: OffsetDateTime,
	) -> SettingsLookup {
		match self.source.fetch_public_settings().await {
			Ok(entries) => {
				let settings = PublicSettings::from_entries(&entries);
				let entry =
					CachedSettings { schema_version: SETTINGS_SCHEMA_VERSION, fetched_at: now, entries };

				if let Err(err) = self.store.put_json(SETTINGS_CACHE_KEY, &entry) {
					tracing::warn!(error = %err, "Failed to cache public settings.");
				}

				SettingsLookup { settings, origin: SettingsOrigin::Fetched }
			},
			Err(err) => match cached.filter(|entry| entry.schema_version == SETTINGS_SCHEMA_VERSION) {
				Some(stale) => {
					tracing::warn!(error = %err, "Serving stale public settings.");

					SettingsLookup {
						settings: PublicSettings::from_entries(&stale.entries),
						origin: SettingsOrigin::Stale,
					}
				},
				None => {
					tracing::warn!(error = %err, "Falling back to default public settings.");

					SettingsLookup { settings: PublicSettings::default(), origin: SettingsOrigin::Defaults }
				},
			},
		}
	}

	fn read_cached(&self) -> Option<CachedSettings> {
		match self.store.get_json::<CachedSettings>(SETTINGS_CACHE_KEY) {
			Ok(entry) => entry,
			Err(err) => {
				tracing::warn!(error = %err, "Ignoring unreadable settings cache.");

				None
			},
		}
	}

	fn is_fresh(&self, entry: &CachedSettings, now: OffsetDateTime) -> bool {
		if entry.schema_version != SETTINGS_SCHEMA_VERSION {
			return false;
		}

		let age = now - entry.fetched_at;

		!age.is_negative() && age < self.ttl
	}
}

fn parse_flag(key: &str, raw: &str) -> Option<bool> {
	match serde_json::from_str::<Value>(raw.trim()) {
		Ok(Value::Bool(flag)) => Some(flag),
		Ok(Value::String(text)) => parse_flag(key, &text),
		_ => {
			tracing::warn!(key, value = raw, "Malformed boolean setting.");

			None
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(key: &str, value: &str) -> SettingEntry {
		SettingEntry { key: key.to_string(), value: value.to_string() }
	}

	#[test]
	fn maps_known_keys() {
		let settings = PublicSettings::from_entries(&[
			entry(KEY_CAPTCHA_ENABLED, "true"),
			entry(KEY_CAPTCHA_SITE_KEY, "site-123"),
			entry(KEY_PUBLIC_CHANNELS, "false"),
			entry(
				KEY_ONBOARDING_MESSAGES,
				r#"{"welcome_message":"Hi","demo_url":"https://x","first_cta":"Go","first_cta_url":"/go"}"#,
			),
		]);

		assert!(settings.captcha_enabled);
		assert_eq!(settings.captcha_site_key.as_deref(), Some("site-123"));
		assert!(!settings.public_channels_visible);
		assert_eq!(settings.onboarding_messages.welcome_message, "Hi");
	}

	#[test]
	fn malformed_values_keep_defaults() {
		let settings = PublicSettings::from_entries(&[
			entry(KEY_CAPTCHA_ENABLED, "maybe"),
			entry(KEY_ONBOARDING_MESSAGES, "{broken"),
			entry(KEY_PUBLIC_CHANNELS, "\"false\""),
		]);

		assert_eq!(settings.captcha_enabled, PublicSettings::default().captcha_enabled);
		assert_eq!(settings.onboarding_messages, OnboardingMessages::default());
		assert!(!settings.public_channels_visible);
	}
}
