//! In-progress "create report" drafts kept between sessions.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{LocalStore, Result};

const KEY_PREFIX: &str = "draft:";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ReportDraft {
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub organization: Option<String>,
	#[serde(default)]
	pub team: Option<String>,
	/// Main file of the report, relative to the report root.
	#[serde(default)]
	pub main_file: Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug)]
pub struct DraftStore {
	store: LocalStore,
}
impl DraftStore {
	pub fn new(store: LocalStore) -> Self {
		Self { store }
	}

	pub fn save(&self, key: &str, draft: &ReportDraft) -> Result<()> {
		self.store.put_json(&storage_key(key), draft)
	}

	/// Loads a draft. A draft that no longer decodes is discarded and reported as absent.
	pub fn load(&self, key: &str) -> Result<Option<ReportDraft>> {
		let storage_key = storage_key(key);

		match self.store.get_json(&storage_key) {
			Ok(draft) => Ok(draft),
			Err(crate::Error::Decode { message, .. }) => {
				tracing::warn!(key, error = %message, "Discarding unreadable report draft.");

				self.store.remove(&storage_key)?;

				Ok(None)
			},
			Err(err) => Err(err),
		}
	}

	pub fn clear(&self, key: &str) -> Result<bool> {
		self.store.remove(&storage_key(key))
	}
}

fn storage_key(key: &str) -> String {
	format!("{KEY_PREFIX}{key}")
}
