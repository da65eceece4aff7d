use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub api: Api,
	pub storage: Storage,
	#[serde(default)]
	pub render: Render,
	pub settings_cache: SettingsCache,
	#[serde(default)]
	pub mutations: Mutations,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Api {
	/// Base URL of the platform API, e.g. "https://kyso.io/api/v1".
	pub base_url: String,
	pub timeout_ms: u64,
	/// Optional. Bearer token sent with every request when present.
	pub token: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	/// First path segment of content-addressed report files, e.g. "scs".
	#[serde(default = "default_content_prefix")]
	pub content_prefix: String,
	/// Directory backing the local JSON blob store.
	pub local_store_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Render {
	#[serde(default = "default_true")]
	pub show_inputs: bool,
	#[serde(default = "default_true")]
	pub show_outputs: bool,
	#[serde(default = "default_true")]
	pub allow_raw_html: bool,
	/// Upper bound for how long an embedded frame keeps observing its content height.
	#[serde(default = "default_frame_resize_timeout_ms")]
	pub frame_resize_timeout_ms: u64,
	#[serde(default = "default_frame_max_height_px")]
	pub frame_max_height_px: u32,
}
impl Default for Render {
	fn default() -> Self {
		Self {
			show_inputs: true,
			show_outputs: true,
			allow_raw_html: true,
			frame_resize_timeout_ms: default_frame_resize_timeout_ms(),
			frame_max_height_px: default_frame_max_height_px(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct SettingsCache {
	pub ttl_seconds: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Mutations {
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	#[serde(default = "default_base_backoff_ms")]
	pub base_backoff_ms: u64,
	#[serde(default = "default_max_backoff_ms")]
	pub max_backoff_ms: u64,
}
impl Default for Mutations {
	fn default() -> Self {
		Self {
			max_attempts: default_max_attempts(),
			base_backoff_ms: default_base_backoff_ms(),
			max_backoff_ms: default_max_backoff_ms(),
		}
	}
}

fn default_true() -> bool {
	true
}

fn default_content_prefix() -> String {
	"scs".to_string()
}

fn default_frame_resize_timeout_ms() -> u64 {
	10_000
}

fn default_frame_max_height_px() -> u32 {
	4_000
}

fn default_max_attempts() -> u32 {
	3
}

fn default_base_backoff_ms() -> u64 {
	500
}

fn default_max_backoff_ms() -> u64 {
	5_000
}
