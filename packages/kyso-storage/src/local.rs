//! Directory-backed JSON blob store, one file per key.
//!
//! File names are the blake3 hash of the key, so arbitrary keys map onto safe names. Writes go
//! through a per-write temporary file and a rename, so readers never observe a half-written blob.

use std::{
	fs,
	io::ErrorKind,
	path::{Path, PathBuf},
	process,
	sync::atomic::{AtomicU64, Ordering},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Debug)]
pub struct LocalStore {
	dir: PathBuf,
}
impl LocalStore {
	pub fn open(cfg: &kyso_config::Storage) -> Result<Self> {
		Self::new(&cfg.local_store_dir)
	}

	pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
		let dir = dir.as_ref().to_path_buf();

		fs::create_dir_all(&dir).map_err(|source| io_error(&dir, source))?;

		Ok(Self { dir })
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Reads the blob stored under `key`. A missing blob is `Ok(None)`.
	pub fn get_json<T>(&self, key: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		let path = self.path_for(key)?;
		let raw = match fs::read(&path) {
			Ok(raw) => raw,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(io_error(&path, err)),
		};
		let value = serde_json::from_slice(&raw)
			.map_err(|err| Error::Decode { key: key.to_string(), message: err.to_string() })?;

		Ok(Some(value))
	}

	pub fn put_json<T>(&self, key: &str, value: &T) -> Result<()>
	where
		T: Serialize,
	{
		let path = self.path_for(key)?;
		let raw = serde_json::to_vec_pretty(value)
			.map_err(|err| Error::Encode { key: key.to_string(), message: err.to_string() })?;
		let tmp = tmp_path(&path);
		let written = fs::write(&tmp, raw)
			.map_err(|source| io_error(&tmp, source))
			.and_then(|()| fs::rename(&tmp, &path).map_err(|source| io_error(&path, source)));

		if let Err(err) = written {
			let _ = fs::remove_file(&tmp);

			return Err(err);
		}

		tracing::debug!(key, path = %path.display(), "Stored local blob.");

		Ok(())
	}

	/// Deletes the blob under `key` and reports whether one existed.
	pub fn remove(&self, key: &str) -> Result<bool> {
		let path = self.path_for(key)?;

		match fs::remove_file(&path) {
			Ok(()) => Ok(true),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
			Err(err) => Err(io_error(&path, err)),
		}
	}

	pub fn contains(&self, key: &str) -> Result<bool> {
		Ok(self.path_for(key)?.is_file())
	}

	fn path_for(&self, key: &str) -> Result<PathBuf> {
		if key.trim().is_empty() {
			return Err(Error::InvalidArgument("storage key must be non-empty.".to_string()));
		}

		Ok(self.dir.join(format!("{}.json", blake3::hash(key.as_bytes()).to_hex())))
	}
}

/// Sibling of `path` unique to this process and write, so concurrent writers never share one.
fn tmp_path(path: &Path) -> PathBuf {
	let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);

	path.with_extension(format!("json.{}.{seq}.tmp", process::id()))
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
	Error::Io { path: path.display().to_string(), source }
}
