pub mod fixtures;

mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	future::IntoFuture,
	path::{Path, PathBuf},
};

use axum::Router;
use tokio::{
	net::TcpListener,
	sync::{oneshot, oneshot::Sender},
};
use uuid::Uuid;

/// Unique scratch directory under the system temp dir, removed on drop.
pub struct TestDir {
	path: PathBuf,
	cleaned: bool,
}
impl TestDir {
	pub fn new(prefix: &str) -> Result<Self> {
		let path = env::temp_dir().join(format!("{prefix}_{}", Uuid::new_v4().simple()));

		fs::create_dir_all(&path).map_err(|err| {
			Error::Message(format!("Failed to create test directory {path:?}: {err}."))
		})?;

		Ok(Self { path, cleaned: false })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn join(&self, name: &str) -> PathBuf {
		self.path.join(name)
	}

	pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
		let path = self.join(name);

		fs::write(&path, contents)?;

		Ok(path)
	}

	pub fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner()
	}

	fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		match fs::remove_dir_all(&self.path) {
			Ok(()) => {},
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
			Err(err) => return Err(err.into()),
		}

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestDir {
	fn drop(&mut self) {
		if let Err(err) = self.cleanup_inner() {
			eprintln!("Test directory cleanup failed: {err}.");
		}
	}
}

/// A local HTTP server answering with the given router until the handle is dropped or shut down.
pub struct StubServer {
	base_url: String,
	shutdown: Option<Sender<()>>,
}
impl StubServer {
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn shutdown(mut self) {
		self.stop();
	}

	fn stop(&mut self) {
		if let Some(tx) = self.shutdown.take() {
			let _ = tx.send(());
		}
	}
}
impl Drop for StubServer {
	fn drop(&mut self) {
		self.stop();
	}
}

pub async fn start_stub_server(app: Router) -> Result<StubServer> {
	let listener = TcpListener::bind("127.0.0.1:0")
		.await
		.map_err(|err| Error::Message(format!("Failed to bind stub server: {err}.")))?;
	let addr = listener.local_addr()?;
	let (tx, rx) = oneshot::channel();
	let server = axum::serve(listener, app).with_graceful_shutdown(async move {
		let _ = rx.await;
	});

	tokio::spawn(async move {
		let _ = server.into_future().await;
	});

	Ok(StubServer { base_url: format!("http://{addr}"), shutdown: Some(tx) })
}
