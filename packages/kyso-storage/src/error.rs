#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Storage I/O failed at {path}: {source}")]
	Io { path: String, source: std::io::Error },
	#[error("Invalid stored value for key {key}: {message}")]
	Decode { key: String, message: String },
	#[error("Failed to encode value for key {key}: {message}")]
	Encode { key: String, message: String },
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}
