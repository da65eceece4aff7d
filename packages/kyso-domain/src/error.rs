pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid notebook: {message}")]
	InvalidNotebook { message: String },
	#[error("Unknown report kind: {0}")]
	UnknownReportKind(String),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
}
