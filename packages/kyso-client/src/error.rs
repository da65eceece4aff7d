pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("API request failed with status {status}: {message}")]
	Api { status: u16, message: String },
	#[error("{message}")]
	InvalidConfig { message: String },
}
impl Error {
	/// Transport failures and server-side errors may succeed on a later attempt.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::Reqwest(err) => err.is_connect() || err.is_timeout() || err.is_request(),
			Self::Api { status, .. } => *status >= 500,
			_ => false,
		}
	}
}
