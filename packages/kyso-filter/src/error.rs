pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unexpected token: expected {expected}, found {found}.")]
	UnexpectedToken { expected: String, found: String },
	#[error("Field {field} is already part of the filter.")]
	DuplicateField { field: &'static str },
	#[error("Field end_date requires a start_date clause first.")]
	MissingStartDate,
	#[error("Filter is incomplete: {field} has no {missing}.")]
	Incomplete { field: &'static str, missing: &'static str },
	#[error("Token index {index} is out of range for {len} tokens.")]
	IndexOutOfRange { index: usize, len: usize },
	#[error("Invalid filter input: {message}")]
	Parse { message: String },
	#[error("{message}")]
	Validation { message: String },
}
