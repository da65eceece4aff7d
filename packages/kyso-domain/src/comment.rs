use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentStatus {
	Open,
	ToDo,
	Doing,
	Closed,
}
impl CommentStatus {
	pub const ALL: [Self; 4] = [Self::Open, Self::ToDo, Self::Doing, Self::Closed];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Open => "OPEN",
			Self::ToDo => "TO_DO",
			Self::Doing => "DOING",
			Self::Closed => "CLOSED",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Open => "Open",
			Self::ToDo => "To do",
			Self::Doing => "Doing",
			Self::Closed => "Closed",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|status| status.as_str().eq_ignore_ascii_case(raw.trim()))
	}
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CommentAuthor {
	pub id: String,
	pub display_name: String,
	#[serde(default)]
	pub avatar_url: Option<String>,
}

/// Where a comment is attached inside a report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommentAnchor<'a> {
	Cell(&'a str),
	File(&'a str),
	Report,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct InlineComment {
	pub id: String,
	pub report_id: String,
	#[serde(default)]
	pub cell_id: Option<String>,
	#[serde(default)]
	pub file_id: Option<String>,
	pub author: CommentAuthor,
	pub text: String,
	#[serde(alias = "current_status")]
	pub status: CommentStatus,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(default)]
	pub replies: Vec<InlineComment>,
}
impl InlineComment {
	/// Cell anchors win over file anchors; a comment with neither belongs to the report.
	pub fn anchor(&self) -> CommentAnchor<'_> {
		if let Some(cell_id) = self.cell_id.as_deref().filter(|id| !id.is_empty()) {
			return CommentAnchor::Cell(cell_id);
		}
		if let Some(file_id) = self.file_id.as_deref().filter(|id| !id.is_empty()) {
			return CommentAnchor::File(file_id);
		}

		CommentAnchor::Report
	}

	pub fn is_open(&self) -> bool {
		self.status != CommentStatus::Closed
	}

	pub fn is_anchored_to_cell(&self, cell_id: &str) -> bool {
		matches!(self.anchor(), CommentAnchor::Cell(id) if id == cell_id)
	}
}
