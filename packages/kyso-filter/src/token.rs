use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use kyso_domain::CommentStatus;

use crate::{Error, Result};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterField {
	ReportAuthor,
	CommentAuthor,
	Status,
	Channel,
	Text,
	StartDate,
	EndDate,
}
impl FilterField {
	pub const ALL: [Self; 7] = [
		Self::ReportAuthor,
		Self::CommentAuthor,
		Self::Status,
		Self::Channel,
		Self::Text,
		Self::StartDate,
		Self::EndDate,
	];

	/// Query parameter name on the inline-comment search endpoint.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ReportAuthor => "report_author_id",
			Self::CommentAuthor => "user_id",
			Self::Status => "status",
			Self::Channel => "team_id",
			Self::Text => "text",
			Self::StartDate => "start_date",
			Self::EndDate => "end_date",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::ReportAuthor => "Report author",
			Self::CommentAuthor => "Comment author",
			Self::Status => "Status",
			Self::Channel => "Channel",
			Self::Text => "Text",
			Self::StartDate => "Start date",
			Self::EndDate => "End date",
		}
	}

	pub fn parse(raw: &str) -> Result<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|field| field.as_str().eq_ignore_ascii_case(raw)).ok_or_else(|| {
			Error::Parse {
				message: format!(
					"unknown field '{raw}', expected one of: report_author_id, user_id, status, team_id, text, start_date, end_date."
				),
			}
		})
	}

	pub fn operators(self) -> &'static [FilterOperator] {
		match self {
			Self::ReportAuthor | Self::CommentAuthor | Self::Status | Self::Channel =>
				&[FilterOperator::Eq, FilterOperator::Neq],
			Self::Text => &[FilterOperator::Contains],
			Self::StartDate | Self::EndDate => &[FilterOperator::Gte, FilterOperator::Lte],
		}
	}

	pub fn value_kind(self) -> ValueKind {
		match self {
			Self::ReportAuthor | Self::CommentAuthor => ValueKind::User,
			Self::Status => ValueKind::Status,
			Self::Channel => ValueKind::Channel,
			Self::Text => ValueKind::Text,
			Self::StartDate | Self::EndDate => ValueKind::Date,
		}
	}
}
impl Display for FilterField {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterOperator {
	Eq,
	Neq,
	Contains,
	Gte,
	Lte,
}
impl FilterOperator {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Eq => "eq",
			Self::Neq => "neq",
			Self::Contains => "contains",
			Self::Gte => "gte",
			Self::Lte => "lte",
		}
	}

	pub fn parse(raw: &str) -> Result<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"eq" => Ok(Self::Eq),
			"neq" => Ok(Self::Neq),
			"contains" => Ok(Self::Contains),
			"gte" => Ok(Self::Gte),
			"lte" => Ok(Self::Lte),
			other => Err(Error::Parse {
				message: format!("unknown operator '{other}', expected one of: eq, neq, contains, gte, lte."),
			}),
		}
	}
}
impl Display for FilterOperator {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
	User,
	Status,
	Channel,
	Text,
	Date,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct UserRef {
	pub id: String,
	pub display_name: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct ChannelRef {
	pub id: String,
	pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
	User(UserRef),
	Status(CommentStatus),
	Channel(ChannelRef),
	Text(String),
	Date(Date),
}
impl FilterValue {
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::User(_) => ValueKind::User,
			Self::Status(_) => ValueKind::Status,
			Self::Channel(_) => ValueKind::Channel,
			Self::Text(_) => ValueKind::Text,
			Self::Date(_) => ValueKind::Date,
		}
	}

	/// The value as sent to the search endpoint.
	pub fn query_value(&self) -> String {
		match self {
			Self::User(user) => user.id.clone(),
			Self::Status(status) => status.as_str().to_string(),
			Self::Channel(channel) => channel.id.clone(),
			Self::Text(text) => text.clone(),
			Self::Date(date) => date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string()),
		}
	}

	pub fn label(&self) -> String {
		match self {
			Self::User(user) => user.display_name.clone(),
			Self::Status(status) => status.label().to_string(),
			Self::Channel(channel) => channel.name.clone(),
			Self::Text(text) => format!("\"{text}\""),
			Self::Date(_) => self.query_value(),
		}
	}

	/// Parses free-form input for `field`. Users and channels accept `id` or `id:name`.
	pub fn parse_for(field: FilterField, raw: &str) -> Result<Self> {
		let raw = raw.trim();

		if raw.is_empty() {
			return Err(Error::Parse { message: format!("{field} requires a non-empty value.") });
		}

		match field.value_kind() {
			ValueKind::User => {
				let (id, name) = split_labelled(raw);

				Ok(Self::User(UserRef { id, display_name: name }))
			},
			ValueKind::Channel => {
				let (id, name) = split_labelled(raw);

				Ok(Self::Channel(ChannelRef { id, name }))
			},
			ValueKind::Status => CommentStatus::parse(raw).map(Self::Status).ok_or_else(|| Error::Parse {
				message: format!("unknown status '{raw}', expected one of: OPEN, TO_DO, DOING, CLOSED."),
			}),
			ValueKind::Text => Ok(Self::Text(raw.to_string())),
			ValueKind::Date => Date::parse(raw, DATE_FORMAT)
				.map(Self::Date)
				.map_err(|err| Error::Parse { message: format!("{field} must be YYYY-MM-DD: {err}.") }),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterToken {
	Field(FilterField),
	Operator(FilterOperator),
	Value(FilterValue),
}
impl FilterToken {
	pub fn describe(&self) -> String {
		match self {
			Self::Field(field) => format!("field {field}"),
			Self::Operator(operator) => format!("operator {operator}"),
			Self::Value(value) => format!("value {}", value.query_value()),
		}
	}
}

fn split_labelled(raw: &str) -> (String, String) {
	match raw.split_once(':') {
		Some((id, name)) if !name.trim().is_empty() => (id.trim().to_string(), name.trim().to_string()),
		Some((id, _)) => (id.trim().to_string(), id.trim().to_string()),
		None => (raw.to_string(), raw.to_string()),
	}
}
