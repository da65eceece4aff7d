//! Per-page-load context: who is asking, and within which organization and team.
//!
//! `CommonData` is assembled once and exposes read-only accessors afterwards.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
	pub id: String,
	pub username: String,
	pub display_name: String,
	#[serde(default)]
	pub email: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Organization {
	pub id: String,
	pub sluglified_name: String,
	pub display_name: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Team {
	pub id: String,
	pub sluglified_name: String,
	pub display_name: String,
	#[serde(default)]
	pub visibility: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Permission {
	ReadReports,
	CreateReport,
	EditReport,
	DeleteReport,
	CreateInlineComment,
	EditInlineComment,
	DeleteInlineComment,
}
impl Permission {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ReadReports => "KYSO_IO_READ_REPORTS",
			Self::CreateReport => "KYSO_IO_CREATE_REPORT",
			Self::EditReport => "KYSO_IO_EDIT_REPORT",
			Self::DeleteReport => "KYSO_IO_DELETE_REPORT",
			Self::CreateInlineComment => "KYSO_IO_CREATE_INLINE_COMMENT",
			Self::EditInlineComment => "KYSO_IO_EDIT_INLINE_COMMENT",
			Self::DeleteInlineComment => "KYSO_IO_DELETE_INLINE_COMMENT",
		}
	}
}

/// Permission names as granted by the platform. Unknown names are kept so newer grants survive.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Permissions(BTreeSet<String>);
impl Permissions {
	pub fn has(&self, permission: Permission) -> bool {
		self.0.contains(permission.as_str())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<S> FromIterator<S> for Permissions
where
	S: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommonData {
	user: Option<User>,
	permissions: Permissions,
	organization: Option<Organization>,
	team: Option<Team>,
}
impl CommonData {
	pub fn new(
		user: Option<User>,
		permissions: Permissions,
		organization: Option<Organization>,
		team: Option<Team>,
	) -> Self {
		Self { user, permissions, organization, team }
	}

	pub fn user(&self) -> Option<&User> {
		self.user.as_ref()
	}

	pub fn permissions(&self) -> &Permissions {
		&self.permissions
	}

	pub fn organization(&self) -> Option<&Organization> {
		self.organization.as_ref()
	}

	pub fn team(&self) -> Option<&Team> {
		self.team.as_ref()
	}

	pub fn is_authenticated(&self) -> bool {
		self.user.is_some()
	}

	pub fn can(&self, permission: Permission) -> bool {
		self.permissions.has(permission)
	}
}
