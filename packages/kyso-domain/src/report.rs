use std::{path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
	Jupyter,
	Markdown,
	Html,
}
impl ReportKind {
	pub fn from_extension(extension: &str) -> Option<Self> {
		match extension.to_ascii_lowercase().as_str() {
			"ipynb" => Some(Self::Jupyter),
			"md" | "markdown" => Some(Self::Markdown),
			"html" | "htm" => Some(Self::Html),
			_ => None,
		}
	}

	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Jupyter => "jupyter",
			Self::Markdown => "markdown",
			Self::Html => "html",
		}
	}
}
impl FromStr for ReportKind {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"jupyter" | "notebook" | "ipynb" => Ok(Self::Jupyter),
			"markdown" | "md" => Ok(Self::Markdown),
			"html" => Ok(Self::Html),
			_ => Err(Error::UnknownReportKind(raw.to_string())),
		}
	}
}

/// Identifies one version of a report inside the content store.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ReportContext {
	pub organization: String,
	pub team: String,
	pub report: String,
	pub version: u32,
}
impl ReportContext {
	/// `/{prefix}/{org}/{team}/reports/{report}/{version}/{path}`.
	pub fn content_url(&self, prefix: &str, relative: &str) -> String {
		let relative = relative.trim_start_matches("./").trim_start_matches('/');

		format!(
			"/{prefix}/{}/{}/reports/{}/{}/{relative}",
			self.organization, self.team, self.report, self.version
		)
	}
}
