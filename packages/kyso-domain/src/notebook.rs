//! Jupyter notebook model (nbformat 4).
//!
//! Cells and outputs are closed enums. Parsing is lenient at the output level: an output that
//! does not decode into one of the four known shapes is dropped with a warning instead of failing
//! the whole notebook.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::{Error, Result};

const DEFAULT_LANGUAGE: &str = "python";

#[derive(Clone, Debug, PartialEq)]
pub struct Notebook {
	pub cells: Vec<Cell>,
	/// Kernel language from `metadata.kernelspec.language`, used as the code highlight class.
	pub language: String,
}
impl Notebook {
	pub fn from_json(raw: &str) -> Result<Self> {
		let value: Value = serde_json::from_str(raw)?;

		Self::from_value(value)
	}

	pub fn from_value(value: Value) -> Result<Self> {
		let raw: RawNotebook = serde_json::from_value(value)
			.map_err(|err| Error::InvalidNotebook { message: err.to_string() })?;
		let language = raw
			.metadata
			.pointer("/kernelspec/language")
			.or_else(|| raw.metadata.pointer("/language_info/name"))
			.and_then(Value::as_str)
			.filter(|language| !language.trim().is_empty())
			.unwrap_or(DEFAULT_LANGUAGE)
			.to_string();
		let mut cells = Vec::with_capacity(raw.cells.len());

		for (index, cell) in raw.cells.into_iter().enumerate() {
			let Some(kind) = CellKind::from_tag(&cell.cell_type) else {
				tracing::warn!(index, cell_type = %cell.cell_type, "Skipping cell with unknown type.");

				continue;
			};
			let id = cell
				.id
				.filter(|id| !id.trim().is_empty())
				.unwrap_or_else(|| format!("cell-{index}"));
			let outputs = cell.outputs.into_iter().filter_map(|output| decode_output(&id, output)).collect();

			cells.push(Cell {
				source_hidden: metadata_flag(&cell.metadata, "/jupyter/source_hidden"),
				outputs_hidden: metadata_flag(&cell.metadata, "/jupyter/outputs_hidden"),
				id,
				kind,
				source: cell.source.into_string(),
				execution_count: cell.execution_count,
				outputs,
			});
		}

		Ok(Self { cells, language })
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
	Code,
	Markdown,
	Raw,
}
impl CellKind {
	pub fn from_tag(tag: &str) -> Option<Self> {
		match tag {
			"code" => Some(Self::Code),
			"markdown" => Some(Self::Markdown),
			"raw" => Some(Self::Raw),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Code => "code",
			Self::Markdown => "markdown",
			Self::Raw => "raw",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
	pub id: String,
	pub kind: CellKind,
	pub source: String,
	pub execution_count: Option<u32>,
	pub outputs: Vec<Output>,
	pub source_hidden: bool,
	pub outputs_hidden: bool,
}
impl Cell {
	/// True when there is nothing to render for this cell.
	pub fn is_blank(&self) -> bool {
		self.source.trim().is_empty() && self.outputs.is_empty()
	}
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StreamName {
	Stdout,
	Stderr,
}
impl StreamName {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Stdout => "stdout",
			Self::Stderr => "stderr",
		}
	}
}

/// One execution output. Each variant carries exactly one payload shape.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
	Stream {
		name: StreamName,
		#[serde(deserialize_with = "multiline")]
		text: String,
	},
	Error {
		ename: String,
		evalue: String,
		#[serde(default)]
		traceback: Vec<String>,
	},
	ExecuteResult {
		#[serde(default)]
		execution_count: Option<u32>,
		data: MimeBundle,
	},
	DisplayData {
		data: MimeBundle,
	},
}
impl Output {
	pub fn data(&self) -> Option<&MimeBundle> {
		match self {
			Self::ExecuteResult { data, .. } | Self::DisplayData { data } => Some(data),
			Self::Stream { .. } | Self::Error { .. } => None,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct MimeEntry {
	pub mime: String,
	pub payload: Value,
}
impl MimeEntry {
	/// Text payloads arrive either as one string or as a list of lines.
	pub fn text(&self) -> Option<String> {
		match &self.payload {
			Value::String(text) => Some(text.clone()),
			Value::Array(lines) => {
				let mut out = String::new();

				for line in lines {
					out.push_str(line.as_str()?);
				}

				Some(out)
			},
			_ => None,
		}
	}
}

/// MIME-keyed payloads in declaration order.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(from = "Map<String, Value>")]
pub struct MimeBundle(Vec<MimeEntry>);
impl MimeBundle {
	pub fn entries(&self) -> &[MimeEntry] {
		&self.0
	}

	pub fn get(&self, mime: &str) -> Option<&MimeEntry> {
		self.0.iter().find(|entry| entry.mime == mime)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl From<Map<String, Value>> for MimeBundle {
	fn from(map: Map<String, Value>) -> Self {
		Self(map.into_iter().map(|(mime, payload)| MimeEntry { mime, payload }).collect())
	}
}
impl FromIterator<(String, Value)> for MimeBundle {
	fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(mime, payload)| MimeEntry { mime, payload }).collect())
	}
}

#[derive(Debug, Deserialize)]
struct RawNotebook {
	cells: Vec<RawCell>,
	#[serde(default)]
	metadata: Value,
}

#[derive(Debug, Deserialize)]
struct RawCell {
	cell_type: String,
	#[serde(default)]
	id: Option<String>,
	#[serde(default)]
	source: MultilineString,
	#[serde(default)]
	execution_count: Option<u32>,
	#[serde(default)]
	outputs: Vec<Value>,
	#[serde(default)]
	metadata: Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MultilineString {
	One(String),
	Many(Vec<String>),
}
impl MultilineString {
	fn into_string(self) -> String {
		match self {
			Self::One(text) => text,
			Self::Many(lines) => lines.concat(),
		}
	}
}
impl Default for MultilineString {
	fn default() -> Self {
		Self::One(String::new())
	}
}

fn multiline<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	MultilineString::deserialize(deserializer).map(MultilineString::into_string)
}

fn decode_output(cell_id: &str, value: Value) -> Option<Output> {
	match serde_json::from_value::<Output>(value) {
		Ok(output) => Some(output),
		Err(err) => {
			tracing::warn!(cell_id, error = %err, "Dropping malformed notebook output.");

			None
		},
	}
}

fn metadata_flag(metadata: &Value, pointer: &str) -> bool {
	metadata.pointer(pointer).and_then(Value::as_bool).unwrap_or(false)
}
