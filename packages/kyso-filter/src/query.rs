use crate::{Error, FilterField, FilterOperator, FilterValue, Result};

const SORT_FIELD: &str = "created_at";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
	Ascending,
	#[default]
	Descending,
}
impl SortOrder {
	/// `created_at` or `-created_at`.
	pub fn as_param(self) -> String {
		match self {
			Self::Ascending => SORT_FIELD.to_string(),
			Self::Descending => format!("-{SORT_FIELD}"),
		}
	}

	pub fn parse(raw: &str) -> Result<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"asc" | "ascending" | "created_at" => Ok(Self::Ascending),
			"desc" | "descending" | "-created_at" => Ok(Self::Descending),
			other => Err(Error::Parse { message: format!("unknown sort order '{other}', expected asc or desc.") }),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Condition {
	pub field: FilterField,
	pub operator: FilterOperator,
	pub value: FilterValue,
}

/// A settled filter reduced to the search request shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskQuery {
	pub conditions: Vec<Condition>,
	pub page: u32,
	pub per_page: u32,
	pub sort: SortOrder,
}
impl TaskQuery {
	/// Query parameters in a stable order: each condition as `field` then `field_operator`, followed
	/// by pagination and sort.
	pub fn pairs(&self) -> Vec<(String, String)> {
		let mut pairs = Vec::with_capacity(self.conditions.len() * 2 + 3);

		for condition in &self.conditions {
			let field = condition.field.as_str();

			pairs.push((field.to_string(), condition.value.query_value()));
			pairs.push((format!("{field}_operator"), condition.operator.as_str().to_string()));
		}

		pairs.push(("page".to_string(), self.page.to_string()));
		pairs.push(("per_page".to_string(), self.per_page.to_string()));
		pairs.push(("sort".to_string(), self.sort.as_param()));

		pairs
	}
}
