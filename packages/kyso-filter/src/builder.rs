//! Incremental filter state.
//!
//! Tokens arrive in `field → operator → value` order. The sequence is kept well formed at every
//! step: only the last clause may be incomplete, a field appears at most once, and `end_date` only
//! follows an existing `start_date` clause.

use std::ops::Range;

use kyso_domain::CommentStatus;

use crate::{
	ChannelRef, Error, FilterField, FilterOperator, FilterToken, FilterValue, Result, SortOrder,
	TaskQuery, UserRef, ValueKind, query::Condition,
};

/// The kind of token the builder accepts next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
	Field,
	Operator(FilterField),
	Value(FilterField),
}

/// Value sets offered for enumerable fields.
#[derive(Clone, Debug, Default)]
pub struct SuggestionCatalog {
	pub users: Vec<UserRef>,
	pub channels: Vec<ChannelRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterBuilder {
	tokens: Vec<FilterToken>,
}
impl FilterBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn tokens(&self) -> &[FilterToken] {
		&self.tokens
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn has_field(&self, field: FilterField) -> bool {
		self.tokens.iter().any(|token| matches!(token, FilterToken::Field(found) if *found == field))
	}

	pub fn expect(&self) -> Expect {
		let Some(range) = self.clause_ranges().last().cloned() else {
			return Expect::Field;
		};
		let Some(FilterToken::Field(field)) = self.tokens.get(range.start) else {
			return Expect::Field;
		};

		match range.len() {
			1 => Expect::Operator(*field),
			2 => Expect::Value(*field),
			_ => Expect::Field,
		}
	}

	pub fn is_complete(&self) -> bool {
		self.expect() == Expect::Field
	}

	/// Appends a token if it is a legal continuation of the current sequence.
	pub fn push(&mut self, token: FilterToken) -> Result<()> {
		match (self.expect(), &token) {
			(Expect::Field, FilterToken::Field(field)) => {
				if self.has_field(*field) {
					return Err(Error::DuplicateField { field: field.as_str() });
				}
				if *field == FilterField::EndDate && !self.has_field(FilterField::StartDate) {
					return Err(Error::MissingStartDate);
				}
			},
			(Expect::Operator(field), FilterToken::Operator(operator)) =>
				if !field.operators().contains(operator) {
					return Err(Error::UnexpectedToken {
						expected: format!("an operator for {field}"),
						found: token.describe(),
					});
				},
			(Expect::Value(field), FilterToken::Value(value)) =>
				if value.kind() != field.value_kind() {
					return Err(Error::UnexpectedToken {
						expected: format!("a value for {field}"),
						found: token.describe(),
					});
				},
			(expect, _) =>
				return Err(Error::UnexpectedToken {
					expected: describe_expect(expect),
					found: token.describe(),
				}),
		}

		self.tokens.push(token);

		Ok(())
	}

	/// Pushes a whole `field operator value` clause, rolling back on failure.
	pub fn push_clause(
		&mut self,
		field: FilterField,
		operator: FilterOperator,
		value: FilterValue,
	) -> Result<()> {
		let snapshot = self.tokens.len();
		let result = self
			.push(FilterToken::Field(field))
			.and_then(|()| self.push(FilterToken::Operator(operator)))
			.and_then(|()| self.push(FilterToken::Value(value)));

		if result.is_err() {
			self.tokens.truncate(snapshot);
		}

		result
	}

	/// Removes the token at `index` together with every token that depends on it, and returns the
	/// removed tokens.
	///
	/// Removing a field drops its whole clause. Removing an operator or value drops the rest of its
	/// clause, or the whole clause when it is not the last one. Removing `start_date` also drops the
	/// `end_date` clause.
	pub fn remove(&mut self, index: usize) -> Result<Vec<FilterToken>> {
		let len = self.tokens.len();
		let ranges = self.clause_ranges();
		let Some(position) = ranges.iter().position(|range| range.contains(&index)) else {
			return Err(Error::IndexOutOfRange { index, len });
		};
		let clause = ranges[position].clone();
		let is_last = position + 1 == ranges.len();
		let cut = if index == clause.start || !is_last { clause } else { index..clause.end };
		let removed_field = match self.tokens.get(cut.start) {
			Some(FilterToken::Field(field)) => Some(*field),
			_ => None,
		};
		let mut removed: Vec<_> = self.tokens.drain(cut).collect();

		if removed_field == Some(FilterField::StartDate)
			&& let Some(dependent) = self.clause_of(FilterField::EndDate)
		{
			removed.extend(self.tokens.drain(dependent));
		}

		tracing::debug!(index, removed = removed.len(), "Removed filter tokens.");

		Ok(removed)
	}

	pub fn clear(&mut self) {
		self.tokens.clear();
	}

	/// Tokens that may legally come next.
	///
	/// Dates and free text have no enumerable value set, so value suggestions for them are empty.
	pub fn suggestions(&self, catalog: &SuggestionCatalog) -> Vec<FilterToken> {
		match self.expect() {
			Expect::Field => FilterField::ALL
				.into_iter()
				.filter(|field| !self.has_field(*field))
				.filter(|field| *field != FilterField::EndDate || self.has_field(FilterField::StartDate))
				.map(FilterToken::Field)
				.collect(),
			Expect::Operator(field) => field.operators().iter().copied().map(FilterToken::Operator).collect(),
			Expect::Value(field) => match field.value_kind() {
				ValueKind::User => catalog
					.users
					.iter()
					.cloned()
					.map(|user| FilterToken::Value(FilterValue::User(user)))
					.collect(),
				ValueKind::Channel => catalog
					.channels
					.iter()
					.cloned()
					.map(|channel| FilterToken::Value(FilterValue::Channel(channel)))
					.collect(),
				ValueKind::Status => CommentStatus::ALL
					.into_iter()
					.map(|status| FilterToken::Value(FilterValue::Status(status)))
					.collect(),
				ValueKind::Text | ValueKind::Date => Vec::new(),
			},
		}
	}

	/// Reduces the tokens into a search request. Fails while a clause is still open.
	pub fn to_query(&self, page: u32, per_page: u32, sort: SortOrder) -> Result<TaskQuery> {
		if page == 0 {
			return Err(Error::Validation { message: "page must be greater than zero.".to_string() });
		}
		if per_page == 0 {
			return Err(Error::Validation { message: "per_page must be greater than zero.".to_string() });
		}

		match self.expect() {
			Expect::Operator(field) =>
				return Err(Error::Incomplete { field: field.as_str(), missing: "operator" }),
			Expect::Value(field) =>
				return Err(Error::Incomplete { field: field.as_str(), missing: "value" }),
			Expect::Field => {},
		}

		let mut conditions = Vec::new();

		for chunk in self.tokens.chunks(3) {
			if let [
				FilterToken::Field(field),
				FilterToken::Operator(operator),
				FilterToken::Value(value),
			] = chunk
			{
				conditions.push(Condition { field: *field, operator: *operator, value: value.clone() });
			}
		}

		Ok(TaskQuery { conditions, page, per_page, sort })
	}

	fn clause_ranges(&self) -> Vec<Range<usize>> {
		let mut ranges: Vec<Range<usize>> = Vec::new();

		for (index, token) in self.tokens.iter().enumerate() {
			let starts_clause = matches!(token, FilterToken::Field(_));

			match ranges.last_mut() {
				Some(current) if !starts_clause => current.end = index + 1,
				_ => ranges.push(index..index + 1),
			}
		}

		ranges
	}

	fn clause_of(&self, field: FilterField) -> Option<Range<usize>> {
		self.clause_ranges()
			.into_iter()
			.find(|range| matches!(self.tokens.get(range.start), Some(FilterToken::Field(found)) if *found == field))
	}
}

fn describe_expect(expect: Expect) -> String {
	match expect {
		Expect::Field => "a field".to_string(),
		Expect::Operator(field) => format!("an operator for {field}"),
		Expect::Value(field) => format!("a value for {field}"),
	}
}
