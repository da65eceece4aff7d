use time::macros::date;

use kyso_domain::CommentStatus;
use kyso_filter::{
	ChannelRef, FilterBuilder, FilterField, FilterOperator, FilterToken, FilterValue, SortOrder, UserRef,
};

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
	items.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect()
}

#[test]
fn reduces_tokens_into_paired_query_keys() {
	let mut builder = FilterBuilder::new();

	builder
		.push_clause(
			FilterField::ReportAuthor,
			FilterOperator::Eq,
			FilterValue::User(UserRef { id: "u1".to_string(), display_name: "Ada".to_string() }),
		)
		.expect("Author clause must push.");
	builder
		.push_clause(FilterField::Status, FilterOperator::Neq, FilterValue::Status(CommentStatus::Closed))
		.expect("Status clause must push.");
	builder
		.push_clause(
			FilterField::Channel,
			FilterOperator::Eq,
			FilterValue::Channel(ChannelRef { id: "t9".to_string(), name: "research".to_string() }),
		)
		.expect("Channel clause must push.");
	builder
		.push_clause(FilterField::StartDate, FilterOperator::Gte, FilterValue::Date(date!(2024 - 03 - 01)))
		.expect("Start date clause must push.");

	let query = builder.to_query(2, 50, SortOrder::Ascending).expect("Complete filter must reduce.");

	assert_eq!(
		query.pairs(),
		pairs(&[
			("report_author_id", "u1"),
			("report_author_id_operator", "eq"),
			("status", "CLOSED"),
			("status_operator", "neq"),
			("team_id", "t9"),
			("team_id_operator", "eq"),
			("start_date", "2024-03-01"),
			("start_date_operator", "gte"),
			("page", "2"),
			("per_page", "50"),
			("sort", "created_at"),
		])
	);
}

#[test]
fn empty_filter_still_carries_pagination_and_sort() {
	let query = FilterBuilder::new().to_query(1, 20, SortOrder::default()).expect("Empty filter must reduce.");

	assert_eq!(query.pairs(), pairs(&[("page", "1"), ("per_page", "20"), ("sort", "-created_at")]));
}

#[test]
fn removing_the_leading_field_never_leaves_orphans() {
	let mut builder = FilterBuilder::new();

	builder.push(FilterToken::Field(FilterField::ReportAuthor)).expect("Field must push.");
	builder.push(FilterToken::Operator(FilterOperator::Eq)).expect("Operator must push.");
	builder
		.push(FilterToken::Value(FilterValue::User(UserRef {
			id: "u1".to_string(),
			display_name: "Ada".to_string(),
		})))
		.expect("Value must push.");
	builder.remove(0).expect("Index must exist.");

	assert!(builder.tokens().is_empty());
	assert!(builder.remove(0).is_err());
}

#[test]
fn fields_are_offered_once() {
	let mut builder = FilterBuilder::new();

	builder
		.push_clause(FilterField::Text, FilterOperator::Contains, FilterValue::Text("typo".to_string()))
		.expect("Text clause must push.");

	let offered = builder.suggestions(&Default::default());

	assert!(!offered.contains(&FilterToken::Field(FilterField::Text)));
	assert!(offered.contains(&FilterToken::Field(FilterField::CommentAuthor)));
	assert!(builder.push(FilterToken::Field(FilterField::Text)).is_err());
}

#[test]
fn sort_orders_parse_from_cli_words() {
	assert_eq!(SortOrder::parse("asc").expect("asc must parse."), SortOrder::Ascending);
	assert_eq!(SortOrder::parse("-created_at").expect("Param must parse."), SortOrder::Descending);
	assert!(SortOrder::parse("sideways").is_err());
}
