use std::{fs, path::Path};

use color_eyre::eyre;
use serde_json::json;
use time::OffsetDateTime;

use kyso_client::{
	ApiClient, OnboardingTracker, PublicSettings, RetryPolicy, SessionCheck, SettingsCache,
	check_session,
};
use kyso_config::Config;
use kyso_domain::{InlineComment, OnboardingProgress, OnboardingStep, ReportContext, ReportKind};
use kyso_filter::{FilterBuilder, FilterField, FilterOperator, FilterValue, SortOrder, TaskQuery};
use kyso_render::{RenderOptions, page};
use kyso_storage::{DraftStore, LocalStore, ReportDraft};

use crate::{DraftCommand, ProgressArgs, RenderArgs, TasksUrlArgs};

pub async fn render(config: &Config, args: RenderArgs) -> color_eyre::Result<()> {
	let kind = match args.kind.or_else(|| ReportKind::from_path(&args.input)) {
		Some(kind) => kind,
		None =>
			return Err(eyre::eyre!(
				"Cannot tell the report kind of {}. Pass --kind.",
				args.input.display()
			)),
	};
	let content = fs::read_to_string(&args.input)?;
	let comments = match (args.comments.as_deref(), args.report_id.as_deref()) {
		(Some(path), _) => read_comments(path)?,
		(None, Some(report_id)) =>
			ApiClient::new(&config.api)?.report_inline_comments(report_id).await?,
		(None, None) => Vec::new(),
	};
	let mut opts = RenderOptions::from_config(config);

	opts.show_inputs &= !args.hide_input;
	opts.show_outputs &= !args.hide_output;
	opts.highlight = args.highlight;
	opts.context = match (args.org, args.team, args.report) {
		(Some(organization), Some(team), Some(report)) =>
			Some(ReportContext { organization, team, report, version: args.version }),
		_ => None,
	};

	let rendered = kyso_render::render_report(&content, kind, &opts, &comments)?;
	let title = args.input.file_stem().and_then(|stem| stem.to_str()).unwrap_or("Report");
	let html = page::standalone_page(title, &rendered.html);

	tracing::info!(kind = kind.as_str(), comments = comments.len(), "Rendered report.");

	match args.out {
		Some(out) => fs::write(&out, html)?,
		None => println!("{html}"),
	}

	Ok(())
}

pub fn tasks_url(config: &Config, args: TasksUrlArgs) -> color_eyre::Result<()> {
	let sort = SortOrder::parse(&args.sort)?;
	let query = build_task_query(&args.tokens, args.page, args.per_page, sort)?;
	let client = ApiClient::new(&config.api)?;

	println!("{}", client.inline_comment_search_url(&query));

	Ok(())
}

pub async fn settings(config: &Config, refresh: bool) -> color_eyre::Result<()> {
	let client = ApiClient::new(&config.api)?;
	let store = LocalStore::open(&config.storage)?;
	let cache = SettingsCache::new(client, store, &config.settings_cache);
	let now = OffsetDateTime::now_utc();
	let lookup = if refresh { cache.refresh(now).await } else { cache.get(now).await };

	tracing::info!(origin = ?lookup.origin, "Loaded public settings.");

	println!("{}", serde_json::to_string_pretty(&settings_json(&lookup.settings))?);

	Ok(())
}

pub async fn progress(config: &Config, args: ProgressArgs) -> color_eyre::Result<()> {
	let current = match args.current.as_deref() {
		Some(raw) => serde_json::from_str::<OnboardingProgress>(raw)?,
		None => OnboardingProgress::default(),
	};
	let steps = parse_steps(&args.steps)?;

	let (progress, delivered) = match args.user {
		Some(user_id) => {
			let client = ApiClient::new(&config.api)?;
			let policy = RetryPolicy::from(&config.mutations);
			let mut tracker = OnboardingTracker::new(user_id, current, client, policy);
			let mut delivered = true;

			for step in steps {
				let outcome = tracker.mark_done(step).await;

				delivered &= !outcome.changed || outcome.delivered;
			}
			if args.finish {
				let outcome = tracker.finish_and_remove().await;

				delivered &= !outcome.changed || outcome.delivered;
			}

			(*tracker.progress(), Some(delivered))
		},
		None => (apply_progress(current, &steps, args.finish), None),
	};

	let report = json!({
		"onboarding_progress": progress,
		"percent": progress.percent(),
		"finished": progress.is_finished(),
		"delivered": delivered,
	});

	println!("{}", serde_json::to_string_pretty(&report)?);

	Ok(())
}

pub fn token_check(token: &str, path: &str) -> color_eyre::Result<()> {
	match check_session(Some(token), path, OffsetDateTime::now_utc()) {
		SessionCheck::Valid { expires_at } => println!("valid until {expires_at}"),
		SessionCheck::Expired { redirect } => println!("redirect {redirect}"),
	}

	Ok(())
}

pub fn draft(config: &Config, command: DraftCommand) -> color_eyre::Result<()> {
	let drafts = DraftStore::new(LocalStore::open(&config.storage)?);

	match command {
		DraftCommand::Save { key, title, description, tags, main_file } => {
			let draft = ReportDraft {
				title,
				description,
				tags,
				organization: None,
				team: None,
				main_file,
				updated_at: OffsetDateTime::now_utc(),
			};

			drafts.save(&key, &draft)?;
			tracing::info!(key = %key, "Saved draft.");
		},
		DraftCommand::Show { key } => match drafts.load(&key)? {
			Some(draft) => println!("{}", serde_json::to_string_pretty(&draft)?),
			None => return Err(eyre::eyre!("No draft stored under {key}.")),
		},
		DraftCommand::Clear { key } =>
			if !drafts.clear(&key)? {
				tracing::warn!(key = %key, "No draft to clear.");
			},
	}

	Ok(())
}

/// Builds a settled task query from flattened `FIELD OP VALUE` triples.
pub fn build_task_query(
	tokens: &[String],
	page: u32,
	per_page: u32,
	sort: SortOrder,
) -> color_eyre::Result<TaskQuery> {
	if tokens.len() % 3 != 0 {
		return Err(eyre::eyre!("Filter clauses take exactly three values: FIELD OP VALUE."));
	}

	let mut builder = FilterBuilder::new();

	for clause in tokens.chunks(3) {
		let field = FilterField::parse(&clause[0])?;
		let operator = FilterOperator::parse(&clause[1])?;
		let value = FilterValue::parse_for(field, &clause[2])?;

		builder.push_clause(field, operator, value)?;
	}

	Ok(builder.to_query(page, per_page, sort)?)
}

pub fn apply_progress(
	mut progress: OnboardingProgress,
	steps: &[OnboardingStep],
	finish: bool,
) -> OnboardingProgress {
	for step in steps {
		progress.mark_done(*step);
	}
	if finish {
		progress.finish_and_remove();
	}

	progress
}

fn parse_steps(numbers: &[usize]) -> color_eyre::Result<Vec<OnboardingStep>> {
	numbers
		.iter()
		.map(|number| {
			OnboardingStep::from_number(*number)
				.ok_or_else(|| eyre::eyre!("Onboarding steps are numbered 1 to 5, got {number}."))
		})
		.collect()
}

fn read_comments(path: &Path) -> color_eyre::Result<Vec<InlineComment>> {
	let raw = fs::read_to_string(path)?;

	Ok(serde_json::from_str(&raw)?)
}

fn settings_json(settings: &PublicSettings) -> serde_json::Value {
	json!({
		"captcha_enabled": settings.captcha_enabled,
		"captcha_site_key": settings.captcha_site_key,
		"onboarding_messages": settings.onboarding_messages,
		"public_channels_visible": settings.public_channels_visible,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn clause(field: &str, op: &str, value: &str) -> Vec<String> {
		vec![field.to_string(), op.to_string(), value.to_string()]
	}

	#[test]
	fn builds_queries_from_clause_triples() {
		let tokens = [
			clause("status", "eq", "doing"),
			clause("start_date", "gte", "2026-01-01"),
			clause("end_date", "lte", "2026-02-01"),
		]
		.concat();
		let query = build_task_query(&tokens, 1, 20, SortOrder::Descending).expect("Query must build.");
		let pairs = query.pairs();

		assert_eq!(pairs[0], ("status".to_string(), "DOING".to_string()));
		assert_eq!(pairs[2], ("start_date".to_string(), "2026-01-01".to_string()));
		assert_eq!(pairs.last(), Some(&("sort".to_string(), "-created_at".to_string())));
	}

	#[test]
	fn rejects_invalid_clauses() {
		assert!(build_task_query(&["status".to_string()], 1, 20, SortOrder::Descending).is_err());
		assert!(
			build_task_query(&clause("end_date", "lte", "2026-02-01"), 1, 20, SortOrder::Descending)
				.is_err()
		);
		assert!(build_task_query(&clause("text", "eq", "plot"), 1, 20, SortOrder::Descending).is_err());
	}

	#[test]
	fn applies_steps_offline() {
		let progress = apply_progress(
			OnboardingProgress::default(),
			&[OnboardingStep::ExploreReports, OnboardingStep::InviteColleagues],
			false,
		);

		assert_eq!(progress.percent(), 40);
		assert!(!progress.is_finished());
		assert_eq!(apply_progress(progress, &[], true).percent(), 100);
		assert!(parse_steps(&[6]).is_err());
	}
}
