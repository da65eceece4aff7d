use std::{ffi::OsString, fs};

use axum::{Json, Router, extract::Query, routing::get};
use clap::Parser;
use serde_json::json;

use kyso_domain::ReportKind;
use kyso_report::{Args, Command, DraftCommand};
use kyso_testkit::{TestDir, fixtures, start_stub_server};

fn write_config(dir: &TestDir, api_base_url: &str) -> std::path::PathBuf {
	let store = dir.join("store");
	let config = format!(
		r#"
[service]
log_level = "warn"

[api]
base_url = "{api_base_url}"
timeout_ms = 500

[storage]
local_store_dir = "{store}"

[settings_cache]
ttl_seconds = 60
"#,
		store = store.display()
	);

	dir.write("kyso.toml", &config).expect("Config must be written.")
}

#[test]
fn parses_render_arguments() {
	let args = Args::try_parse_from([
		"kyso-report",
		"-c",
		"kyso.toml",
		"render",
		"report.ipynb",
		"--kind",
		"markdown",
		"--org",
		"acme",
		"--team",
		"research",
		"--report",
		"q3",
		"--version",
		"4",
		"--hide-input",
	])
	.expect("Arguments must parse.");

	let Command::Render(render) = args.command else {
		panic!("Expected the render command.");
	};

	assert_eq!(render.kind, Some(ReportKind::Markdown));
	assert_eq!(render.version, 4);
	assert!(render.hide_input);
	assert!(!render.hide_output);
}

#[test]
fn org_requires_team_and_report() {
	assert!(
		Args::try_parse_from(["kyso-report", "-c", "k.toml", "render", "r.md", "--org", "acme"])
			.is_err()
	);
}

#[test]
fn team_and_report_require_org() {
	assert!(
		Args::try_parse_from([
			"kyso-report",
			"-c",
			"k.toml",
			"render",
			"r.md",
			"--team",
			"research",
			"--report",
			"q3",
		])
		.is_err()
	);
	assert!(
		Args::try_parse_from(["kyso-report", "-c", "k.toml", "render", "r.md", "--report", "q3"])
			.is_err()
	);
}

#[test]
fn comment_sources_are_exclusive() {
	assert!(
		Args::try_parse_from([
			"kyso-report",
			"-c",
			"k.toml",
			"render",
			"r.md",
			"--comments",
			"comments.json",
			"--report-id",
			"r1",
		])
		.is_err()
	);
}

#[test]
fn parses_repeated_filter_clauses() {
	let args = Args::try_parse_from([
		"kyso-report",
		"-c",
		"k.toml",
		"tasks-url",
		"--token",
		"status",
		"neq",
		"closed",
		"--token",
		"text",
		"contains",
		"plot",
		"--sort",
		"asc",
	])
	.expect("Arguments must parse.");

	let Command::TasksUrl(tasks) = args.command else {
		panic!("Expected the tasks-url command.");
	};

	assert_eq!(tasks.tokens, ["status", "neq", "closed", "text", "contains", "plot"]);
	assert_eq!(tasks.sort, "asc");
}

#[test]
fn parses_draft_subcommands() {
	let args = Args::try_parse_from([
		"kyso-report",
		"-c",
		"k.toml",
		"draft",
		"save",
		"new-report",
		"--title",
		"Q3 churn",
		"--tag",
		"churn",
		"--tag",
		"q3",
	])
	.expect("Arguments must parse.");

	assert!(matches!(
		args.command,
		Command::Draft(DraftCommand::Save { ref key, ref tags, .. }) if key == "new-report" && tags.len() == 2
	));
}

#[tokio::test]
async fn renders_a_notebook_to_a_standalone_page() {
	let dir = TestDir::new("kyso_report_cli").expect("Test dir must be created.");
	let config = write_config(&dir, "http://127.0.0.1:9/api/v1");
	let notebook = serde_json::to_string(&fixtures::sample_notebook()).expect("Fixture must encode.");
	let input = dir.write("analysis.ipynb", &notebook).expect("Notebook must be written.");
	let out = dir.join("analysis.html");
	let args = Args::try_parse_from([
		OsString::from("kyso-report"),
		OsString::from("-c"),
		config.into_os_string(),
		OsString::from("render"),
		input.into_os_string(),
		OsString::from("--out"),
		out.clone().into_os_string(),
	])
	.expect("Arguments must parse.");

	kyso_report::run(args).await.expect("Render must succeed.");

	let html = fs::read_to_string(&out).expect("Output must exist.");

	assert!(html.starts_with("<!DOCTYPE html>"));
	assert!(html.contains("<title>analysis</title>"));
	assert!(html.contains("class=\"notebook\""));
}

#[tokio::test]
async fn renders_comments_fetched_for_a_report_id() {
	let app = Router::new().route(
		"/inline-comments",
		get(|Query(params): Query<Vec<(String, String)>>| async move {
			let data = if params.iter().any(|(key, value)| key == "report_id" && value == "r1") {
				json!([{
					"id": "c1",
					"report_id": "r1",
					"cell_id": null,
					"author": { "id": "u1", "display_name": "Ada" },
					"text": "Numbers look off.",
					"current_status": "TO_DO",
					"created_at": "2026-01-02T09:30:00Z",
					"replies": []
				}])
			} else {
				json!([])
			};

			Json(json!({ "data": data }))
		}),
	);
	let server = start_stub_server(app).await.expect("Stub server must start.");
	let dir = TestDir::new("kyso_report_cli_comments").expect("Test dir must be created.");
	let config = write_config(&dir, server.base_url());
	let input = dir.write("notes.md", "# Notes\n").expect("Report must be written.");
	let out = dir.join("notes.html");
	let args = Args::try_parse_from([
		OsString::from("kyso-report"),
		OsString::from("-c"),
		config.into_os_string(),
		OsString::from("render"),
		input.into_os_string(),
		OsString::from("--report-id"),
		OsString::from("r1"),
		OsString::from("--out"),
		out.clone().into_os_string(),
	])
	.expect("Arguments must parse.");

	kyso_report::run(args).await.expect("Render must succeed.");

	let html = fs::read_to_string(&out).expect("Output must exist.");

	assert!(html.contains("id=\"comment-c1\""));
	assert!(html.contains("Numbers look off."));

	server.shutdown();
}
