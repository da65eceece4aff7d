pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kyso_domain::ReportKind;

#[derive(Debug, Parser)]
#[command(
	version = kyso_cli::VERSION,
	rename_all = "kebab",
	styles = kyso_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab")]
pub enum Command {
	/// Render a report into a standalone HTML page.
	Render(RenderArgs),
	/// Print the inline-comment search URL for a task filter.
	TasksUrl(TasksUrlArgs),
	/// Print the public platform settings.
	Settings {
		/// Skip the cache and refetch.
		#[arg(long)]
		refresh: bool,
	},
	/// Apply onboarding steps and print the resulting checklist.
	Progress(ProgressArgs),
	/// Check whether a session token allows navigating to a path.
	TokenCheck {
		#[arg(value_name = "TOKEN")]
		token: String,
		#[arg(long, value_name = "PATH", default_value = "/")]
		path: String,
	},
	/// Manage locally stored report drafts.
	#[command(subcommand)]
	Draft(DraftCommand),
}

#[derive(Debug, clap::Args)]
pub struct RenderArgs {
	#[arg(value_name = "INPUT")]
	pub input: PathBuf,
	/// Overrides detection from the file extension.
	#[arg(long, value_name = "KIND")]
	pub kind: Option<ReportKind>,
	/// `--org`, `--team` and `--report` go together.
	#[arg(long, value_name = "SLUG", requires_all = ["team", "report"])]
	pub org: Option<String>,
	#[arg(long, value_name = "SLUG", requires_all = ["org", "report"])]
	pub team: Option<String>,
	#[arg(long, value_name = "SLUG", requires_all = ["org", "team"])]
	pub report: Option<String>,
	#[arg(long, value_name = "N", default_value_t = 1)]
	pub version: u32,
	#[arg(long, value_name = "TERM")]
	pub highlight: Option<String>,
	#[arg(long)]
	pub hide_input: bool,
	#[arg(long)]
	pub hide_output: bool,
	/// JSON array of inline comments to attach.
	#[arg(long, value_name = "FILE", conflicts_with = "report_id")]
	pub comments: Option<PathBuf>,
	/// Fetches the report's inline comments from the API.
	#[arg(long, value_name = "ID")]
	pub report_id: Option<String>,
	/// Writes to stdout when omitted.
	#[arg(long, value_name = "FILE")]
	pub out: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct TasksUrlArgs {
	/// One `FIELD OPERATOR VALUE` clause; repeatable.
	#[arg(long = "token", num_args = 3, value_names = ["FIELD", "OP", "VALUE"])]
	pub tokens: Vec<String>,
	#[arg(long, value_name = "N", default_value_t = 1)]
	pub page: u32,
	#[arg(long, value_name = "N", default_value_t = 20)]
	pub per_page: u32,
	#[arg(long, value_name = "ORDER", default_value = "desc")]
	pub sort: String,
}

#[derive(Debug, clap::Args)]
pub struct ProgressArgs {
	/// Persists the result to this user's profile.
	#[arg(long, value_name = "ID")]
	pub user: Option<String>,
	/// Current checklist as JSON.
	#[arg(long, value_name = "JSON")]
	pub current: Option<String>,
	#[arg(long = "step", value_name = "N")]
	pub steps: Vec<usize>,
	#[arg(long)]
	pub finish: bool,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab")]
pub enum DraftCommand {
	Save {
		#[arg(value_name = "KEY")]
		key: String,
		#[arg(long)]
		title: String,
		#[arg(long, default_value = "")]
		description: String,
		#[arg(long = "tag", value_name = "TAG")]
		tags: Vec<String>,
		#[arg(long, value_name = "FILE")]
		main_file: Option<String>,
	},
	Show {
		#[arg(value_name = "KEY")]
		key: String,
	},
	Clear {
		#[arg(value_name = "KEY")]
		key: String,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = kyso_config::load(&args.config)?;
	init_tracing(&config)?;

	match args.command {
		Command::Render(render) => commands::render(&config, render).await,
		Command::TasksUrl(tasks) => commands::tasks_url(&config, tasks),
		Command::Settings { refresh } => commands::settings(&config, refresh).await,
		Command::Progress(progress) => commands::progress(&config, progress).await,
		Command::TokenCheck { token, path } => commands::token_check(&token, &path),
		Command::Draft(draft) => commands::draft(&config, draft),
	}
}

fn init_tracing(config: &kyso_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	if tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init().is_err()
	{
		tracing::debug!("Tracing subscriber already installed.");
	}

	Ok(())
}
