pub mod comments;
pub mod directive;
pub mod frame;
pub mod highlight;
pub mod html;
pub mod images;
pub mod markdown;
pub mod notebook;
pub mod output;
pub mod page;

mod error;
mod fences;

pub use error::{Error, Result};
pub use frame::FramePolicy;
pub use output::OutputKind;

use kyso_config::Config;
use kyso_domain::{InlineComment, Notebook, ReportContext, ReportKind};

#[derive(Clone, Debug)]
pub struct RenderOptions {
	/// Enables relative image rewriting when set.
	pub context: Option<ReportContext>,
	pub content_prefix: String,
	pub show_inputs: bool,
	pub show_outputs: bool,
	pub allow_raw_html: bool,
	/// The `?highlight=` term.
	pub highlight: Option<String>,
	pub frame: FramePolicy,
}
impl RenderOptions {
	pub fn from_config(cfg: &Config) -> Self {
		Self {
			context: None,
			content_prefix: cfg.storage.content_prefix.clone(),
			show_inputs: cfg.render.show_inputs,
			show_outputs: cfg.render.show_outputs,
			allow_raw_html: cfg.render.allow_raw_html,
			highlight: None,
			frame: FramePolicy::from(&cfg.render),
		}
	}
}
impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			context: None,
			content_prefix: "scs".to_string(),
			show_inputs: true,
			show_outputs: true,
			allow_raw_html: false,
			highlight: None,
			frame: FramePolicy::default(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedReport {
	pub kind: ReportKind,
	pub html: String,
}

/// Renders a report body with the strategy for its kind, followed by report-level comment threads.
pub fn render_report(
	content: &str,
	kind: ReportKind,
	opts: &RenderOptions,
	comments: &[InlineComment],
) -> Result<RenderedReport> {
	let mut html = match kind {
		ReportKind::Jupyter => {
			let notebook = Notebook::from_json(content)?;

			tracing::debug!(cells = notebook.cells.len(), language = %notebook.language, "Rendering notebook.");

			notebook::render_notebook(&notebook, opts, comments)
		},
		ReportKind::Markdown => format!(
			"<article class=\"markdown-report\">\n{}</article>\n",
			markdown::render_markdown_document(content, opts)
		),
		ReportKind::Html => frame::render_frame(content, &opts.frame, "report-html"),
	};

	html.push_str(&comments::report_threads(comments));

	Ok(RenderedReport { kind, html })
}
