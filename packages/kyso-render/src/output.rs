//! Output dispatch: every notebook output maps onto one of seven renderers.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::Value;

use kyso_domain::{MimeBundle, MimeEntry, Output};

use crate::{RenderOptions, frame, html};

pub const PLOTLY_MIME: &str = "application/vnd.plotly.v1+json";

const BOKEH_MARKER: &str = "Bokeh";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
	PlainText,
	Image,
	Json,
	Error,
	Stream,
	Html,
	Plotly,
}
impl OutputKind {
	/// MIME types no renderer understands map to `None` and are dropped.
	pub fn for_mime(mime: &str) -> Option<Self> {
		match mime {
			PLOTLY_MIME => Some(Self::Plotly),
			"text/html" => Some(Self::Html),
			"text/plain" => Some(Self::PlainText),
			"image/png" | "image/jpeg" | "image/gif" | "image/svg+xml" => Some(Self::Image),
			"application/json" => Some(Self::Json),
			other if other.starts_with("application/") && other.ends_with("+json") => Some(Self::Json),
			_ => None,
		}
	}
}

/// The renderable entries of a MIME bundle. A Plotly entry excludes every other representation.
pub fn select_entries(bundle: &MimeBundle) -> Vec<(OutputKind, &MimeEntry)> {
	if let Some(plotly) = bundle.get(PLOTLY_MIME) {
		return vec![(OutputKind::Plotly, plotly)];
	}

	bundle
		.entries()
		.iter()
		.filter_map(|entry| OutputKind::for_mime(&entry.mime).map(|kind| (kind, entry)))
		.collect()
}

pub fn kinds(output: &Output) -> Vec<OutputKind> {
	match output {
		Output::Stream { .. } => vec![OutputKind::Stream],
		Output::Error { .. } => vec![OutputKind::Error],
		Output::ExecuteResult { data, .. } | Output::DisplayData { data } =>
			select_entries(data).into_iter().map(|(kind, _)| kind).collect(),
	}
}

pub fn render_output(output: &Output, opts: &RenderOptions) -> String {
	match output {
		Output::Stream { name, text } => format!(
			"<pre class=\"output-stream output-{}\">{}</pre>\n",
			name.as_str(),
			html::escape(&html::strip_ansi(text))
		),
		Output::Error { ename, evalue, .. } => format!(
			"<pre class=\"output-error\">{}</pre>\n",
			html::escape(&flatten_error(ename, evalue))
		),
		Output::ExecuteResult { data, .. } | Output::DisplayData { data } => {
			let mut out = String::new();

			for (kind, entry) in select_entries(data) {
				match render_entry(kind, entry, opts) {
					Some(rendered) => out.push_str(&rendered),
					None => tracing::debug!(mime = %entry.mime, "Skipping unrenderable output payload."),
				}
			}

			out
		},
	}
}

pub fn flatten_error(ename: &str, evalue: &str) -> String {
	html::collapse_whitespace(&format!("{ename}: {evalue}"))
}

fn render_entry(kind: OutputKind, entry: &MimeEntry, opts: &RenderOptions) -> Option<String> {
	match kind {
		OutputKind::PlainText => render_plain_text(entry),
		OutputKind::Image => render_image(entry),
		OutputKind::Json => render_json(entry),
		OutputKind::Html => render_html(entry, opts),
		OutputKind::Plotly => render_plotly(entry),
		OutputKind::Error | OutputKind::Stream => None,
	}
}

fn render_plain_text(entry: &MimeEntry) -> Option<String> {
	let text = entry.text()?;

	Some(format!("<pre class=\"output-text\">{}</pre>\n", html::escape(&html::strip_ansi(&text))))
}

fn render_image(entry: &MimeEntry) -> Option<String> {
	let text = entry.text()?;
	let encoded = if entry.mime == "image/svg+xml" {
		STANDARD.encode(text.as_bytes())
	} else {
		let compact: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();

		STANDARD.decode(compact.as_bytes()).ok()?;

		compact
	};

	Some(format!(
		"<img class=\"output-image\" alt=\"output\" src=\"data:{};base64,{encoded}\">\n",
		html::escape(&entry.mime)
	))
}

fn render_json(entry: &MimeEntry) -> Option<String> {
	let pretty = serde_json::to_string_pretty(&entry.payload).ok()?;

	Some(format!(
		"<pre class=\"output-json\"><code class=\"language-json hljs\">{}</code></pre>\n",
		html::escape(&pretty)
	))
}

fn render_html(entry: &MimeEntry, opts: &RenderOptions) -> Option<String> {
	let markup = entry.text()?;

	if markup.contains(BOKEH_MARKER) {
		return Some(frame::render_frame(&markup, &opts.frame, "output-bokeh"));
	}
	if !opts.allow_raw_html {
		return Some(frame::render_frame(&markup, &opts.frame, "output-html"));
	}

	Some(format!("<div class=\"output-html\">{}</div>\n", html::sanitize(&markup)))
}

fn render_plotly(entry: &MimeEntry) -> Option<String> {
	let figure = match &entry.payload {
		Value::Object(_) => entry.payload.clone(),
		Value::String(raw) => serde_json::from_str::<Value>(raw).ok().filter(Value::is_object)?,
		_ => return None,
	};

	figure.get("data")?;

	let encoded = serde_json::to_string(&figure).ok()?;

	Some(format!(
		"<div class=\"output-plotly plotly-figure\" data-figure=\"{}\"></div>\n",
		html::escape(&encoded)
	))
}
