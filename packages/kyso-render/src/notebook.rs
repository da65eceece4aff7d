//! Jupyter cell pipeline.

use kyso_domain::{Cell, CellKind, InlineComment, Notebook, front_matter};

use crate::{RenderOptions, comments, html, markdown, output};

pub fn render_notebook(notebook: &Notebook, opts: &RenderOptions, comments: &[InlineComment]) -> String {
	let mut out = format!("<div class=\"notebook\" data-language=\"{}\">\n", html::escape(&notebook.language));

	for (index, cell) in notebook.cells.iter().enumerate() {
		out.push_str(&render_cell(cell, index == 0, &notebook.language, opts, comments));
	}

	out.push_str("</div>\n");

	out
}

/// Renders one cell. `first` enables front-matter extraction for Markdown and raw cells.
pub fn render_cell(
	cell: &Cell,
	first: bool,
	language: &str,
	opts: &RenderOptions,
	comments: &[InlineComment],
) -> String {
	if cell.is_blank() {
		return String::new();
	}

	let show_input = opts.show_inputs && !cell.source_hidden;
	let show_output = opts.show_outputs && !cell.outputs_hidden && !cell.outputs.is_empty();
	let mut out = format!(
		"<section class=\"cell cell-{kind}\" id=\"cell-{id}\" data-cell-id=\"{id}\">\n",
		kind = cell.kind.as_str(),
		id = html::escape(&cell.id),
	);

	if show_input {
		out.push_str(&render_input(cell, first, language, opts));
	}
	if show_output {
		out.push_str("<div class=\"cell-output\">\n");

		for entry in &cell.outputs {
			out.push_str(&output::render_output(entry, opts));
		}

		out.push_str("</div>\n");
	}

	out.push_str(&comments::cell_thread(&cell.id, comments));
	out.push_str("</section>\n");

	out
}

fn render_input(cell: &Cell, first: bool, language: &str, opts: &RenderOptions) -> String {
	match cell.kind {
		CellKind::Code => {
			if cell.source.trim().is_empty() {
				return String::new();
			}

			let prompt = cell.execution_count.map(|count| count.to_string()).unwrap_or_else(|| " ".to_string());

			format!(
				"<div class=\"cell-input\"><span class=\"prompt\">In [{prompt}]:</span>\
				 <pre><code class=\"language-{} hljs\">{}</code></pre></div>\n",
				html::escape(language),
				html::escape(&cell.source)
			)
		},
		CellKind::Markdown =>
			if first {
				format!("<div class=\"cell-input\">\n{}</div>\n", markdown::render_markdown_document(&cell.source, opts))
			} else {
				format!("<div class=\"cell-input\">\n{}</div>\n", markdown::render_markdown_fragment(&cell.source, opts))
			},
		CellKind::Raw => {
			let (headers, body) = if first {
				let front = front_matter::extract(&cell.source);

				(front.headers, front.body)
			} else {
				(None, cell.source.as_str())
			};
			let mut out = String::from("<div class=\"cell-input\">\n");

			if let Some(headers) = headers {
				out.push_str(&markdown::render_front_matter(&headers));
			}
			if !body.trim().is_empty() {
				out.push_str(&format!("<pre class=\"raw\">{}</pre>\n", html::escape(body)));
			}

			out.push_str("</div>\n");

			out
		},
	}
}
