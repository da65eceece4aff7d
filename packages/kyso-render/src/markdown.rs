//! Markdown pipeline: front matter, image rewriting, directives, then CommonMark with GFM and math
//! extensions. Search highlighting runs on the parsed text.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html::push_html};

use kyso_domain::front_matter;

use crate::{
	RenderOptions,
	directive::{self, Directive, Segment},
	highlight::Highlighter,
	html, images,
};

/// Renders a whole document. A leading header block is shown as YAML code above the body.
pub fn render_markdown_document(markdown: &str, opts: &RenderOptions) -> String {
	let front = front_matter::extract(markdown);
	let mut out = String::new();

	if let Some(headers) = &front.headers {
		out.push_str(&render_front_matter(headers));
	}

	out.push_str(&render_markdown_fragment(front.body, opts));

	out
}

/// Renders Markdown without looking for a header block.
pub fn render_markdown_fragment(markdown: &str, opts: &RenderOptions) -> String {
	let highlighter = Highlighter::new(opts.highlight.as_deref());

	match &opts.context {
		Some(context) => {
			let prepared = images::rewrite_relative_images(markdown, context, &opts.content_prefix);

			render_segments(&prepared, opts, highlighter.as_ref())
		},
		None => render_segments(markdown, opts, highlighter.as_ref()),
	}
}

pub fn render_front_matter(headers: &str) -> String {
	format!(
		"<pre class=\"front-matter\"><code class=\"language-yaml hljs\">{}</code></pre>\n",
		html::escape(headers)
	)
}

fn render_segments(markdown: &str, opts: &RenderOptions, highlighter: Option<&Highlighter>) -> String {
	let mut out = String::new();

	for segment in directive::split(markdown) {
		match segment {
			Segment::Markdown(text) => out.push_str(&render_commonmark(&text, opts, highlighter)),
			Segment::Directive(directive) =>
				out.push_str(&render_directive(&directive, opts, highlighter)),
		}
	}

	out
}

fn render_directive(
	directive: &Directive,
	opts: &RenderOptions,
	highlighter: Option<&Highlighter>,
) -> String {
	let name = html::escape(directive.kind.name());
	let text = html::escape(directive.body.trim());
	let label_attr = directive
		.label
		.as_deref()
		.map(|label| format!(" data-label=\"{}\"", html::escape(label)))
		.unwrap_or_default();
	let inner = render_segments(&directive.body, opts, highlighter);

	if directive.kind.is_callout() {
		let title = directive
			.label
			.as_deref()
			.map(|label| format!("<p class=\"callout-title\">{}</p>\n", html::escape(label)))
			.unwrap_or_default();

		format!(
			"<aside class=\"callout callout-{name}\" data-directive=\"{name}\"{label_attr} data-text=\"{text}\">\n{title}{inner}</aside>\n"
		)
	} else {
		format!("<div class=\"directive\" data-directive=\"{name}\"{label_attr} data-text=\"{text}\">\n{inner}</div>\n")
	}
}

fn render_commonmark(markdown: &str, opts: &RenderOptions, highlighter: Option<&Highlighter>) -> String {
	let mut events = Vec::new();
	let mut code: Option<(Option<String>, String)> = None;
	let mut raw_block = String::new();
	// Alt text is written into an attribute, so it stays unmarked.
	let mut image_depth = 0_usize;

	for event in Parser::new_ext(markdown, options()) {
		if code.is_some() {
			match event {
				Event::Text(text) =>
					if let Some((_, body)) = code.as_mut() {
						body.push_str(&text);
					},
				Event::End(TagEnd::CodeBlock) =>
					if let Some((lang, body)) = code.take() {
						events.push(Event::Html(code_block(lang.as_deref(), &body).into()));
					},
				_ => {},
			}

			continue;
		}
		if !raw_block.is_empty() && !matches!(event, Event::Html(_)) {
			events.push(raw_block_event(std::mem::take(&mut raw_block), opts));
		}

		match event {
			Event::Start(Tag::CodeBlock(kind)) => {
				let lang = match kind {
					CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
					CodeBlockKind::Indented => None,
				};

				code = Some((lang, String::new()));
			},
			Event::Text(text) => {
				let marked = highlighter.filter(|_| image_depth == 0).and_then(|h| h.mark(&text));

				events.push(marked.map_or(Event::Text(text), |html| Event::InlineHtml(html.into())));
			},
			Event::Html(raw) => raw_block.push_str(&raw),
			Event::InlineHtml(raw) => events.push(inline_html_event(raw, opts)),
			Event::Code(text) => events.push(Event::InlineHtml(
				format!("<code class=\"hljs\">{}</code>", html::escape(&text)).into(),
			)),
			Event::InlineMath(tex) => events.push(Event::InlineHtml(
				format!("<span class=\"math math-inline\">{}</span>", html::escape(&tex)).into(),
			)),
			Event::DisplayMath(tex) => events.push(Event::InlineHtml(
				format!("<span class=\"math math-display\">{}</span>", html::escape(&tex)).into(),
			)),
			Event::Start(Tag::Image { link_type, dest_url, title, id }) => {
				let dest_url = opts
					.context
					.as_ref()
					.and_then(|context| images::resolve(&dest_url, context, &opts.content_prefix))
					.map(CowStr::from)
					.unwrap_or(dest_url);

				image_depth += 1;
				events.push(Event::Start(Tag::Image { link_type, dest_url, title, id }));
			},
			Event::End(TagEnd::Image) => {
				image_depth = image_depth.saturating_sub(1);
				events.push(Event::End(TagEnd::Image));
			},
			other => events.push(other),
		}
	}

	if !raw_block.is_empty() {
		events.push(raw_block_event(raw_block, opts));
	}

	let mut out = String::with_capacity(markdown.len() * 3 / 2);

	push_html(&mut out, events.into_iter());

	out
}

fn options() -> Options {
	Options::ENABLE_TABLES
		| Options::ENABLE_FOOTNOTES
		| Options::ENABLE_STRIKETHROUGH
		| Options::ENABLE_TASKLISTS
		| Options::ENABLE_MATH
		| Options::ENABLE_GFM
}

fn code_block(lang: Option<&str>, body: &str) -> String {
	match lang {
		Some("mermaid") => format!("<pre class=\"mermaid\">{}</pre>\n", html::escape(body)),
		Some(lang) => format!(
			"<pre><code class=\"language-{} hljs\">{}</code></pre>\n",
			html::escape(lang),
			html::escape(body)
		),
		None => format!("<pre><code class=\"hljs\">{}</code></pre>\n", html::escape(body)),
	}
}

fn raw_block_event(raw: String, opts: &RenderOptions) -> Event<'static> {
	if opts.allow_raw_html {
		Event::Html(html::sanitize(&raw).into())
	} else {
		Event::Text(raw.into())
	}
}

fn inline_html_event<'a>(raw: CowStr<'a>, opts: &RenderOptions) -> Event<'a> {
	if opts.allow_raw_html {
		Event::InlineHtml(html::sanitize(&raw).into())
	} else {
		Event::Text(raw)
	}
}

#[cfg(test)]
mod tests {
	use kyso_domain::ReportContext;

	use super::*;

	fn opts() -> RenderOptions {
		RenderOptions::default()
	}

	#[test]
	fn routes_mermaid_and_highlights_other_code() {
		let out = render_markdown_fragment("```mermaid\ngraph TD; A-->B\n```\n\n```rust\nlet x = 1;\n```\n", &opts());

		assert!(out.contains("<pre class=\"mermaid\">graph TD; A--&gt;B\n</pre>"));
		assert!(out.contains("<pre><code class=\"language-rust hljs\">let x = 1;\n</code></pre>"));
	}

	#[test]
	fn delegates_math_to_the_typesetter() {
		let out = render_markdown_fragment("Euler: $e^{i\\pi}+1=0$\n\n$$\\int_0^1 x\\,dx$$\n", &opts());

		assert!(out.contains("<span class=\"math math-inline\">e^{i\\pi}+1=0</span>"));
		assert!(out.contains("<span class=\"math math-display\">"));
	}

	#[test]
	fn rewrites_images_when_a_context_is_present() {
		let mut opts = opts();

		opts.context = Some(ReportContext {
			organization: "o".to_string(),
			team: "t".to_string(),
			report: "r".to_string(),
			version: 3,
		});

		let out = render_markdown_fragment("![alt](img.png)\n\n![ref][logo]\n\n[logo]: logo.svg\n", &opts);

		assert!(out.contains("src=\"/scs/o/t/reports/r/3/img.png\""));
		assert!(out.contains("src=\"/scs/o/t/reports/r/3/logo.svg\""));
	}

	#[test]
	fn raw_html_is_escaped_unless_allowed() {
		let input = "<div onclick=\"x()\">hi</div>\n";
		let escaped = render_markdown_fragment(input, &opts());

		assert!(escaped.contains("&lt;div onclick="));

		let mut allowed = opts();

		allowed.allow_raw_html = true;

		let sanitized = render_markdown_fragment(input, &allowed);

		assert!(sanitized.contains("<div>hi</div>"));
	}

	fn highlighting(term: &str) -> RenderOptions {
		RenderOptions { highlight: Some(term.to_string()), ..opts() }
	}

	#[test]
	fn highlight_marks_prose() {
		let out = render_markdown_fragment("Strong growth ahead & more.\n", &highlighting("growth"));

		assert_eq!(
			out,
			"<p>Strong <mark class=\"kyso-highlight\">growth</mark> ahead &amp; more.</p>\n"
		);
	}

	#[test]
	fn highlight_leaves_directive_syntax_intact() {
		let out = render_markdown_fragment(":::note\nRead the note.\n:::\n", &highlighting("note"));

		assert!(out.starts_with("<aside class=\"callout callout-note\" data-directive=\"note\""));
		assert!(out.contains("data-text=\"Read the note.\""));
		assert!(out.contains("<p>Read the <mark class=\"kyso-highlight\">note</mark>.</p>"));
		assert!(!out.contains(":::"));
	}

	#[test]
	fn highlight_leaves_image_destinations_and_alt_text_intact() {
		let mut opts = highlighting("chart");

		opts.context = Some(ReportContext {
			organization: "o".to_string(),
			team: "t".to_string(),
			report: "r".to_string(),
			version: 3,
		});

		let out = render_markdown_fragment("![chart](chart.png) shows the chart.\n", &opts);

		assert!(out.contains("<img src=\"/scs/o/t/reports/r/3/chart.png\" alt=\"chart\""));
		assert!(out.contains(" shows the <mark class=\"kyso-highlight\">chart</mark>."));
	}

	#[test]
	fn highlight_skips_inline_code() {
		let out = render_markdown_fragment("Call `growth()` for growth.\n", &highlighting("growth"));

		assert!(out.contains("<code class=\"hljs\">growth()</code>"));
		assert!(out.contains(" for <mark class=\"kyso-highlight\">growth</mark>."));
	}

	#[test]
	fn callouts_carry_their_text() {
		let out = render_markdown_fragment(":::tip[Hint]\nUse **bold**.\n:::\n", &opts());

		assert!(out.starts_with(
			"<aside class=\"callout callout-tip\" data-directive=\"tip\" data-label=\"Hint\" data-text=\"Use **bold**.\">"
		));
		assert!(out.contains("<p class=\"callout-title\">Hint</p>"));
		assert!(out.contains("<strong>bold</strong>"));
	}

	#[test]
	fn custom_directives_keep_their_name() {
		let out = render_markdown_fragment(":::quiz\nWhat is 2+2?\n:::\n", &opts());

		assert!(out.starts_with("<div class=\"directive\" data-directive=\"quiz\" data-text=\"What is 2+2?\">"));
	}

	#[test]
	fn document_front_matter_renders_as_yaml() {
		let out = render_markdown_document("title: X\n\nBody text", &opts());

		assert!(out.starts_with(
			"<pre class=\"front-matter\"><code class=\"language-yaml hljs\">title: X</code></pre>\n"
		));
		assert!(out.ends_with("<p>Body text</p>\n"));
	}
}
