//! Inline-comment threads attached to rendered cells and to the report as a whole.

use time::{format_description::well_known::Rfc3339, macros::format_description};

use kyso_domain::{CommentAnchor, InlineComment};

use crate::{RenderOptions, html, markdown};

/// Thread panel for one cell, or an empty string when nobody commented on it.
pub fn cell_thread(cell_id: &str, comments: &[InlineComment]) -> String {
	let anchored: Vec<_> = comments.iter().filter(|comment| comment.is_anchored_to_cell(cell_id)).collect();

	if anchored.is_empty() {
		return String::new();
	}

	render_thread(&anchored, &format!(" data-cell-id=\"{}\"", html::escape(cell_id)))
}

/// Thread panel for comments not anchored to any cell.
pub fn report_threads(comments: &[InlineComment]) -> String {
	let unanchored: Vec<_> =
		comments.iter().filter(|comment| !matches!(comment.anchor(), CommentAnchor::Cell(_))).collect();

	if unanchored.is_empty() {
		return String::new();
	}

	render_thread(&unanchored, " data-scope=\"report\"")
}

pub fn open_count(comments: &[&InlineComment]) -> usize {
	comments.iter().filter(|comment| comment.is_open()).count()
}

fn render_thread(comments: &[&InlineComment], scope_attr: &str) -> String {
	let mut out = format!(
		"<aside class=\"inline-comments\"{scope_attr} data-open-count=\"{}\">\n",
		open_count(comments)
	);

	for comment in comments {
		out.push_str(&render_comment(comment));
	}

	out.push_str("</aside>\n");

	out
}

fn render_comment(comment: &InlineComment) -> String {
	let body_opts = RenderOptions { allow_raw_html: false, highlight: None, ..RenderOptions::default() };
	let mut out = format!(
		"<article class=\"inline-comment status-{status}\" id=\"comment-{id}\">\n\
		 <header><span class=\"author\">{author}</span> \
		 <span class=\"status\">{label}</span> {time}</header>\n\
		 <div class=\"comment-body\">\n{body}</div>\n",
		status = comment.status.as_str().to_ascii_lowercase(),
		id = html::escape(&comment.id),
		author = html::escape(&comment.author.display_name),
		label = comment.status.label(),
		time = render_time(comment),
		body = markdown::render_markdown_fragment(&comment.text, &body_opts),
	);

	if !comment.replies.is_empty() {
		out.push_str("<div class=\"replies\">\n");

		for reply in &comment.replies {
			out.push_str(&render_comment(reply));
		}

		out.push_str("</div>\n");
	}

	out.push_str("</article>\n");

	out
}

fn render_time(comment: &InlineComment) -> String {
	let machine = comment.created_at.format(&Rfc3339).unwrap_or_default();
	let human = comment.created_at.format(format_description!("[year]-[month]-[day] [hour]:[minute]")).unwrap_or_default();

	format!("<time datetime=\"{}\">{}</time>", html::escape(&machine), html::escape(&human))
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use kyso_domain::{CommentAuthor, CommentStatus};

	use super::*;

	fn comment(id: &str, cell_id: Option<&str>, status: CommentStatus, text: &str) -> InlineComment {
		InlineComment {
			id: id.to_string(),
			report_id: "report-1".to_string(),
			cell_id: cell_id.map(str::to_string),
			file_id: None,
			author: CommentAuthor {
				id: "u1".to_string(),
				display_name: "Ada <Lovelace>".to_string(),
				avatar_url: None,
			},
			text: text.to_string(),
			status,
			created_at: datetime!(2024-05-01 09:30 UTC),
			replies: Vec::new(),
		}
	}

	#[test]
	fn threads_only_cells_with_comments() {
		let comments = vec![comment("c1", Some("plot"), CommentStatus::Open, "Nice")];

		assert!(cell_thread("table", &comments).is_empty());

		let thread = cell_thread("plot", &comments);

		assert!(thread.starts_with("<aside class=\"inline-comments\" data-cell-id=\"plot\" data-open-count=\"1\">"));
		assert!(thread.contains("<span class=\"author\">Ada &lt;Lovelace&gt;</span>"));
		assert!(thread.contains("<time datetime=\"2024-05-01T09:30:00Z\">2024-05-01 09:30</time>"));
	}

	#[test]
	fn closed_comments_do_not_count_as_open() {
		let mut parent = comment("c1", Some("plot"), CommentStatus::Closed, "Done");

		parent.replies.push(comment("c2", Some("plot"), CommentStatus::Open, "Reopen?"));

		let thread = cell_thread("plot", &[parent]);

		assert!(thread.contains("data-open-count=\"0\""));
		assert!(thread.contains("<div class=\"replies\">"));
		assert!(thread.contains("id=\"comment-c2\""));
	}

	#[test]
	fn comment_bodies_never_carry_raw_html() {
		let comments = vec![comment("c1", None, CommentStatus::ToDo, "<img src=x onerror=alert(1)>")];
		let thread = report_threads(&comments);

		assert!(thread.contains("data-scope=\"report\""));
		assert!(thread.contains("&lt;img src=x onerror=alert(1)&gt;"));
		assert!(thread.contains("class=\"inline-comment status-to_do\""));
	}
}
