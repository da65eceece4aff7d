//! Marks occurrences of a search term (the `?highlight=` query parameter) in parsed prose.
//!
//! Marking works on text events, so code, link and image destinations, directive syntax, and raw
//! HTML never see a mark.

use regex::{Regex, RegexBuilder};

use crate::html;

pub const MARK_OPEN: &str = "<mark class=\"kyso-highlight\">";
pub const MARK_CLOSE: &str = "</mark>";

#[derive(Clone, Debug)]
pub struct Highlighter {
	re: Regex,
}
impl Highlighter {
	/// Case-insensitive literal matcher for `term`. Blank terms yield `None`.
	pub fn new(term: Option<&str>) -> Option<Self> {
		let term = term.map(str::trim).filter(|term| !term.is_empty())?;

		match RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build() {
			Ok(re) => Some(Self { re }),
			Err(err) => {
				tracing::warn!(error = %err, "Highlight term could not be compiled.");

				None
			},
		}
	}

	/// Escaped HTML for `text` with every match wrapped, or `None` when nothing matches.
	pub fn mark(&self, text: &str) -> Option<String> {
		let mut out = String::with_capacity(text.len() + MARK_OPEN.len() + MARK_CLOSE.len());
		let mut last = 0;

		for found in self.re.find_iter(text) {
			out.push_str(&html::escape(&text[last..found.start()]));
			out.push_str(MARK_OPEN);
			out.push_str(&html::escape(found.as_str()));
			out.push_str(MARK_CLOSE);

			last = found.end();
		}

		if last == 0 && out.is_empty() {
			return None;
		}

		out.push_str(&html::escape(&text[last..]));

		Some(out)
	}
}
