//! Leading header extraction for Markdown and raw text.
//!
//! Two header conventions are recognised: a block of `key: value` lines at the very top of the
//! document, or a `---` fenced block. The key-value scan consumes every leading header or blank line,
//! so the returned body never starts with another header block and re-running the extraction on it
//! is a no-op.

use std::sync::OnceLock;

use regex::Regex;

const FENCE: &str = "---";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrontMatter<'a> {
	pub headers: Option<String>,
	pub body: &'a str,
}

pub fn extract(text: &str) -> FrontMatter<'_> {
	if let Some(fenced) = extract_fenced(text) {
		return fenced;
	}

	let mut header_lines = Vec::new();
	let mut body_start = text.len();
	let mut offset = 0_usize;

	for line in text.split_inclusive('\n') {
		let trimmed = line.trim_end_matches(['\r', '\n']);

		if trimmed.trim().is_empty() {
			offset += line.len();

			continue;
		}
		if is_header_line(trimmed) {
			header_lines.push(trimmed);

			offset += line.len();

			continue;
		}

		body_start = offset;

		break;
	}

	if header_lines.is_empty() {
		return FrontMatter { headers: None, body: text };
	}

	FrontMatter { headers: Some(header_lines.join("\n")), body: &text[body_start.min(text.len())..] }
}

fn extract_fenced(text: &str) -> Option<FrontMatter<'_>> {
	let mut lines = text.split_inclusive('\n');
	let first = lines.next()?;

	if first.trim_end() != FENCE {
		return None;
	}

	let mut offset = first.len();
	let mut header_lines = Vec::new();

	for line in lines {
		offset += line.len();

		let trimmed = line.trim_end_matches(['\r', '\n']);

		if trimmed.trim_end() == FENCE {
			let body = text[offset..].trim_start_matches(['\r', '\n']);
			let headers = header_lines.join("\n");

			return Some(FrontMatter {
				headers: (!headers.trim().is_empty()).then_some(headers),
				body,
			});
		}

		header_lines.push(trimmed);
	}

	None
}

fn is_header_line(line: &str) -> bool {
	static HEADER: OnceLock<Option<Regex>> = OnceLock::new();

	HEADER
		.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*:(\s.*)?$").ok())
		.as_ref()
		.map(|re| re.is_match(line))
		.unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_key_value_headers_from_body() {
		let extracted = extract("title: X\n\nBody text");

		assert_eq!(extracted.headers.as_deref(), Some("title: X"));
		assert_eq!(extracted.body, "Body text");
	}

	#[test]
	fn extraction_is_idempotent() {
		let first = extract("title: X\nauthor: Y\n\nsummary: Z\n\nBody text\nnote: kept");
		let second = extract(first.body);

		assert_eq!(first.headers.as_deref(), Some("title: X\nauthor: Y\nsummary: Z"));
		assert_eq!(first.body, "Body text\nnote: kept");
		assert_eq!(second.headers, None);
		assert_eq!(second.body, first.body);
	}

	#[test]
	fn plain_text_has_no_headers() {
		let extracted = extract("Body text");

		assert_eq!(extracted, FrontMatter { headers: None, body: "Body text" });
	}

	#[test]
	fn urls_are_not_headers() {
		assert_eq!(extract("https://kyso.io\n").headers, None);
	}

	#[test]
	fn fenced_block_is_extracted() {
		let extracted = extract("---\ntitle: Report\ntags: [a, b]\n---\n\n# Heading\n");

		assert_eq!(extracted.headers.as_deref(), Some("title: Report\ntags: [a, b]"));
		assert_eq!(extracted.body, "# Heading\n");
	}

	#[test]
	fn unterminated_fence_is_body() {
		let extracted = extract("---\ntitle: Report\n");

		assert_eq!(extracted.headers, None);
	}

	#[test]
	fn headers_only_document_has_empty_body() {
		let extracted = extract("title: X\n");

		assert_eq!(extracted.headers.as_deref(), Some("title: X"));
		assert_eq!(extracted.body, "");
	}
}
