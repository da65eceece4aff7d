//! Escaping and raw-HTML cleanup shared by every renderer.

use std::sync::OnceLock;

use regex::Regex;

pub fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for ch in text.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(ch),
		}
	}

	out
}

/// Removes script elements, stray script tags, inline event handlers, and `javascript:` URLs.
pub fn sanitize(raw: &str) -> String {
	let patterns = sanitize_patterns();
	let mut out = raw.to_string();

	for (re, replacement) in patterns {
		out = re.replace_all(&out, *replacement).into_owned();
	}

	out
}

pub fn strip_ansi(text: &str) -> String {
	static ANSI: OnceLock<Option<Regex>> = OnceLock::new();

	match ANSI.get_or_init(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").ok()) {
		Some(re) => re.replace_all(text, "").into_owned(),
		None => text.to_string(),
	}
}

pub fn collapse_whitespace(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sanitize_patterns() -> &'static [(Regex, &'static str)] {
	static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

	PATTERNS.get_or_init(|| {
		[
			(r"(?is)<script\b[^>]*>.*?</script\s*>", ""),
			(r"(?i)</?script\b[^>]*>", ""),
			(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#, ""),
			(r#"(?i)\b(href|src)\s*=\s*"\s*javascript:[^"]*""#, "$1=\"#\""),
			(r"(?i)\b(href|src)\s*=\s*'\s*javascript:[^']*'", "$1=\"#\""),
		]
		.into_iter()
		.filter_map(|(pattern, replacement)| match Regex::new(pattern) {
			Ok(re) => Some((re, replacement)),
			Err(err) => {
				tracing::error!(error = %err, pattern, "Invalid sanitize pattern.");

				None
			},
		})
		.collect()
	})
}
