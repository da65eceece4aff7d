//! Relative image paths point into the report's own files; rewrite them to content-store URLs.

use std::{borrow::Cow, sync::OnceLock};

use regex::{Captures, Regex};

use kyso_domain::ReportContext;

use crate::fences;

/// Rewrites Markdown images and HTML `<img src>` attributes that use relative paths.
pub fn rewrite_relative_images(markdown: &str, context: &ReportContext, prefix: &str) -> String {
	let patterns = patterns();

	fences::map_outside_code(markdown, |line| {
		let mut line = Cow::Borrowed(line);

		for re in patterns {
			let rewritten = match re.replace_all(&line, |caps: &Captures<'_>| {
				let url = &caps["url"];
				let resolved = resolve(url, context, prefix).unwrap_or_else(|| url.to_string());

				format!("{}{resolved}{}", &caps["head"], &caps["tail"])
			}) {
				Cow::Owned(rewritten) => Some(rewritten),
				Cow::Borrowed(_) => None,
			};

			if let Some(rewritten) = rewritten {
				line = Cow::Owned(rewritten);
			}
		}

		line.into_owned()
	})
}

/// Returns the content-store URL for a relative path, or `None` when the URL is absolute.
pub fn resolve(url: &str, context: &ReportContext, prefix: &str) -> Option<String> {
	is_relative(url).then(|| context.content_url(prefix, url))
}

pub fn is_relative(url: &str) -> bool {
	let url = url.trim();

	if url.is_empty() || url.starts_with('/') || url.starts_with('#') {
		return false;
	}

	!has_scheme(url)
}

fn has_scheme(url: &str) -> bool {
	let Some((scheme, _)) = url.split_once(':') else {
		return false;
	};
	let mut chars = scheme.chars();

	chars.next().map(|ch| ch.is_ascii_alphabetic()).unwrap_or(false)
		&& chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'))
}

fn patterns() -> &'static [Regex] {
	static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

	PATTERNS.get_or_init(|| {
		[
			r#"(?P<head>!\[[^\]]*\]\(\s*)(?P<url>[^)\s]+)(?P<tail>(\s+"[^"]*")?\s*\))"#,
			r#"(?i)(?P<head><img\b[^>]*?\bsrc\s*=\s*")(?P<url>[^"]*)(?P<tail>")"#,
			r"(?i)(?P<head><img\b[^>]*?\bsrc\s*=\s*')(?P<url>[^']*)(?P<tail>')",
		]
		.into_iter()
		.filter_map(|pattern| Regex::new(pattern).ok())
		.collect()
	})
}
