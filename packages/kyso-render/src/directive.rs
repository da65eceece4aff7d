//! Container directives: `:::name[label]` … `:::` blocks.
//!
//! Splitting never fails. An opening line that does not parse, or a block that is never closed,
//! stays in the surrounding Markdown as literal text.

use std::sync::OnceLock;

use regex::Regex;

use crate::fences::FenceTracker;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveKind {
	Note,
	Tip,
	Info,
	Warning,
	Danger,
	Custom(String),
}
impl DirectiveKind {
	pub fn from_name(name: &str) -> Self {
		match name.to_ascii_lowercase().as_str() {
			"note" => Self::Note,
			"tip" => Self::Tip,
			"info" => Self::Info,
			"warning" | "caution" => Self::Warning,
			"danger" | "error" => Self::Danger,
			_ => Self::Custom(name.to_string()),
		}
	}

	pub fn name(&self) -> &str {
		match self {
			Self::Note => "note",
			Self::Tip => "tip",
			Self::Info => "info",
			Self::Warning => "warning",
			Self::Danger => "danger",
			Self::Custom(name) => name,
		}
	}

	pub fn is_callout(&self) -> bool {
		!matches!(self, Self::Custom(_))
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
	pub kind: DirectiveKind,
	pub label: Option<String>,
	pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
	Markdown(String),
	Directive(Directive),
}

struct Open {
	kind: DirectiveKind,
	label: Option<String>,
	opening_line: String,
	body: String,
	depth: usize,
}

pub fn split(markdown: &str) -> Vec<Segment> {
	let mut segments = Vec::new();
	let mut prose = String::new();
	let mut open: Option<Open> = None;
	let mut fences = FenceTracker::default();

	for line in markdown.split_inclusive('\n') {
		let in_code = fences.observe(line);

		match open.as_mut() {
			None => {
				let opening = (!in_code).then(|| parse_opening(line)).flatten();

				match opening {
					Some((kind, label)) => {
						open = Some(Open {
							kind,
							label,
							opening_line: line.to_string(),
							body: String::new(),
							depth: 1,
						});
					},
					None => prose.push_str(line),
				}
			},
			Some(current) => {
				if !in_code && is_closing(line) {
					current.depth -= 1;

					if current.depth == 0 {
						if !prose.is_empty() {
							segments.push(Segment::Markdown(std::mem::take(&mut prose)));
						}
						if let Some(done) = open.take() {
							segments.push(Segment::Directive(Directive {
								kind: done.kind,
								label: done.label,
								body: done.body,
							}));
						}

						continue;
					}
				} else if !in_code && parse_opening(line).is_some() {
					current.depth += 1;
				}

				current.body.push_str(line);
			},
		}
	}

	if let Some(unclosed) = open.take() {
		prose.push_str(&unclosed.opening_line);
		prose.push_str(&unclosed.body);
	}
	if !prose.is_empty() {
		segments.push(Segment::Markdown(prose));
	}

	segments
}

fn parse_opening(line: &str) -> Option<(DirectiveKind, Option<String>)> {
	static OPENING: OnceLock<Option<Regex>> = OnceLock::new();

	let re = OPENING
		.get_or_init(|| {
			Regex::new(r"^:::\s*(?P<name>[A-Za-z][\w-]*)(\[(?P<label>[^\]]*)\])?(\{[^}]*\})?\s*$")
				.ok()
		})
		.as_ref()?;
	let caps = re.captures(line.trim_end())?;
	let label = caps
		.name("label")
		.map(|label| label.as_str().trim().to_string())
		.filter(|label| !label.is_empty());

	Some((DirectiveKind::from_name(&caps["name"]), label))
}

fn is_closing(line: &str) -> bool {
	line.trim() == ":::"
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_callouts_from_prose() {
		let segments = split("Intro\n\n:::warning[Heads up]\nCareful **now**.\n:::\nOutro\n");

		assert_eq!(
			segments,
			vec![
				Segment::Markdown("Intro\n\n".to_string()),
				Segment::Directive(Directive {
					kind: DirectiveKind::Warning,
					label: Some("Heads up".to_string()),
					body: "Careful **now**.\n".to_string(),
				}),
				Segment::Markdown("Outro\n".to_string()),
			]
		);
	}

	#[test]
	fn unclosed_directive_degrades_to_text() {
		let input = ":::note\nNever closed\n";

		assert_eq!(split(input), vec![Segment::Markdown(input.to_string())]);
	}

	#[test]
	fn malformed_opening_is_text() {
		let input = "::: 42\nbody\n:::\n";

		assert_eq!(split(input), vec![Segment::Markdown(input.to_string())]);
	}

	#[test]
	fn nested_directives_stay_in_the_outer_body() {
		let segments = split(":::note\n:::tip\ninner\n:::\nouter\n:::\n");

		assert_eq!(
			segments,
			vec![Segment::Directive(Directive {
				kind: DirectiveKind::Note,
				label: None,
				body: ":::tip\ninner\n:::\nouter\n".to_string(),
			})]
		);
	}

	#[test]
	fn ignores_markers_inside_code() {
		let input = "```\n:::note\n```\n";

		assert_eq!(split(input), vec![Segment::Markdown(input.to_string())]);
	}

	#[test]
	fn unknown_names_are_custom() {
		assert_eq!(DirectiveKind::from_name("Quiz"), DirectiveKind::Custom("Quiz".to_string()));
		assert!(!DirectiveKind::from_name("quiz").is_callout());
	}
}
