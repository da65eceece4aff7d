//! Line-level tracking of fenced code blocks, so text rewrites leave code untouched.

#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
	open: Option<(char, usize)>,
}
impl FenceTracker {
	/// Feeds one line and reports whether it belongs to a fenced block, fence lines included.
	pub(crate) fn observe(&mut self, line: &str) -> bool {
		let trimmed = line.trim_start();
		let indent = line.len() - trimmed.len();
		let marker = fence_marker(trimmed).filter(|_| indent < 4);

		match (self.open, marker) {
			(None, Some(marker)) => {
				self.open = Some(marker);

				true
			},
			(Some((ch, len)), Some((found, found_len)))
				if ch == found && found_len >= len && trimmed.trim_end().chars().all(|c| c == ch) =>
			{
				self.open = None;

				true
			},
			(Some(_), _) => true,
			(None, None) => false,
		}
	}
}

/// Applies `rewrite` to every line outside fenced code blocks.
pub(crate) fn map_outside_code<F>(text: &str, mut rewrite: F) -> String
where
	F: FnMut(&str) -> String,
{
	let mut tracker = FenceTracker::default();
	let mut out = String::with_capacity(text.len());

	for line in text.split_inclusive('\n') {
		if tracker.observe(line) {
			out.push_str(line);
		} else {
			out.push_str(&rewrite(line));
		}
	}

	out
}

fn fence_marker(trimmed: &str) -> Option<(char, usize)> {
	let ch = trimmed.chars().next().filter(|ch| *ch == '`' || *ch == '~')?;
	let len = trimmed.chars().take_while(|c| *c == ch).count();

	(len >= 3).then_some((ch, len))
}
