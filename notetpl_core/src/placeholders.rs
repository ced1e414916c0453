use std::collections::HashSet;
use std::ops::Range;

use serde::Serialize;

use crate::lexer::find_matches;
use crate::patterns::Syntax;

/// Which syntax a placeholder was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
	Tag,
	Variable,
}

/// A single occurrence of a placeholder in a template body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placeholder<'a> {
	pub kind: PlaceholderKind,
	/// The name an author fills in. Tag names keep their internal spaces;
	/// variable names are trimmed and never include filters.
	pub name: &'a str,
	/// The full `<...>` or `{{ ... }}` source text.
	pub source: &'a str,
	pub start: usize,
	pub end: usize,
}

impl Placeholder<'_> {
	pub fn span(&self) -> Range<usize> {
		self.start..self.end
	}
}

/// Every tag occurrence followed by every variable occurrence.
///
/// The two syntaxes are scanned independently, so a tag written inside a
/// variable expression (or the reverse) is still reported.
pub fn placeholder_occurrences(content: &str) -> Vec<Placeholder<'_>> {
	let tags = find_matches(content, Syntax::Tag).filter_map(|token| {
		Some(Placeholder {
			kind: PlaceholderKind::Tag,
			name: token.placeholder_name()?,
			source: token.value,
			start: token.start,
			end: token.end,
		})
	});
	let variables = find_matches(content, Syntax::Variable).filter_map(|token| {
		Some(Placeholder {
			kind: PlaceholderKind::Variable,
			name: token.placeholder_name()?,
			source: token.value,
			start: token.start,
			end: token.end,
		})
	});

	tags.chain(variables).collect()
}

/// The distinct placeholder names referenced by a template body, in first
/// seen order (tags before variables).
///
/// ```rust
/// use notetpl_core::extract_placeholders;
///
/// let names = extract_placeholders("<Findings> {{ items | bullet_list }} {{ items }}");
/// assert_eq!(names, vec!["Findings", "items"]);
/// ```
pub fn extract_placeholders(content: &str) -> Vec<&str> {
	let mut seen = HashSet::new();
	let names: Vec<&str> = placeholder_occurrences(content)
		.into_iter()
		.map(|placeholder| placeholder.name)
		.filter(|name| seen.insert(*name))
		.collect();
	tracing::trace!(placeholders = names.len(), "extracted placeholders");

	names
}
