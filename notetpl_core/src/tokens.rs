use std::fmt::Display;
use std::ops::Range;

use serde::Serialize;

use crate::patterns::BlockKeyword;
use crate::patterns::split_variable;

/// The classification of a span of template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	/// Free text, including any `<`, `{{` or `{%` fragments that don't form
	/// a complete placeholder.
	Text,
	/// `<Chief Complaint>`
	Tag,
	/// `{{ findings | bullet_list }}`
	VariableExpr,
	/// `{% if findings %}`
	BlockStatement,
}

impl TokenKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Tag => "tag",
			Self::VariableExpr => "variable_expr",
			Self::BlockStatement => "block_statement",
		}
	}

	/// Tags and variable expressions are the things an author fills in.
	pub fn is_placeholder(self) -> bool {
		matches!(self, Self::Tag | Self::VariableExpr)
	}
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// A contiguous slice of a template body.
///
/// `start` and `end` are half-open byte offsets into the tokenized source and
/// `value` is exactly `&source[start..end]`. Tokens returned by
/// [`tokenize`](crate::tokenize) cover the whole source without gaps or
/// overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
	pub kind: TokenKind,
	pub value: &'a str,
	pub start: usize,
	pub end: usize,
}

impl<'a> Token<'a> {
	pub(crate) fn new(kind: TokenKind, source: &'a str, span: Range<usize>) -> Self {
		Self {
			kind,
			value: &source[span.clone()],
			start: span.start,
			end: span.end,
		}
	}

	pub fn span(&self) -> Range<usize> {
		self.start..self.end
	}

	pub fn len(&self) -> usize {
		self.end - self.start
	}

	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// The name an author fills in for this token.
	///
	/// Tags yield the text between the angle brackets verbatim. Variable
	/// expressions yield the trimmed identifier before the first `|`.
	pub fn placeholder_name(&self) -> Option<&'a str> {
		match self.kind {
			TokenKind::Tag => self.value.strip_prefix('<')?.strip_suffix('>'),
			TokenKind::VariableExpr => Some(split_variable(self.value)?.0),
			TokenKind::Text | TokenKind::BlockStatement => None,
		}
	}

	/// Filter names applied to a variable expression, in order.
	pub fn filters(&self) -> Vec<&'a str> {
		if self.kind != TokenKind::VariableExpr {
			return vec![];
		}

		split_variable(self.value)
			.and_then(|(_, chain)| chain)
			.map(|chain| {
				chain
					.split('|')
					.map(str::trim)
					.filter(|name| !name.is_empty())
					.collect()
			})
			.unwrap_or_default()
	}

	/// The control keyword that opens a block statement.
	pub fn block_keyword(&self) -> Option<BlockKeyword> {
		if self.kind != TokenKind::BlockStatement {
			return None;
		}

		let inner = self.value.strip_prefix("{%")?;
		BlockKeyword::parse_prefix(inner.trim_start()).map(|(keyword, _)| keyword)
	}
}

impl Display for Token<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.value)
	}
}
