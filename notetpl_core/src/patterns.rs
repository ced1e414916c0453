//! Recognizers for the three placeholder syntaxes.
//!
//! Each matcher is anchored at a candidate opening delimiter and returns the
//! exclusive end offset of the match. Matchers stop at the nearest closing
//! delimiter, so a match never extends past the first `>`, `}` or `%` that
//! could end it.

use std::fmt::Display;

use serde::Serialize;

/// One of the three surface syntaxes a template may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
	/// `<` letter, letters/digits/spaces, `>`.
	Tag,
	/// `{{ name }}` or `{{ name | filter }}`.
	Variable,
	/// `{% keyword ... %}` with a recognized keyword.
	Block,
}

impl Syntax {
	pub const ALL: [Syntax; 3] = [Syntax::Tag, Syntax::Variable, Syntax::Block];
}

/// The closed set of control keywords a block statement may open with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKeyword {
	If,
	For,
	Endif,
	Endfor,
	Else,
	Elif,
}

impl BlockKeyword {
	pub const ALL: [BlockKeyword; 6] = [
		BlockKeyword::If,
		BlockKeyword::For,
		BlockKeyword::Endif,
		BlockKeyword::Endfor,
		BlockKeyword::Else,
		BlockKeyword::Elif,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::If => "if",
			Self::For => "for",
			Self::Endif => "endif",
			Self::Endfor => "endfor",
			Self::Else => "else",
			Self::Elif => "elif",
		}
	}

	/// Match a keyword at the start of `text`, returning the keyword and its
	/// byte length. No word boundary is required after the keyword.
	pub fn parse_prefix(text: &str) -> Option<(Self, usize)> {
		Self::ALL
			.into_iter()
			.find(|keyword| text.starts_with(keyword.as_str()))
			.map(|keyword| (keyword, keyword.as_str().len()))
	}
}

impl Display for BlockKeyword {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Split a complete `{{ ... }}` expression into its trimmed name and the raw
/// filter chain following the first `|`.
pub fn split_variable(value: &str) -> Option<(&str, Option<&str>)> {
	let inner = value.strip_prefix("{{")?.strip_suffix("}}")?;
	let (name, chain) = match inner.split_once('|') {
		Some((name, chain)) => (name, Some(chain)),
		None => (inner, None),
	};

	Some((name.trim(), chain))
}

/// Memoized forward search for a single byte.
///
/// Scanning only moves forward, so once the next occurrence after some
/// offset is known it answers every later query up to that occurrence.
/// This keeps repeated failed matches (e.g. a long run of `{{` with no
/// closing brace) linear.
#[derive(Debug)]
struct NextByte {
	byte: u8,
	from: usize,
	found: Option<Option<usize>>,
}

impl NextByte {
	fn new(byte: u8) -> Self {
		Self {
			byte,
			from: 0,
			found: None,
		}
	}

	fn find(&mut self, haystack: &[u8], from: usize) -> Option<usize> {
		if let Some(found) = self.found {
			if from >= self.from && found.is_none_or(|at| from <= at) {
				return found;
			}
		}

		let found = haystack
			.get(from..)
			.and_then(|rest| rest.iter().position(|byte| *byte == self.byte))
			.map(|index| index + from);
		self.from = from;
		self.found = Some(found);

		found
	}
}

/// Anchored matchers over a single template body.
#[derive(Debug)]
pub(crate) struct Matcher<'a> {
	bytes: &'a [u8],
	source: &'a str,
	closing_brace: NextByte,
	pipe: NextByte,
	percent: NextByte,
}

impl<'a> Matcher<'a> {
	pub(crate) fn new(source: &'a str) -> Self {
		Self {
			bytes: source.as_bytes(),
			source,
			closing_brace: NextByte::new(b'}'),
			pipe: NextByte::new(b'|'),
			percent: NextByte::new(b'%'),
		}
	}

	/// Try every enabled syntax at `start`. The opening delimiters `<`, `{{`
	/// and `{%` are disjoint, so at most one syntax can apply.
	pub(crate) fn match_at(&mut self, start: usize, enabled: &[Syntax]) -> Option<(Syntax, usize)> {
		let syntax = match self.bytes.get(start..start + 2)? {
			[b'<', _] => Syntax::Tag,
			[b'{', b'{'] => Syntax::Variable,
			[b'{', b'%'] => Syntax::Block,
			_ => return None,
		};

		if !enabled.contains(&syntax) {
			return None;
		}

		let end = match syntax {
			Syntax::Tag => self.tag(start),
			Syntax::Variable => self.variable(start),
			Syntax::Block => self.block(start),
		}?;

		Some((syntax, end))
	}

	/// `<` + ASCII letter + `[A-Za-z0-9 ]*` + `>`.
	fn tag(&self, start: usize) -> Option<usize> {
		if !self.bytes.get(start + 1)?.is_ascii_alphabetic() {
			return None;
		}

		let mut cursor = start + 2;
		while let Some(&byte) = self.bytes.get(cursor) {
			match byte {
				b'>' => return Some(cursor + 1),
				b' ' => cursor += 1,
				_ if byte.is_ascii_alphanumeric() => cursor += 1,
				_ => return None,
			}
		}

		None
	}

	/// `{{` + a name that doesn't start with `}` or `|` + an optional `|`
	/// filter chain of at least one character + `}}`.
	fn variable(&mut self, start: usize) -> Option<usize> {
		let inner = start + 2;
		if matches!(self.bytes.get(inner)?, b'}' | b'|') {
			return None;
		}

		let close = self.closing_brace.find(self.bytes, inner)?;
		if self.bytes.get(close + 1) != Some(&b'}') {
			return None;
		}

		if let Some(pipe) = self.pipe.find(self.bytes, inner) {
			// an empty filter chain is not a filter
			if pipe + 1 == close {
				return None;
			}
		}

		Some(close + 2)
	}

	/// `{%` + optional whitespace + keyword + anything except `%` + `%}`.
	fn block(&mut self, start: usize) -> Option<usize> {
		let inner = start + 2;
		let rest = self.source.get(inner..)?;
		BlockKeyword::parse_prefix(rest.trim_start())?;

		let percent = self.percent.find(self.bytes, inner)?;
		if self.bytes.get(percent + 1) != Some(&b'}') {
			return None;
		}

		Some(percent + 2)
	}
}
