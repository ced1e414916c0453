use std::ops::Range;

use logos::Logos;

use crate::patterns::Matcher;
use crate::patterns::Syntax;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// Raw tokens produced by logos. Only the characters that can open a
/// placeholder are split out; everything else is a run of plain text.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
	#[token("<")]
	AngleOpen,
	#[token("{")]
	BraceOpen,
	#[regex(r"[^<{]+")]
	Text,
}

/// Walks the logos token stream, anchoring the placeholder matchers at every
/// opening character and collecting the matches plus the text between them.
struct TokenWalker<'a> {
	/// The template body being scanned.
	source: &'a str,
	/// The collected raw tokens and their byte spans.
	raw_tokens: Vec<(Result<RawToken, ()>, Range<usize>)>,
	/// Current index into `raw_tokens`.
	cursor: usize,
	/// Start of the text run that hasn't been emitted yet.
	text_start: usize,
	/// Syntaxes this walk recognizes.
	enabled: &'a [Syntax],
	matcher: Matcher<'a>,
	tokens: Vec<Token<'a>>,
}

impl<'a> TokenWalker<'a> {
	fn new(source: &'a str, enabled: &'a [Syntax]) -> Self {
		let raw_tokens: Vec<_> = RawToken::lexer(source).spanned().collect();

		Self {
			source,
			raw_tokens,
			cursor: 0,
			text_start: 0,
			enabled,
			matcher: Matcher::new(source),
			tokens: vec![],
		}
	}

	/// Emit the pending text run up to `end`, if it isn't empty.
	fn push_text(&mut self, end: usize) {
		if end > self.text_start {
			self.tokens
				.push(Token::new(TokenKind::Text, self.source, self.text_start..end));
		}
	}

	/// Emit a placeholder match and skip every raw token it covers. Raw text
	/// tokens that straddle `end` never contain an opening character, so
	/// nothing is lost by skipping them whole.
	fn push_match(&mut self, syntax: Syntax, span: Range<usize>) {
		self.push_text(span.start);

		let kind = match syntax {
			Syntax::Tag => TokenKind::Tag,
			Syntax::Variable => TokenKind::VariableExpr,
			Syntax::Block => TokenKind::BlockStatement,
		};
		self.tokens.push(Token::new(kind, self.source, span.clone()));
		self.text_start = span.end;

		while self
			.raw_tokens
			.get(self.cursor)
			.is_some_and(|(_, raw_span)| raw_span.start < span.end)
		{
			self.cursor += 1;
		}
	}

	fn process(&mut self) {
		while self.cursor < self.raw_tokens.len() {
			let (result, span) = &self.raw_tokens[self.cursor];
			let start = span.start;

			let candidate = match result {
				Ok(RawToken::AngleOpen | RawToken::BraceOpen) => {
					self.matcher.match_at(start, self.enabled)
				}
				// Text runs and unrecognized bytes can't open a placeholder.
				Ok(RawToken::Text) | Err(()) => None,
			};

			match candidate {
				Some((syntax, end)) => self.push_match(syntax, start..end),
				None => self.cursor += 1,
			}
		}

		self.push_text(self.source.len());
	}
}

fn walk<'a>(content: &'a str, enabled: &'a [Syntax]) -> Vec<Token<'a>> {
	let mut walker = TokenWalker::new(content, enabled);
	walker.process();
	walker.tokens
}

/// Split a template body into an ordered, gap-free token stream.
///
/// Tags, variable expressions and block statements become their own tokens;
/// every other span becomes a single [`TokenKind::Text`] token. Concatenating
/// the token values reproduces `content` exactly, and an empty body yields no
/// tokens. Tokenizing never fails: incomplete placeholders degrade to text.
///
/// ```rust
/// use notetpl_core::TokenKind;
/// use notetpl_core::tokenize;
///
/// let tokens = tokenize("Hello {{ name }}!");
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[1].kind, TokenKind::VariableExpr);
/// assert_eq!(tokens[1].value, "{{ name }}");
/// assert_eq!(tokens[1].span(), 6..16);
/// ```
pub fn tokenize(content: &str) -> Vec<Token<'_>> {
	let tokens = walk(content, &Syntax::ALL);
	tracing::trace!(bytes = content.len(), tokens = tokens.len(), "tokenized template");

	tokens
}

/// Find every non-overlapping match of a single syntax, scanning left to
/// right as if no other syntax existed.
pub fn find_matches(content: &str, syntax: Syntax) -> impl Iterator<Item = Token<'_>> {
	let enabled: &'static [Syntax] = match syntax {
		Syntax::Tag => &[Syntax::Tag],
		Syntax::Variable => &[Syntax::Variable],
		Syntax::Block => &[Syntax::Block],
	};

	walk(content, enabled)
		.into_iter()
		.filter(|token| token.kind != TokenKind::Text)
}
