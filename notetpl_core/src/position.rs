use serde::Serialize;

/// A resolved location inside a template body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
	/// 1-indexed line number.
	pub line: usize,
	/// 1-indexed column, counted in characters.
	pub column: usize,
	/// Byte offset into the template body.
	pub offset: usize,
}

impl Point {
	pub fn new(line: usize, column: usize, offset: usize) -> Self {
		Self {
			line,
			column,
			offset,
		}
	}
}

/// Maps byte offsets produced by the tokenizer back to line and column
/// numbers for diagnostics.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
	source: &'a str,
	/// Byte offset of the first character of every line.
	line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
	pub fn new(source: &'a str) -> Self {
		let line_starts = std::iter::once(0)
			.chain(
				source
					.bytes()
					.enumerate()
					.filter(|(_, byte)| *byte == b'\n')
					.map(|(index, _)| index + 1),
			)
			.collect();

		Self {
			source,
			line_starts,
		}
	}

	/// Resolve a byte offset. Offsets past the end of the source are clamped
	/// to the end.
	pub fn point(&self, offset: usize) -> Point {
		let offset = offset.min(self.source.len());
		let line = self.line_starts.partition_point(|start| *start <= offset);
		let line_start = self.line_starts[line - 1];
		let column = self
			.source
			.get(line_start..offset)
			.map_or(offset - line_start, |prefix| prefix.chars().count())
			+ 1;

		Point::new(line, column, offset)
	}
}
