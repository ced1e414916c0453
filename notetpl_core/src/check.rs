use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

use crate::lexer::tokenize;
use crate::patterns::BlockKeyword;
use crate::placeholders::placeholder_occurrences;
use crate::template::TemplateRecord;
use crate::tokens::TokenKind;

/// Which findings [`check_template`] reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
	/// Don't report placeholders that have no declared variable.
	pub ignore_undeclared: bool,
	/// Don't report declared variables the content never references.
	pub ignore_unused: bool,
}

/// A problem found while checking a template against its declared
/// variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum TemplateDiagnostic {
	/// The content references a placeholder with no declared variable.
	Undeclared { name: String, offset: usize },
	/// A declared variable is never referenced by the content.
	Unused { name: String },
	/// The same variable name is declared more than once.
	DuplicateVariable { name: String },
	/// A `{% ... %}` fragment that isn't a recognized block statement and is
	/// treated as plain text.
	UnrecognizedBlock { keyword: String, offset: usize },
	/// A `{%` fragment that starts with a recognized keyword but never forms a
	/// complete `{% ... %}` statement, so it stays plain text.
	IncompleteBlock { keyword: String, offset: usize },
}

impl TemplateDiagnostic {
	/// Unused and duplicate declarations are warnings; everything else is an
	/// error.
	pub fn is_error(&self) -> bool {
		matches!(
			self,
			Self::Undeclared { .. }
				| Self::UnrecognizedBlock { .. }
				| Self::IncompleteBlock { .. }
		)
	}

	pub fn offset(&self) -> Option<usize> {
		match self {
			Self::Undeclared { offset, .. }
			| Self::UnrecognizedBlock { offset, .. }
			| Self::IncompleteBlock { offset, .. } => Some(*offset),
			Self::Unused { .. } | Self::DuplicateVariable { .. } => None,
		}
	}
}

impl Display for TemplateDiagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Undeclared { name, .. } => {
				write!(f, "placeholder `{name}` has no declared variable")
			}
			Self::Unused { name } => write!(f, "variable `{name}` is never referenced"),
			Self::DuplicateVariable { name } => {
				write!(f, "variable `{name}` is declared more than once")
			}
			Self::UnrecognizedBlock { keyword, .. } if keyword.is_empty() => {
				write!(f, "`{{%` does not open a recognized block statement")
			}
			Self::UnrecognizedBlock { keyword, .. } => {
				write!(f, "`{{% {keyword}` does not open a recognized block statement")
			}
			Self::IncompleteBlock { keyword, .. } => {
				write!(f, "`{{% {keyword}` is not a complete block statement")
			}
		}
	}
}

/// The result of checking a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateCheck {
	pub diagnostics: Vec<TemplateDiagnostic>,
}

impl TemplateCheck {
	/// Returns true when nothing at all was reported.
	pub fn is_ok(&self) -> bool {
		self.diagnostics.is_empty()
	}

	pub fn has_errors(&self) -> bool {
		self.diagnostics.iter().any(TemplateDiagnostic::is_error)
	}
}

/// Compare the placeholders a template references with the variables it
/// declares, and flag `{% %}` fragments the highlighter won't recognize.
///
/// Block statements are not checked for `if`/`endif` pairing or nesting.
pub fn check_template(template: &TemplateRecord, options: &CheckOptions) -> TemplateCheck {
	let mut diagnostics = vec![];

	let mut declared: HashMap<&str, usize> = HashMap::new();
	for variable in &template.variables {
		*declared.entry(variable.name.as_str()).or_default() += 1;
	}

	let mut reported = HashSet::new();
	for variable in &template.variables {
		let name = variable.name.as_str();
		if declared[name] > 1 && reported.insert(name) {
			diagnostics.push(TemplateDiagnostic::DuplicateVariable {
				name: name.to_string(),
			});
		}
	}

	let occurrences = placeholder_occurrences(&template.content);
	let referenced: HashSet<&str> = occurrences.iter().map(|occurrence| occurrence.name).collect();

	if !options.ignore_undeclared {
		let mut seen = HashSet::new();
		for occurrence in &occurrences {
			if !declared.contains_key(occurrence.name) && seen.insert(occurrence.name) {
				diagnostics.push(TemplateDiagnostic::Undeclared {
					name: occurrence.name.to_string(),
					offset: occurrence.start,
				});
			}
		}
	}

	if !options.ignore_unused {
		let mut seen = HashSet::new();
		for variable in &template.variables {
			let name = variable.name.as_str();
			if !referenced.contains(name) && seen.insert(name) {
				diagnostics.push(TemplateDiagnostic::Unused {
					name: name.to_string(),
				});
			}
		}
	}

	diagnostics.extend(unrecognized_blocks(&template.content));
	tracing::debug!(
		name = %template.name,
		diagnostics = diagnostics.len(),
		"checked template"
	);

	TemplateCheck { diagnostics }
}

/// `{%` fragments left inside text tokens.
fn unrecognized_blocks(content: &str) -> Vec<TemplateDiagnostic> {
	tokenize(content)
		.into_iter()
		.filter(|token| token.kind == TokenKind::Text)
		.flat_map(|token| {
			token.value.match_indices("{%").map(move |(index, _)| {
				let rest = token.value[index + 2..].trim_start();
				let offset = token.start + index;

				if let Some((keyword, _)) = BlockKeyword::parse_prefix(rest) {
					return TemplateDiagnostic::IncompleteBlock {
						keyword: keyword.to_string(),
						offset,
					};
				}

				let keyword = rest
					.split(|c: char| !(c.is_alphanumeric() || c == '_'))
					.next()
					.unwrap_or_default();

				TemplateDiagnostic::UnrecognizedBlock {
					keyword: keyword.to_string(),
					offset,
				}
			})
		})
		.collect()
}
