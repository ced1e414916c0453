//! `notetpl_core` is the core library for notetpl, the clinical note template
//! toolkit. It tokenizes template bodies for highlighting, extracts the
//! placeholders an author has to fill in, and moves templates in and out of
//! the portable JSON interchange format.
//!
//! ## Template Syntax
//!
//! A template body mixes free text with two placeholder syntaxes:
//!
//! ```text
//! Chief Complaint: <Chief Complaint>
//! {% if findings %}
//! {{ findings | bullet_list }}
//! {% endif %}
//! ```
//!
//! - Tags: `<Name>`, a letter followed by letters, digits and spaces.
//! - Variable expressions: `{{ name }}`, optionally with a `| filter` chain.
//! - Block statements: `{% if ... %}`, `{% for ... %}`, `{% else %}`,
//!   `{% elif ... %}`, `{% endif %}` and `{% endfor %}`. These are highlighted
//!   only; nothing is evaluated.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template body
//!   → Lexer (logos raw tokens over `<` and `{`)
//!   → Pattern matchers (anchored tag / variable / block recognizers)
//!   → Token stream (contiguous Text | Tag | VariableExpr | BlockStatement)
//!   → Placeholder extractor (distinct tag and variable names)
//! ```
//!
//! ## Key Types
//!
//! - [`Token`]: a classified, position-accurate slice of the template body.
//! - [`TemplateRecord`]: the fields of a template that travel through import
//!   and export.
//! - [`ExportEnvelope`]: the JSON interchange shape.
//! - [`NoteTemplateConfig`]: configuration loaded from `notetpl.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use notetpl_core::TemplateRecord;
//! use notetpl_core::export_template;
//! use notetpl_core::extract_placeholders;
//! use notetpl_core::parse_template_import;
//! use notetpl_core::tokenize;
//!
//! let content = "The <Patient Name> was seen for {{ reason | lower }}.";
//! assert_eq!(tokenize(content).len(), 5);
//! assert_eq!(extract_placeholders(content), vec!["Patient Name", "reason"]);
//!
//! let record = TemplateRecord::new("Visit", content);
//! let imported = parse_template_import(&export_template(&record)).unwrap();
//! assert_eq!(imported, record);
//! ```

pub use catalog::*;
pub use check::*;
pub use codec::*;
pub use config::*;
pub use error::*;
pub use lexer::*;
pub use patterns::BlockKeyword;
pub use patterns::Syntax;
pub use placeholders::*;
pub use position::*;
pub use template::*;
pub use tokens::*;

mod catalog;
mod check;
mod codec;
pub mod config;
#[allow(unused_assignments)]
mod error;
mod lexer;
pub mod patterns;
mod placeholders;
mod position;
mod template;
mod tokens;

#[cfg(test)]
mod __fixtures;
