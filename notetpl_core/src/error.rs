use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum NoteTemplateError {
	#[error(transparent)]
	#[diagnostic(code(notetpl::io_error))]
	Io(#[from] std::io::Error),

	#[error("template import is not valid JSON: {0}")]
	#[diagnostic(
		code(notetpl::malformed_json),
		help("select a file produced by `notetpl export` or the dashboard's export button")
	)]
	MalformedJson(String),

	#[error("template import must be a JSON object")]
	#[diagnostic(
		code(notetpl::expected_object),
		help("the top level of an exported template is an object with `name` and `content` keys")
	)]
	ExpectedObject,

	#[error("template import is missing required field `{0}`")]
	#[diagnostic(
		code(notetpl::missing_field),
		help("`{0}` must be present and be a non-empty string")
	)]
	MissingRequiredField(&'static str),

	#[error("template field `{field}` is invalid: expected {expected}")]
	#[diagnostic(code(notetpl::invalid_field))]
	InvalidField {
		field: &'static str,
		expected: &'static str,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(notetpl::config_parse),
		help("check that notetpl.toml is valid TOML with [snippets] and/or [check] sections")
	)]
	ConfigParse(String),

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(notetpl::file_too_large),
		help("increase `max_file_size` in notetpl.toml")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("unknown built-in template: `{0}`")]
	#[diagnostic(
		code(notetpl::unknown_builtin),
		help("available built-in templates: soap, dap, narrative")
	)]
	UnknownBuiltin(String),
}

pub type NoteTemplateResult<T> = Result<T, NoteTemplateError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
