use std::fmt::Display;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::NoteTemplateError;
use crate::NoteTemplateResult;
use crate::template::ImportedTemplate;
use crate::template::TemplateRecord;
use crate::template::TemplateType;
use crate::template::TemplateVariable;
use crate::template::default_version;

/// The interchange shape of an exported template: the record fields plus the
/// moment of export.
///
/// Keys are written in a fixed order: `name`, `description`,
/// `template_type`, `content`, `variables`, `version`, `exported_at`.
#[derive(Debug, Clone, Copy)]
pub struct ExportEnvelope<'a> {
	pub template: &'a TemplateRecord,
	pub exported_at: DateTime<Utc>,
}

impl<'a> ExportEnvelope<'a> {
	/// Stamp `template` with the current time.
	pub fn new(template: &'a TemplateRecord) -> Self {
		Self::at(template, Utc::now())
	}

	pub fn at(template: &'a TemplateRecord, exported_at: DateTime<Utc>) -> Self {
		Self {
			template,
			exported_at,
		}
	}

	/// `exported_at` in ISO-8601 with millisecond precision, e.g.
	/// `2024-01-01T00:00:00.000Z`.
	pub fn timestamp(&self) -> String {
		self.exported_at.to_rfc3339_opts(SecondsFormat::Millis, true)
	}

	pub fn to_value(&self) -> Value {
		let template = self.template;

		serde_json::json!({
			"name": template.name,
			"description": template.description,
			"template_type": template.template_type,
			"content": template.content,
			"variables": template.variables,
			"version": template.version,
			"exported_at": self.timestamp(),
		})
	}
}

impl Display for ExportEnvelope<'_> {
	/// Pretty-printed JSON with two space indentation.
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:#}", self.to_value())
	}
}

/// Serialize a template for download. `exported_at` is always the time of
/// this call.
pub fn export_template(template: &TemplateRecord) -> String {
	ExportEnvelope::new(template).to_string()
}

/// Parse and validate an exported template supplied by a user.
///
/// `name` and `content` must be non-empty strings. Missing optional fields
/// (or `null`, an empty string, or a zero version) take their defaults:
/// an empty description, the `custom` type, no variables and version `1`.
/// A present `exported_at` is ignored and never part of the result.
///
/// ```rust
/// use notetpl_core::TemplateType;
/// use notetpl_core::parse_template_import;
///
/// let record = parse_template_import(r#"{"name":"T","content":"C"}"#).unwrap();
/// assert_eq!(record.template_type, TemplateType::Custom);
/// assert_eq!(record.version, 1);
/// assert!(parse_template_import("not json").is_err());
/// ```
pub fn parse_template_import(text: &str) -> NoteTemplateResult<ImportedTemplate> {
	let result = import_document(text);

	match &result {
		Ok(template) => {
			tracing::debug!(name = %template.name, version = template.version, "imported template");
		}
		Err(error) => tracing::warn!(%error, "rejected template import"),
	}

	result
}

fn import_document(text: &str) -> NoteTemplateResult<TemplateRecord> {
	let document: Value =
		serde_json::from_str(text).map_err(|e| NoteTemplateError::MalformedJson(e.to_string()))?;
	let Value::Object(fields) = document else {
		return Err(NoteTemplateError::ExpectedObject);
	};

	let name = required_string(&fields, "name")?;
	let content = required_string(&fields, "content")?;
	let description = optional_string(&fields, "description")?.unwrap_or_default();
	let template_type = match optional_string(&fields, "template_type")? {
		Some(value) => value.parse().map_err(|_| NoteTemplateError::InvalidField {
			field: "template_type",
			expected: "one of `soap`, `dap`, `narrative` or `custom`",
		})?,
		None => TemplateType::default(),
	};
	let variables = parse_variables(fields.get("variables"))?;
	let version = parse_version(fields.get("version"))?;

	Ok(TemplateRecord {
		name,
		description,
		template_type,
		content,
		variables,
		version,
	})
}

fn required_string(fields: &Map<String, Value>, key: &'static str) -> NoteTemplateResult<String> {
	match fields.get(key) {
		Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
		_ => Err(NoteTemplateError::MissingRequiredField(key)),
	}
}

fn optional_string(
	fields: &Map<String, Value>,
	key: &'static str,
) -> NoteTemplateResult<Option<String>> {
	match fields.get(key) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(value)) if value.is_empty() => Ok(None),
		Some(Value::String(value)) => Ok(Some(value.clone())),
		Some(_) => {
			Err(NoteTemplateError::InvalidField {
				field: key,
				expected: "a string",
			})
		}
	}
}

fn parse_variables(value: Option<&Value>) -> NoteTemplateResult<Vec<TemplateVariable>> {
	let invalid = || {
		NoteTemplateError::InvalidField {
			field: "variables",
			expected: "an array of objects with a string `name`",
		}
	};

	match value {
		None | Some(Value::Null) => Ok(vec![]),
		Some(Value::Array(items)) => {
			items
				.iter()
				.map(|item| TemplateVariable::deserialize(item).map_err(|_| invalid()))
				.collect()
		}
		Some(_) => Err(invalid()),
	}
}

fn parse_version(value: Option<&Value>) -> NoteTemplateResult<u32> {
	let invalid = NoteTemplateError::InvalidField {
		field: "version",
		expected: "a positive integer",
	};

	match value {
		None | Some(Value::Null) => Ok(default_version()),
		Some(Value::Number(number)) => {
			match number.as_u64() {
				Some(0) => Ok(default_version()),
				Some(version) => u32::try_from(version).map_err(|_| invalid),
				None => Err(invalid),
			}
		}
		Some(_) => Err(invalid),
	}
}
