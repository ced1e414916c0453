use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::placeholders::extract_placeholders;

/// The note layout a template produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
	/// Subjective, Objective, Assessment, Plan.
	Soap,
	/// Data, Assessment, Plan.
	Dap,
	/// Free-form narrative.
	Narrative,
	#[default]
	Custom,
}

impl TemplateType {
	pub const ALL: [TemplateType; 4] = [
		TemplateType::Soap,
		TemplateType::Dap,
		TemplateType::Narrative,
		TemplateType::Custom,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Soap => "soap",
			Self::Dap => "dap",
			Self::Narrative => "narrative",
			Self::Custom => "custom",
		}
	}
}

impl Display for TemplateType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when a string isn't one of the known template types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplateType(pub String);

impl Display for UnknownTemplateType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "unknown template type `{}`", self.0)
	}
}

impl std::error::Error for UnknownTemplateType {}

impl FromStr for TemplateType {
	type Err = UnknownTemplateType;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|template_type| template_type.as_str() == value)
			.ok_or_else(|| UnknownTemplateType(value.to_string()))
	}
}

/// A variable the template author declares for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVariable {
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub required: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_value: Option<String>,
}

impl TemplateVariable {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			required: false,
			default_value: None,
		}
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	#[must_use]
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	#[must_use]
	pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
		self.default_value = Some(default_value.into());
		self
	}
}

/// The parts of a stored template that travel through import and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub template_type: TemplateType,
	pub content: String,
	#[serde(default)]
	pub variables: Vec<TemplateVariable>,
	#[serde(default = "default_version")]
	pub version: u32,
}

/// A normalized import. Imports never carry the export timestamp.
pub type ImportedTemplate = TemplateRecord;

pub(crate) fn default_version() -> u32 {
	1
}

impl TemplateRecord {
	/// A record with every optional field at its default.
	pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			template_type: TemplateType::default(),
			content: content.into(),
			variables: vec![],
			version: default_version(),
		}
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	#[must_use]
	pub fn with_type(mut self, template_type: TemplateType) -> Self {
		self.template_type = template_type;
		self
	}

	#[must_use]
	pub fn with_version(mut self, version: u32) -> Self {
		self.version = version;
		self
	}

	#[must_use]
	pub fn with_variables(mut self, variables: Vec<TemplateVariable>) -> Self {
		self.variables = variables;
		self
	}

	/// Declare every placeholder in the content as a required variable.
	#[must_use]
	pub fn with_placeholder_variables(mut self) -> Self {
		self.variables = extract_placeholders(&self.content)
			.into_iter()
			.map(|name| TemplateVariable::new(name).required())
			.collect();
		self
	}

	/// Placeholder names referenced by the content.
	pub fn placeholders(&self) -> Vec<&str> {
		extract_placeholders(&self.content)
	}
}
