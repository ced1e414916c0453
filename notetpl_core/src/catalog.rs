//! Built-in templates and quick-insert snippets.

use serde::Deserialize;
use serde::Serialize;

use crate::NoteTemplateError;
use crate::NoteTemplateResult;
use crate::template::TemplateRecord;
use crate::template::TemplateType;

/// A labelled piece of template syntax an editor can insert at the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
	pub label: String,
	pub value: String,
}

impl Snippet {
	pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			value: value.into(),
		}
	}
}

const COMMON_TAGS: [(&str, &str); 8] = [
	("Chief Complaint", "<Chief Complaint>"),
	("Health History", "<Health History Updates>"),
	("Clinical Findings", "<Clinical Findings>"),
	("Procedures", "<Procedures Performed>"),
	("Recommendations", "<Recommendations>"),
	("Follow-up", "<Follow up Instructions>"),
	("Patient Education", "<Patient Education>"),
	("Medications", "<Medications Prescribed>"),
];

const COMMON_VARIABLES: [(&str, &str); 8] = [
	("Date", "{{ date }}"),
	("Provider", "{{ provider }}"),
	("Patient Ref", "{{ patient_ref }}"),
	("Chief Complaint", "{{ chief_complaint }}"),
	("Summary", "{{ summary }}"),
	("Findings (bullets)", "{{ findings | bullet_list }}"),
	("Procedures (bullets)", "{{ procedures | bullet_list }}"),
	("Recommendations (numbered)", "{{ recommendations | numbered_list }}"),
];

/// Bracket tags for the most common clinical note sections.
pub fn common_tags() -> Vec<Snippet> {
	COMMON_TAGS
		.iter()
		.map(|(label, value)| Snippet::new(*label, *value))
		.collect()
}

/// Variable expressions for the values the note generator fills in.
pub fn common_variables() -> Vec<Snippet> {
	COMMON_VARIABLES
		.iter()
		.map(|(label, value)| Snippet::new(*label, *value))
		.collect()
}

const SOAP_CONTENT: &str = "DENTAL CLINICAL NOTE - SOAP FORMAT

Date: {{ date }}
Provider: {{ provider }}

SUBJECTIVE:
Chief Complaint: {{ chief_complaint }}

History of Present Illness:
{{ subjective_notes }}

OBJECTIVE:
Clinical Examination:
{% if findings %}
{{ findings | bullet_list }}
{% else %}
No significant findings documented.
{% endif %}

ASSESSMENT:
{{ assessment }}

PLAN:
{% if procedures %}
Procedures Performed:
{{ procedures | bullet_list }}
{% endif %}

{% if recommendations %}
Recommendations:
{{ recommendations | numbered_list }}
{% endif %}

Follow-up: {{ follow_up }}

_____________________________
Provider Signature
";

const DAP_CONTENT: &str = "DENTAL CLINICAL NOTE - DAP FORMAT

Date: {{ date }}
Provider: {{ provider }}

DATA:
{{ chief_complaint }}

Clinical Findings:
{{ findings | bullet_list }}

ASSESSMENT:
{{ assessment }}

PLAN:
{{ procedures | bullet_list }}

Recommendations:
{{ recommendations | numbered_list }}

_____________________________
Provider Signature
";

const NARRATIVE_CONTENT: &str = "DENTAL CLINICAL NOTE

Date: {{ date }}
Provider: {{ provider }}
Patient Reference: {{ patient_ref }}

{{ summary }}

Chief Complaint:
{{ chief_complaint }}

Clinical Findings:
{{ findings | bullet_list }}

Treatment Provided:
{{ procedures | bullet_list }}

Recommendations and Follow-up:
{{ recommendations | bullet_list }}

_____________________________
Provider Signature
";

/// The SOAP, DAP and narrative templates every practice starts with. Each
/// declares its placeholders as required variables.
pub fn default_templates() -> Vec<TemplateRecord> {
	vec![
		TemplateRecord::new("SOAP Note", SOAP_CONTENT)
			.with_description("Standard SOAP format (Subjective, Objective, Assessment, Plan)")
			.with_type(TemplateType::Soap)
			.with_placeholder_variables(),
		TemplateRecord::new("DAP Note", DAP_CONTENT)
			.with_description("Data, Assessment, Plan format")
			.with_type(TemplateType::Dap)
			.with_placeholder_variables(),
		TemplateRecord::new("Narrative Note", NARRATIVE_CONTENT)
			.with_description("Free-form narrative clinical note")
			.with_type(TemplateType::Narrative)
			.with_placeholder_variables(),
	]
}

/// Look up a built-in template by its type key (`soap`, `dap`,
/// `narrative`).
pub fn builtin_template(key: &str) -> NoteTemplateResult<TemplateRecord> {
	default_templates()
		.into_iter()
		.find(|template| template.template_type.as_str() == key)
		.ok_or_else(|| NoteTemplateError::UnknownBuiltin(key.to_string()))
}
