use crate::TemplateRecord;
use crate::TemplateType;
use crate::TemplateVariable;

pub fn mixed_template() -> &'static str {
	"
<Chief Complaint>
{{ procedures | bullet_list }}
{% if has_findings %}
Findings: {{ findings }}
{% endif %}
"
}

pub fn soap_record() -> TemplateRecord {
	TemplateRecord::new("Test Template", "{{ chief_complaint }}")
		.with_description("A test template")
		.with_type(TemplateType::Soap)
		.with_variables(vec![
			TemplateVariable::new("chief_complaint")
				.with_description("The main complaint")
				.required(),
		])
}

pub fn full_record() -> TemplateRecord {
	TemplateRecord::new(
		"Periodontal Exam",
		"<Chief Complaint>\n{{ pockets | bullet_list }}\n{% for site in sites %}{{ site }}{% endfor %}",
	)
	.with_description("Periodontal charting summary")
	.with_type(TemplateType::Narrative)
	.with_version(3)
	.with_variables(vec![
		TemplateVariable::new("Chief Complaint").required(),
		TemplateVariable::new("pockets")
			.with_description("Pocket depths over 4mm")
			.with_default_value("None recorded"),
		TemplateVariable::new("site"),
	])
}
