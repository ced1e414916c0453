mod common;

use notetpl_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use rstest::rstest;
use serde_json::Value;

#[test]
fn tokens_lists_every_token() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("note.txt"), "Hello {{ name }}!")?;

	common::notetpl_cmd()
		.arg("tokens")
		.arg("note.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("text"))
		.stdout(predicates::str::contains("variable_expr"))
		.stdout(predicates::str::contains("6..16"))
		.stdout(predicates::str::contains("1:7"))
		.stdout(predicates::str::contains("\"{{ name }}\""));

	Ok(())
}

#[test]
fn tokens_json_reports_lines_and_columns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("note.txt"), "Line one\n<Tag> {{ v }}")?;

	let output = common::notetpl_cmd()
		.arg("tokens")
		.arg("note.txt")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let tokens: Value = serde_json::from_slice(&output.stdout)?;
	let tokens = tokens.as_array().cloned().unwrap_or_default();
	assert_eq!(tokens.len(), 4);

	assert_eq!(tokens[1]["kind"], "tag");
	assert_eq!(tokens[1]["value"], "<Tag>");
	assert_eq!(tokens[1]["start"], 9);
	assert_eq!(tokens[1]["line"], 2);
	assert_eq!(tokens[1]["column"], 1);

	assert_eq!(tokens[3]["kind"], "variable_expr");
	assert_eq!(tokens[3]["end"], 22);
	assert_eq!(tokens[3]["column"], 7);

	Ok(())
}

#[test]
fn placeholders_are_distinct_with_tags_first() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("note.txt"),
		"{{ date }}\n<Chief Complaint>\n{{ date | upper }}\n{% if x %}{% endif %}",
	)?;

	let output = common::notetpl_cmd()
		.arg("placeholders")
		.arg("note.txt")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());
	similar_asserts::assert_eq!(String::from_utf8(output.stdout)?.as_str(), "Chief Complaint\ndate\n");

	Ok(())
}

#[test]
fn placeholders_without_any() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("note.txt"), "Nothing to fill in.")?;

	common::notetpl_cmd()
		.arg("placeholders")
		.arg("note.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No placeholders found."));

	Ok(())
}

#[rstest]
#[case("soap", "chief_complaint")]
#[case("dap", "assessment")]
#[case("narrative", "summary")]
fn placeholders_of_builtin_templates(#[case] template: &str, #[case] expected: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let output = common::notetpl_cmd()
		.arg("placeholders")
		.arg(template)
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let names: Vec<String> = serde_json::from_slice(&output.stdout)?;
	assert!(names.iter().any(|name| name == expected), "{names:?}");

	Ok(())
}

#[test]
fn show_without_color_prints_the_body() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let body = "<Findings>\n{{ name | upper }}\n{% if x %}shown{% endif %}\n";
	std::fs::write(tmp.path().join("note.txt"), body)?;

	let output = common::notetpl_cmd()
		.arg("show")
		.arg("note.txt")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());
	similar_asserts::assert_eq!(String::from_utf8(output.stdout)?.as_str(), body);

	Ok(())
}

#[test]
fn show_missing_file_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::notetpl_cmd()
		.arg("show")
		.arg("missing.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2);

	Ok(())
}

#[test]
fn show_custom_reads_a_file_not_a_builtin() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::notetpl_cmd()
		.arg("show")
		.arg("custom")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("notetpl::io_error"))
		.stderr(predicates::str::contains("unknown built-in").not());

	std::fs::write(tmp.path().join("custom"), "<Findings>\n")?;
	let output = common::notetpl_cmd()
		.arg("show")
		.arg("custom")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());
	similar_asserts::assert_eq!(String::from_utf8(output.stdout)?.as_str(), "<Findings>\n");

	Ok(())
}

#[test]
fn oversized_files_are_refused() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("notetpl.toml"), "max_file_size = 4\n")?;
	std::fs::write(tmp.path().join("note.txt"), "{{ a }} {{ b }}")?;

	common::notetpl_cmd()
		.arg("tokens")
		.arg("note.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("file too large"));

	Ok(())
}

#[test]
fn list_shows_builtin_templates() {
	common::notetpl_cmd()
		.arg("list")
		.assert()
		.success()
		.stdout(predicates::str::contains("Built-in templates:"))
		.stdout(predicates::str::contains("SOAP Note"))
		.stdout(predicates::str::contains("DAP Note"))
		.stdout(predicates::str::contains("Narrative Note"));
}

#[test]
fn snippets_include_configured_entries() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(
		tmp.path().join(".config/notetpl.toml"),
		"[snippets]\ntags = [{ label = \"Radiographs\", value = \"<Radiographs Taken>\" }]\n",
	)?;

	common::notetpl_cmd()
		.arg("snippets")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Tags:"))
		.stdout(predicates::str::contains("<Chief Complaint>"))
		.stdout(predicates::str::contains("<Radiographs Taken>"))
		.stdout(predicates::str::contains("Variables:"))
		.stdout(predicates::str::contains("{{ findings | bullet_list }}"));

	Ok(())
}

#[test]
fn invalid_config_is_reported() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("notetpl.toml"), "[snippets\n")?;

	common::notetpl_cmd()
		.arg("snippets")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}
