use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use notetpl_core::TemplateType;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Inspect, check, import and export clinical note templates.",
	long_about = "notetpl works with clinical note templates: free text mixed with `<Tag>` \
	              placeholders, `{{ variable | filter }}` expressions and `{% if %}` / `{% for \
	              %}` block statements.\n\nQuick start:\n  notetpl init          Write the \
	              built-in templates and a sample config\n  notetpl show soap     Print a \
	              template with highlighted placeholders\n  notetpl check soap.json  Compare \
	              placeholders with declared variables\n  notetpl export note.txt --name \
	              Visit  Produce a portable JSON template"
)]
pub struct NoteTemplateCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, used for config discovery and as
	/// the base for relative file arguments.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Write the built-in templates and a sample `notetpl.toml`.
	///
	/// Creates `soap.json`, `dap.json` and `narrative.json` in the project
	/// root, each an export of the matching built-in template. Existing files
	/// are left untouched.
	Init,
	/// Print the token stream of a template body.
	///
	/// Every token is listed with its kind, byte range, line and column.
	Tokens {
		/// A template body file, or the name of a built-in template.
		template: String,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print the distinct placeholder names a template body references.
	///
	/// Tag names are listed first, then variable names, each in order of
	/// first appearance.
	Placeholders {
		/// A template body file, or the name of a built-in template.
		template: String,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print a template body with placeholders highlighted by kind.
	///
	/// Tags are cyan, variable expressions green with magenta filters, and
	/// block statements yellow.
	Show {
		/// A template body file, or the name of a built-in template.
		template: String,
	},
	/// Export a template body as a portable JSON template.
	///
	/// Every placeholder in the body becomes a required variable. The export
	/// is stamped with the current time.
	Export {
		/// The template body file.
		content: PathBuf,

		/// The template name.
		#[arg(long)]
		name: String,

		/// A short description of the template.
		#[arg(long, default_value = "")]
		description: String,

		/// The template type.
		#[arg(long = "type", value_enum, default_value_t = TemplateTypeArg::Custom)]
		template_type: TemplateTypeArg,

		/// The template version.
		#[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
		version: u32,

		/// Write the export to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Validate and normalize an exported JSON template.
	///
	/// Prints the normalized template as JSON. With `--output` the template
	/// body is written to that file instead.
	Import {
		/// The exported JSON template.
		file: PathBuf,

		/// Replace the imported template's name.
		#[arg(long)]
		name: Option<String>,

		/// Write the template body to this file.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Compare a template's placeholders with its declared variables.
	///
	/// Imports the JSON template, then reports undeclared placeholders,
	/// unused or duplicate variables, and `{% %}` fragments that are not
	/// recognized block statements. Exits with a non-zero status code when
	/// anything is reported.
	Check {
		/// The exported JSON template.
		file: PathBuf,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// Don't report placeholders without a declared variable.
		#[arg(long, default_value_t = false)]
		ignore_undeclared: bool,

		/// Don't report declared variables the body never references.
		#[arg(long, default_value_t = false)]
		ignore_unused: bool,
	},
	/// List the built-in templates.
	List,
	/// List the quick-insert snippets, built-in and configured.
	Snippets,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TemplateTypeArg {
	/// Subjective, Objective, Assessment, Plan.
	Soap,
	/// Data, Assessment, Plan.
	Dap,
	/// Free-form narrative.
	Narrative,
	/// Anything else.
	Custom,
}

impl From<TemplateTypeArg> for TemplateType {
	fn from(value: TemplateTypeArg) -> Self {
		match value {
			TemplateTypeArg::Soap => TemplateType::Soap,
			TemplateTypeArg::Dap => TemplateType::Dap,
			TemplateTypeArg::Narrative => TemplateType::Narrative,
			TemplateTypeArg::Custom => TemplateType::Custom,
		}
	}
}
