use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use notetpl_cli::Commands;
use notetpl_cli::NoteTemplateCli;
use notetpl_cli::OutputFormat;
use notetpl_cli::TemplateTypeArg;
use notetpl_core::CheckOptions;
use notetpl_core::LineIndex;
use notetpl_core::NoteTemplateConfig;
use notetpl_core::Snippet;
use notetpl_core::TemplateDiagnostic;
use notetpl_core::TemplateRecord;
use notetpl_core::TokenKind;
use notetpl_core::builtin_template;
use notetpl_core::check_template;
use notetpl_core::default_templates;
use notetpl_core::export_template;
use notetpl_core::extract_placeholders;
use notetpl_core::parse_template_import;
use notetpl_core::patterns::split_variable;
use notetpl_core::tokenize;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,cyan) => {
		if color_enabled() {
			format!("{}", $text.cyan())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,magenta) => {
		if color_enabled() {
			format!("{}", $text.magenta())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = "# notetpl configuration

# Refuse template and import files larger than this many bytes.
# max_file_size = 10485760

# Extra quick-insert snippets, listed after the built-in ones.
# [snippets]
# tags = [{ label = \"Radiographs\", value = \"<Radiographs Taken>\" }]
# variables = [{ label = \"Tooth\", value = \"{{ tooth_number }}\" }]

# Findings `notetpl check` should skip.
# [check]
# ignore_undeclared = false
# ignore_unused = false
";

fn main() {
	let args = NoteTemplateCli::parse();

	// Color only when stdout supports it and nobody opted out.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Tokens { template, format }) => run_tokens(&args, template, *format),
		Some(Commands::Placeholders { template, format }) => {
			run_placeholders(&args, template, *format)
		}
		Some(Commands::Show { template }) => run_show(&args, template),
		Some(Commands::Export {
			content,
			name,
			description,
			template_type,
			version,
			output,
		}) => {
			run_export(
				&args,
				content,
				name,
				description,
				*template_type,
				*version,
				output.as_deref(),
			)
		}
		Some(Commands::Import { file, name, output }) => {
			run_import(&args, file, name.as_deref(), output.as_deref())
		}
		Some(Commands::Check {
			file,
			format,
			ignore_undeclared,
			ignore_unused,
		}) => {
			let flags = CheckOptions {
				ignore_undeclared: *ignore_undeclared,
				ignore_unused: *ignore_unused,
			};
			run_check(&args, file, *format, flags)
		}
		Some(Commands::List) => run_list(),
		Some(Commands::Snippets) => run_snippets(&args),
		None => {
			eprintln!("No subcommand specified. Run `notetpl --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<notetpl_core::NoteTemplateError>() {
			Ok(notetpl_err) => {
				let report: miette::Report = (*notetpl_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// `RUST_LOG` wins. Otherwise `--verbose` shows debug events from notetpl
/// and everything else stays at warn.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_filter = if verbose {
		"warn,notetpl=debug,notetpl_core=debug"
	} else {
		"warn"
	};

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_ansi(use_color),
		)
		.init();
}

fn resolve_root(args: &NoteTemplateCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Relative file arguments are resolved against the project root.
fn resolve_input(args: &NoteTemplateCli, path: &Path) -> PathBuf {
	if path.is_absolute() {
		path.to_path_buf()
	} else {
		resolve_root(args).join(path)
	}
}

fn load_config(args: &NoteTemplateCli) -> Result<NoteTemplateConfig, Box<dyn std::error::Error>> {
	Ok(NoteTemplateConfig::load_or_default(&resolve_root(args))?)
}

/// Load a template body from a file, or from a built-in template when the
/// argument names one and no such file exists.
fn load_body(args: &NoteTemplateCli, template: &str) -> Result<String, Box<dyn std::error::Error>> {
	let path = resolve_input(args, Path::new(template));
	if !path.is_file() && is_builtin(template) {
		tracing::debug!(template, "using built-in template");
		return Ok(builtin_template(template)?.content);
	}

	tracing::debug!(path = %path.display(), "reading template body");

	let config = load_config(args)?;
	Ok(config.read_file(&path)?)
}

fn is_builtin(key: &str) -> bool {
	default_templates()
		.iter()
		.any(|template| template.template_type.as_str() == key)
}

fn load_import(
	args: &NoteTemplateCli,
	file: &Path,
) -> Result<(NoteTemplateConfig, TemplateRecord), Box<dyn std::error::Error>> {
	let config = load_config(args)?;
	let path = resolve_input(args, file);
	tracing::debug!(path = %path.display(), "reading template import");
	let text = config.read_file(&path)?;
	let template = parse_template_import(&text)?;
	Ok((config, template))
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

fn run_init(args: &NoteTemplateCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let mut created = 0;

	for template in default_templates() {
		let path = root.join(format!("{}.json", template.template_type));
		if path.exists() {
			println!("Template file already exists: {}", path.display());
			continue;
		}

		std::fs::write(&path, export_template(&template))?;
		println!("Created template file: {}", path.display());
		created += 1;
	}

	if NoteTemplateConfig::resolve_path(&root).is_none() {
		std::fs::write(root.join("notetpl.toml"), SAMPLE_CONFIG)?;
		println!("Created notetpl.toml");
	}

	if created > 0 {
		println!();
		println!("Next steps:");
		println!("  1. Run `notetpl show soap` to see the SOAP template highlighted");
		println!("  2. Run `notetpl check soap.json` after editing a template");
		println!("  3. Run `notetpl import soap.json --output soap.txt` to extract its body");
	}

	Ok(())
}

#[derive(Serialize)]
struct TokenRow<'a> {
	kind: TokenKind,
	value: &'a str,
	start: usize,
	end: usize,
	line: usize,
	column: usize,
}

fn run_tokens(
	args: &NoteTemplateCli,
	template: &str,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let body = load_body(args, template)?;
	let index = LineIndex::new(&body);
	let rows: Vec<TokenRow<'_>> = tokenize(&body)
		.into_iter()
		.map(|token| {
			let point = index.point(token.start);
			TokenRow {
				kind: token.kind,
				value: token.value,
				start: token.start,
				end: token.end,
				line: point.line,
				column: point.column,
			}
		})
		.collect();

	match format {
		OutputFormat::Json => print_json(&rows)?,
		OutputFormat::Text => {
			for row in &rows {
				let range = format!("{}..{}", row.start, row.end);
				let location = format!("{}:{}", row.line, row.column);
				println!(
					"{:<15} {range:<12} {location:<8} {:?}",
					row.kind.as_str(),
					row.value
				);
			}
		}
	}

	Ok(())
}

fn run_placeholders(
	args: &NoteTemplateCli,
	template: &str,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let body = load_body(args, template)?;
	let names = extract_placeholders(&body);

	match format {
		OutputFormat::Json => print_json(&names)?,
		OutputFormat::Text => {
			if names.is_empty() {
				println!("No placeholders found.");
			}
			for name in names {
				println!("{name}");
			}
		}
	}

	Ok(())
}

fn run_show(args: &NoteTemplateCli, template: &str) -> Result<(), Box<dyn std::error::Error>> {
	let body = load_body(args, template)?;
	let highlighted: String = tokenize(&body)
		.into_iter()
		.map(|token| {
			match token.kind {
				TokenKind::Text => token.value.to_string(),
				TokenKind::Tag => colored!(token.value, cyan),
				TokenKind::VariableExpr => highlight_variable(token.value),
				TokenKind::BlockStatement => colored!(token.value, yellow),
			}
		})
		.collect();

	print!("{highlighted}");
	if !highlighted.ends_with('\n') {
		println!();
	}

	Ok(())
}

/// Variable expressions are green with the filter chain in magenta.
fn highlight_variable(value: &str) -> String {
	let Some((_, Some(chain))) = split_variable(value) else {
		return colored!(value, green);
	};

	let chain_start = value.len() - "}}".len() - chain.len();
	let head = &value[..chain_start - 1];
	format!(
		"{}{}{}",
		colored!(head, green),
		colored!(format!("|{chain}"), magenta),
		colored!("}}", green)
	)
}

fn run_export(
	args: &NoteTemplateCli,
	content: &Path,
	name: &str,
	description: &str,
	template_type: TemplateTypeArg,
	version: u32,
	output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(args)?;
	let body = config.read_file(&resolve_input(args, content))?;
	let template = TemplateRecord::new(name, body)
		.with_description(description)
		.with_type(template_type.into())
		.with_version(version)
		.with_placeholder_variables();
	let exported = export_template(&template);

	match output {
		Some(output) => {
			let path = resolve_input(args, output);
			std::fs::write(&path, exported)?;
			println!(
				"Exported `{}` with {} variable(s) to {}",
				template.name,
				template.variables.len(),
				path.display()
			);
		}
		None => println!("{exported}"),
	}

	Ok(())
}

fn run_import(
	args: &NoteTemplateCli,
	file: &Path,
	name: Option<&str>,
	output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
	let (_, mut template) = load_import(args, file)?;
	if let Some(name) = name.filter(|name| !name.is_empty()) {
		template.name = name.to_string();
	}

	match output {
		Some(output) => {
			let path = resolve_input(args, output);
			std::fs::write(&path, &template.content)?;
			println!("Imported `{}` into {}", template.name, path.display());
		}
		None => print_json(&template)?,
	}

	Ok(())
}

#[derive(Serialize)]
struct DiagnosticRow<'a> {
	#[serde(flatten)]
	diagnostic: &'a TemplateDiagnostic,
	line: Option<usize>,
	column: Option<usize>,
	message: String,
}

fn run_check(
	args: &NoteTemplateCli,
	file: &Path,
	format: OutputFormat,
	flags: CheckOptions,
) -> Result<(), Box<dyn std::error::Error>> {
	let (config, template) = load_import(args, file)?;
	let options = CheckOptions {
		ignore_undeclared: flags.ignore_undeclared || config.check.ignore_undeclared,
		ignore_unused: flags.ignore_unused || config.check.ignore_unused,
	};
	let result = check_template(&template, &options);
	let index = LineIndex::new(&template.content);

	match format {
		OutputFormat::Json => {
			let diagnostics: Vec<DiagnosticRow<'_>> = result
				.diagnostics
				.iter()
				.map(|diagnostic| {
					let point = diagnostic.offset().map(|offset| index.point(offset));
					DiagnosticRow {
						diagnostic,
						line: point.map(|point| point.line),
						column: point.map(|point| point.column),
						message: diagnostic.to_string(),
					}
				})
				.collect();
			print_json(&serde_json::json!({
				"ok": result.is_ok(),
				"template": template.name,
				"diagnostics": diagnostics,
			}))?;
		}
		OutputFormat::Text => {
			if result.is_ok() {
				println!(
					"Check passed: `{}` declares every placeholder it uses.",
					template.name
				);
			} else {
				let label = file.display().to_string();
				for diagnostic in &result.diagnostics {
					let report = diagnostic_to_report(diagnostic, &label, &index);
					eprintln!("{report:?}");
				}
				println!(
					"{} {} problem(s) found in `{}`.",
					colored!("Check failed:", red),
					result.diagnostics.len(),
					template.name
				);
			}
		}
	}

	if !result.is_ok() {
		process::exit(1);
	}

	Ok(())
}

fn run_list() -> Result<(), Box<dyn std::error::Error>> {
	println!("{}", colored!("Built-in templates:", bold));
	for template in default_templates() {
		println!(
			"  {:<10} {:<16} {:>2} variable(s)  {}",
			template.template_type.as_str(),
			template.name,
			template.variables.len(),
			template.description
		);
	}

	Ok(())
}

fn run_snippets(args: &NoteTemplateCli) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(args)?;

	print_snippets("Tags:", &config.tag_snippets());
	println!();
	print_snippets("Variables:", &config.variable_snippets());

	Ok(())
}

fn print_snippets(title: &str, snippets: &[Snippet]) {
	println!("{}", colored!(title, bold));
	for snippet in snippets {
		println!("  {:<28} {}", snippet.label, snippet.value);
	}
}

/// Convert a `TemplateDiagnostic` into a `miette::Report` with appropriate
/// severity, error code, and help text for rich terminal display.
fn diagnostic_to_report(
	diagnostic: &TemplateDiagnostic,
	label: &str,
	index: &LineIndex<'_>,
) -> miette::Report {
	let severity = if diagnostic.is_error() {
		miette::Severity::Error
	} else {
		miette::Severity::Warning
	};

	let message = match diagnostic.offset().map(|offset| index.point(offset)) {
		Some(point) => format!("[{label}:{}:{}] {diagnostic}", point.line, point.column),
		None => format!("[{label}] {diagnostic}"),
	};
	let (code, help) = match diagnostic {
		TemplateDiagnostic::Undeclared { name, .. } => {
			(
				"notetpl::undeclared",
				format!("add a variable named `{name}` or pass `--ignore-undeclared`"),
			)
		}
		TemplateDiagnostic::Unused { name } => {
			(
				"notetpl::unused",
				format!("reference `{{{{ {name} }}}}` in the body or remove the variable"),
			)
		}
		TemplateDiagnostic::DuplicateVariable { name } => {
			(
				"notetpl::duplicate_variable",
				format!("keep a single declaration of `{name}`"),
			)
		}
		TemplateDiagnostic::UnrecognizedBlock { .. } => {
			(
				"notetpl::unrecognized_block",
				"block statements start with if, for, elif, else, endif or endfor".to_string(),
			)
		}
		TemplateDiagnostic::IncompleteBlock { .. } => {
			(
				"notetpl::incomplete_block",
				"close the statement with `%}` and keep `%` out of its body".to_string(),
			)
		}
		_ => ("notetpl::diagnostic", diagnostic.to_string()),
	};

	let diagnostic = miette::MietteDiagnostic::new(message)
		.with_code(code)
		.with_help(help)
		.with_severity(severity);
	miette::Report::new(diagnostic)
}
