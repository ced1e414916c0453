use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::NoteTemplateError;
use crate::NoteTemplateResult;
use crate::catalog::Snippet;
use crate::catalog::common_tags;
use crate::catalog::common_variables;
use crate::check::CheckOptions;

/// Default maximum size in bytes of a template or import file (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["notetpl.toml", ".notetpl.toml", ".config/notetpl.toml"];

/// Configuration loaded from a `notetpl.toml` file.
///
/// ```toml
/// max_file_size = 1048576
///
/// [snippets]
/// tags = [{ label = "Radiographs", value = "<Radiographs Taken>" }]
/// variables = [{ label = "Tooth", value = "{{ tooth_number }}" }]
///
/// [check]
/// ignore_unused = true
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NoteTemplateConfig {
	/// Maximum file size in bytes to read. Larger files are refused.
	/// Defaults to 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// Extra quick-insert snippets, appended to the built-in catalog.
	#[serde(default)]
	pub snippets: SnippetsConfig,
	/// Which findings `check` reports.
	#[serde(default)]
	pub check: CheckOptions,
}

impl Default for NoteTemplateConfig {
	fn default() -> Self {
		Self {
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			snippets: SnippetsConfig::default(),
			check: CheckOptions::default(),
		}
	}
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

/// Project specific snippets from the `[snippets]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SnippetsConfig {
	#[serde(default)]
	pub tags: Vec<Snippet>,
	#[serde(default)]
	pub variables: Vec<Snippet>,
}

impl NoteTemplateConfig {
	/// Find the first config file that exists under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load config from `root`. Returns `None` if no config file exists.
	pub fn load(root: &Path) -> NoteTemplateResult<Option<NoteTemplateConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: NoteTemplateConfig =
			toml::from_str(&content).map_err(|e| NoteTemplateError::ConfigParse(e.to_string()))?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Load config from `root`, falling back to defaults when there is none.
	pub fn load_or_default(root: &Path) -> NoteTemplateResult<NoteTemplateConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Read a template or import file, refusing files over `max_file_size`.
	pub fn read_file(&self, path: &Path) -> NoteTemplateResult<String> {
		let size = std::fs::metadata(path)?.len();
		if size > self.max_file_size {
			return Err(NoteTemplateError::FileTooLarge {
				path: path.display().to_string(),
				size,
				limit: self.max_file_size,
			});
		}

		Ok(std::fs::read_to_string(path)?)
	}

	/// Built-in tag snippets followed by the configured ones.
	pub fn tag_snippets(&self) -> Vec<Snippet> {
		let mut snippets = common_tags();
		snippets.extend(self.snippets.tags.iter().cloned());
		snippets
	}

	/// Built-in variable snippets followed by the configured ones.
	pub fn variable_snippets(&self) -> Vec<Snippet> {
		let mut snippets = common_variables();
		snippets.extend(self.snippets.variables.iter().cloned());
		snippets
	}
}
