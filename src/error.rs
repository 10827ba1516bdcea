use std::path::PathBuf;

/// Library-level structured errors for moveit-configs.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// Custom loaders report their own failures through [`ConfigError::Loader`],
/// which carries an `anyhow` context chain.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Package not found: {name}")]
	PackageNotFound { name: String },

	#[error("Path not found: {path}")]
	RootPathNotFound { path: PathBuf },

	#[error("Invalid package URI: {value}")]
	InvalidPackageUri { value: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,

	#[error("Failed to read manifest: {path}")]
	ManifestRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse manifest: {path}")]
	ManifestParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error(
		"No moveit_configs.toml found; create one or pass an explicit file path when loading `{section}`"
	)]
	ManifestNotLoaded { section: String },

	#[error("No [moveit_configs] table found in {manifest}")]
	NoConfigsTable { manifest: PathBuf },

	#[error("No value for `{section}` in the [moveit_configs] table of {manifest}")]
	SectionMissing { section: String, manifest: PathBuf },

	#[error("Invalid type for `{section}` in the manifest of {root}")]
	InvalidSectionType { section: String, root: PathBuf },

	#[error("Unknown section: {name}")]
	UnknownSection { name: String },

	#[error("Cyclic extends chain: {}", format_chain(.chain))]
	CyclicExtension { chain: Vec<PathBuf> },

	#[error("File not found: {path}")]
	FileNotFound { path: PathBuf },

	#[error("Failed to read file: {path}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse YAML file: {path}")]
	YamlParse {
		path: PathBuf,
		#[source]
		source: serde_yaml::Error,
	},

	#[error("Expected a mapping at the top level of {path}")]
	NotAMapping { path: PathBuf },

	#[error("Undefined argument `{name}` in {path}")]
	UndefinedArgument { name: String, path: PathBuf },

	#[error("Undefined environment variable `{name}` in {path}")]
	UndefinedEnvironment { name: String, path: PathBuf },

	#[error("Default planning pipeline `{}` is not one of the pipelines `{}`", .default.as_deref().unwrap_or("<none>"), .pipelines.join(","))]
	InvalidDefaultPipeline {
		default: Option<String>,
		pipelines: Vec<String>,
	},

	#[error("Loader failed for {path}")]
	Loader {
		path: PathBuf,
		#[source]
		source: anyhow::Error,
	},
}

fn format_chain(chain: &[PathBuf]) -> String {
	chain
		.iter()
		.map(|p| p.display().to_string())
		.collect::<Vec<_>>()
		.join(" -> ")
}

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;
