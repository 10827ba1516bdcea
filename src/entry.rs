//! Configuration entries: the recipe for loading one configuration file.

use crate::config::{Manifest, Mappings};
use crate::error::{ConfigError, Result};
use crate::package::{PackageIndex, normalize};
use crate::section::Section;
use std::path::{Path, PathBuf};

/// A configuration file path plus the substitution mappings applied when loading it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
	path: PathBuf,
	mappings: Mappings,
}

impl ConfigEntry {
	/// Create an entry for an explicit file, which must exist.
	pub fn from_file(path: impl Into<PathBuf>, mappings: Option<Mappings>) -> Result<Self> {
		let path = path.into();
		if !path.exists() {
			return Err(ConfigError::FileNotFound { path });
		}
		tracing::debug!(path = %path.display(), "config entry from file");
		Ok(Self {
			path,
			mappings: mappings.unwrap_or_default(),
		})
	}

	/// Create an entry from a section (or one variant of it) of a resolved manifest.
	///
	/// The file's existence is not checked here; loading it reports a missing file.
	pub fn from_section(
		manifest: &Manifest,
		section: Section,
		variant: Option<&str>,
		index: &dyn PackageIndex,
	) -> Result<Self> {
		let section_name = match variant {
			Some(variant) => format!("{section}.{variant}"),
			None => section.to_string(),
		};

		if manifest.is_empty() {
			return Err(ConfigError::ManifestNotLoaded {
				section: section_name,
			});
		}

		let Some(configs) = manifest.configs() else {
			return Err(ConfigError::NoConfigsTable {
				manifest: manifest.location(),
			});
		};

		let missing = || ConfigError::SectionMissing {
			section: section_name.clone(),
			manifest: manifest.location(),
		};

		let mut value = configs.get(section.as_str()).ok_or_else(missing)?;
		if let Some(variant) = variant {
			value = value
				.as_table()
				.ok_or_else(|| ConfigError::InvalidSectionType {
					section: section.to_string(),
					root: manifest.root.clone(),
				})?
				.get(variant)
				.ok_or_else(missing)?;
		}

		let Some(relative) = value.as_str() else {
			return Err(ConfigError::InvalidSectionType {
				section: section_name,
				root: manifest.root.clone(),
			});
		};

		let path = manifest.root.join(normalize(relative, index)?);
		let mappings = section_mappings(manifest, section, variant);
		tracing::debug!(
			section = %section_name,
			path = %path.display(),
			"config entry from manifest"
		);

		Ok(Self { path, mappings })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn mappings(&self) -> &Mappings {
		&self.mappings
	}

	#[cfg(test)]
	pub(crate) fn unchecked(path: impl Into<PathBuf>, mappings: Mappings) -> Self {
		Self {
			path: path.into(),
			mappings,
		}
	}

	/// Overlay `overrides` onto this entry's mappings, key by key.
	pub(crate) fn with_overrides(mut self, overrides: Option<Mappings>) -> Self {
		if let Some(overrides) = overrides {
			self.mappings.extend(overrides);
		}
		self
	}
}

/// The substitution table for a section or variant; absent or non-table data yields none.
fn section_mappings(manifest: &Manifest, section: Section, variant: Option<&str>) -> Mappings {
	let Some(value) = manifest.substitutions(section) else {
		return Mappings::new();
	};
	let value = match variant {
		Some(variant) => match value.as_table().and_then(|table| table.get(variant)) {
			Some(value) => value,
			None => return Mappings::new(),
		},
		None => value,
	};

	match value.as_table() {
		Some(table) => table.clone(),
		None => {
			tracing::warn!(section = %section, ?variant, "ignoring non-table substitution data");
			Mappings::new()
		}
	}
}

/// Entries for the planning pipelines, in pipeline order, plus the default pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningPipelinesEntry {
	pipelines: Vec<String>,
	configs: Vec<ConfigEntry>,
	default_pipeline: String,
}

impl PlanningPipelinesEntry {
	/// Pair pipelines with their entries and choose the default pipeline.
	///
	/// Duplicate pipeline names keep their first entry. Without an explicit
	/// default, `ompl` is chosen when available.
	pub fn new(
		entries: Vec<(String, ConfigEntry)>,
		default_pipeline: Option<&str>,
	) -> Result<Self> {
		let mut pipelines = Vec::with_capacity(entries.len());
		let mut configs = Vec::with_capacity(entries.len());
		for (name, entry) in entries {
			if !pipelines.contains(&name) {
				pipelines.push(name);
				configs.push(entry);
			}
		}

		let default_pipeline = match default_pipeline {
			Some(name) => Some(name.to_string()),
			None if pipelines.iter().any(|name| name == "ompl") => Some("ompl".to_string()),
			None => None,
		};

		match default_pipeline {
			Some(default) if pipelines.contains(&default) => Ok(Self {
				pipelines,
				configs,
				default_pipeline: default,
			}),
			default => Err(ConfigError::InvalidDefaultPipeline { default, pipelines }),
		}
	}

	pub fn pipelines(&self) -> &[String] {
		&self.pipelines
	}

	pub fn configs(&self) -> &[ConfigEntry] {
		&self.configs
	}

	pub fn default_pipeline(&self) -> &str {
		&self.default_pipeline
	}

	/// Pipeline names paired with their entries.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigEntry)> {
		self.pipelines
			.iter()
			.map(String::as_str)
			.zip(self.configs.iter())
	}
}
