use crate::section::{LEGACY_EXTENDS_KEY, MANIFEST_FILE_NAME, Section};
use std::path::PathBuf;

/// Substitution mappings applied when a configuration file is loaded.
pub type Mappings = toml::Table;

/// A parsed `moveit_configs.toml` together with the root it belongs to.
///
/// The `[moveit_configs]` table maps sections to file paths; every other
/// top-level table holds the substitution mappings of the section it is named after.
#[derive(Debug, Clone)]
pub struct Manifest {
	/// Directory the manifest's relative paths are resolved against.
	pub root: PathBuf,

	/// The file this manifest was read from, if one existed.
	pub source: Option<PathBuf>,

	/// Raw manifest content.
	pub table: toml::Table,
}

impl Manifest {
	/// An empty manifest for a root without a `moveit_configs.toml`.
	pub fn empty(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			source: None,
			table: toml::Table::new(),
		}
	}

	/// True when no manifest content was found anywhere in the chain.
	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Where this manifest lives, for error messages.
	pub fn location(&self) -> PathBuf {
		self.source
			.clone()
			.unwrap_or_else(|| self.root.join(MANIFEST_FILE_NAME))
	}

	/// The `[moveit_configs]` table, if present.
	pub fn configs(&self) -> Option<&toml::Table> {
		self.table
			.get(Section::MoveitConfigs.as_str())
			.and_then(toml::Value::as_table)
	}

	pub(crate) fn configs_mut(&mut self) -> Option<&mut toml::Table> {
		self.table
			.get_mut(Section::MoveitConfigs.as_str())
			.and_then(toml::Value::as_table_mut)
	}

	/// The path value declared for `section` under `[moveit_configs]`.
	pub fn section_value(&self, section: Section) -> Option<&toml::Value> {
		self.configs()
			.and_then(|configs| configs.get(section.as_str()))
	}

	/// Whether `section` has a path declared under `[moveit_configs]`.
	pub fn has_section(&self, section: Section) -> bool {
		self.section_value(section).is_some()
	}

	/// Data sections declared under `[moveit_configs]`, in canonical order.
	pub fn present_sections(&self) -> Vec<Section> {
		Section::data_sections()
			.filter(|section| self.has_section(*section))
			.collect()
	}

	/// Data sections not declared under `[moveit_configs]`, in canonical order.
	pub fn missing_sections(&self) -> Vec<Section> {
		Section::data_sections()
			.filter(|section| !self.has_section(*section))
			.collect()
	}

	/// The root this manifest extends, if any.
	pub fn extends(&self) -> Option<&toml::Value> {
		let configs = self.configs()?;
		configs
			.get(Section::Extends.as_str())
			.or_else(|| configs.get(LEGACY_EXTENDS_KEY))
	}

	pub(crate) fn take_extends(&mut self) -> Option<toml::Value> {
		let configs = self.configs_mut()?;
		let current = configs.remove(Section::Extends.as_str());
		let legacy = configs.remove(LEGACY_EXTENDS_KEY);
		current.or(legacy)
	}

	/// The substitution table stored at the top level under `section`.
	pub fn substitutions(&self, section: Section) -> Option<&toml::Value> {
		self.table.get(section.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn manifest(content: &str) -> Manifest {
		Manifest {
			root: PathBuf::from("/pkg"),
			source: None,
			table: toml::from_str(content).unwrap(),
		}
	}

	#[test]
	fn test_present_and_missing_sections() {
		let manifest = manifest(
			r#"
[moveit_configs]
extends = "base"
robot_description = "config/robot.urdf.xacro"
sensors = "config/sensors_3d.yaml"
"#,
		);

		assert_eq!(
			manifest.present_sections(),
			vec![Section::RobotDescription, Section::Sensors]
		);
		let missing = manifest.missing_sections();
		assert_eq!(missing.len(), 7);
		assert!(!missing.contains(&Section::Extends));
		assert!(!missing.contains(&Section::MoveitConfigs));
	}

	#[test]
	fn test_extends_accepts_legacy_key() {
		let manifest = manifest(
			r#"
[moveit_configs]
extend = "base_moveit_config"
"#,
		);
		assert_eq!(
			manifest.extends().and_then(toml::Value::as_str),
			Some("base_moveit_config")
		);
	}

	#[test]
	fn test_take_extends_removes_key() {
		let mut manifest = manifest(
			r#"
[moveit_configs]
extends = "base"
sensors = "config/sensors_3d.yaml"
"#,
		);
		let extends = manifest.take_extends();
		assert_eq!(extends.as_ref().and_then(toml::Value::as_str), Some("base"));
		assert!(manifest.extends().is_none());
		assert!(manifest.has_section(Section::Sensors));
	}

	#[test]
	fn test_empty_manifest_location() {
		let manifest = Manifest::empty("/pkg");
		assert!(manifest.is_empty());
		assert!(manifest.configs().is_none());
		assert_eq!(
			manifest.location(),
			PathBuf::from("/pkg/moveit_configs.toml")
		);
	}
}
