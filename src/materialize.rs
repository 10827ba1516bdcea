//! Turns configuration entries into loaded parameters.

use crate::entry::{ConfigEntry, PlanningPipelinesEntry};
use crate::error::Result;
use crate::loaders::{DeferredTemplate, StructuredLoader, TemplateExpander, is_plain_text};
use crate::resolved::{
	MoveItConfigs, ParameterValue, Parameters, ROBOT_DESCRIPTION_PLANNING, into_parameters,
};
use crate::section::Section;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Parameter key holding the ordered pipeline names.
pub const PIPELINE_NAMES_KEY: &str = "planning_pipelines.pipeline_names";

/// Parameter key holding the default pipeline name.
pub const DEFAULT_PIPELINE_KEY: &str = "default_planning_pipeline";

/// The populated entries of a builder.
#[derive(Debug, Clone, Default)]
pub(crate) struct Slots {
	pub entries: BTreeMap<Section, ConfigEntry>,
	pub planning_pipelines: Option<PlanningPipelinesEntry>,
}

pub(crate) struct Materializer<'a> {
	pub structured: &'a dyn StructuredLoader,
	pub template: &'a dyn TemplateExpander,
}

impl Materializer<'_> {
	pub fn materialize(&self, package_path: PathBuf, slots: &Slots) -> Result<MoveItConfigs> {
		let mut configs = MoveItConfigs {
			package_path: Some(package_path),
			..Default::default()
		};

		for (&section, entry) in &slots.entries {
			match section {
				Section::RobotDescription => {
					configs.robot_description = self.description(section, entry)?;
				}
				Section::RobotDescriptionSemantic => {
					configs.robot_description_semantic = self.description(section, entry)?;
				}
				Section::RobotDescriptionKinematics => {
					configs.robot_description_kinematics =
						self.nested(Section::RobotDescriptionKinematics.as_str(), entry)?;
				}
				Section::JointLimits => {
					configs.joint_limits = self.nested(ROBOT_DESCRIPTION_PLANNING, entry)?;
				}
				Section::TrajectoryExecution => {
					configs.trajectory_execution = self.flat(entry)?;
				}
				Section::Sensors => configs.sensors_3d = self.flat(entry)?,
				Section::MoveitCpp => configs.moveit_cpp = self.flat(entry)?,
				Section::PilzCartesianLimits => configs.pilz_cartesian_limits = self.flat(entry)?,
				Section::Extends | Section::MoveitConfigs | Section::PlanningPipelines => {}
			}
		}

		if let Some(pipelines) = &slots.planning_pipelines {
			configs.planning_pipelines = self.pipelines(pipelines)?;
		}

		Ok(configs)
	}

	/// Expand a description now when its mappings are plain text, otherwise defer it.
	fn description(&self, section: Section, entry: &ConfigEntry) -> Result<Parameters> {
		let value = if is_plain_text(entry.mappings()) {
			ParameterValue::from(self.template.expand(entry.path(), entry.mappings())?)
		} else {
			tracing::debug!(section = %section, "deferring template expansion for typed mappings");
			let template = DeferredTemplate::new(entry.path(), entry.mappings().clone());
			ParameterValue::from(template)
		};
		Ok(Parameters::from([(section.as_str().to_string(), value)]))
	}

	fn nested(&self, key: &str, entry: &ConfigEntry) -> Result<Parameters> {
		let value = self.structured.load(entry.path(), entry.mappings())?;
		let parameter = ParameterValue::Value(value);
		Ok(Parameters::from([(key.to_string(), parameter)]))
	}

	fn flat(&self, entry: &ConfigEntry) -> Result<Parameters> {
		let value = self.structured.load(entry.path(), entry.mappings())?;
		into_parameters(value, entry.path())
	}

	fn pipelines(&self, pipelines: &PlanningPipelinesEntry) -> Result<Parameters> {
		let names = pipelines
			.pipelines()
			.iter()
			.map(|name| serde_yaml::Value::String(name.clone()))
			.collect();

		let mut parameters = Parameters::new();
		parameters.insert(
			PIPELINE_NAMES_KEY.to_string(),
			ParameterValue::Value(serde_yaml::Value::Sequence(names)),
		);
		parameters.insert(
			DEFAULT_PIPELINE_KEY.to_string(),
			ParameterValue::from(pipelines.default_pipeline().to_string()),
		);
		for (name, entry) in pipelines.iter() {
			let value = self.structured.load(entry.path(), entry.mappings())?;
			parameters.insert(name.to_string(), ParameterValue::Value(value));
		}
		Ok(parameters)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::Mappings;
	use crate::error::ConfigError;
	use std::path::Path;

	/// Returns canned values instead of reading files.
	struct CannedLoader;

	impl StructuredLoader for CannedLoader {
		fn load(&self, path: &Path, _mappings: &Mappings) -> Result<serde_yaml::Value> {
			let name = path.file_stem().unwrap_or_default().to_string_lossy();
			if name == "broken" {
				return Err(ConfigError::Loader {
					path: path.to_path_buf(),
					source: anyhow::anyhow!("canned failure"),
				});
			}
			let yaml = format!("{name}_key: {name}_value");
			Ok(serde_yaml::from_str(&yaml).unwrap())
		}
	}

	impl TemplateExpander for CannedLoader {
		fn expand(&self, path: &Path, mappings: &Mappings) -> Result<String> {
			Ok(format!("{}:{}", path.display(), mappings.len()))
		}
	}

	fn materializer() -> Materializer<'static> {
		Materializer {
			structured: &CannedLoader,
			template: &CannedLoader,
		}
	}

	fn entry(path: &str, mappings: Mappings) -> ConfigEntry {
		ConfigEntry::unchecked(path, mappings)
	}

	#[test]
	fn test_sections_land_in_their_fields() {
		let mut slots = Slots::default();
		slots.entries.insert(
			Section::RobotDescriptionKinematics,
			entry("/pkg/kinematics.yaml", Mappings::new()),
		);
		slots.entries.insert(
			Section::JointLimits,
			entry("/pkg/joint_limits.yaml", Mappings::new()),
		);
		slots
			.entries
			.insert(Section::Sensors, entry("/pkg/sensors.yaml", Mappings::new()));

		let configs = materializer()
			.materialize(PathBuf::from("/pkg"), &slots)
			.unwrap();
		assert_eq!(configs.package_path, Some(PathBuf::from("/pkg")));
		let kinematics = &configs.robot_description_kinematics;
		assert!(kinematics.contains_key("robot_description_kinematics"));
		let joint_limits = &configs.joint_limits;
		assert!(joint_limits.contains_key(ROBOT_DESCRIPTION_PLANNING));
		assert!(configs.sensors_3d.contains_key("sensors_key"));
		assert!(configs.moveit_cpp.is_empty());
	}

	#[test]
	fn test_description_dual_mode() {
		let mut typed = Mappings::new();
		typed.insert("dof".into(), toml::Value::Integer(7));
		let mut plain = Mappings::new();
		plain.insert("name".into(), "panda".into());

		let mut slots = Slots::default();
		slots.entries.insert(
			Section::RobotDescription,
			entry("/pkg/robot.urdf.xacro", plain),
		);
		slots.entries.insert(
			Section::RobotDescriptionSemantic,
			entry("/pkg/robot.srdf.xacro", typed),
		);

		let configs = materializer()
			.materialize(PathBuf::from("/pkg"), &slots)
			.unwrap();
		assert_eq!(
			configs.robot_description["robot_description"].as_text(),
			Some("/pkg/robot.urdf.xacro:1")
		);
		let semantic = &configs.robot_description_semantic["robot_description_semantic"];
		let deferred = semantic.as_deferred().unwrap();
		assert_eq!(deferred.path(), Path::new("/pkg/robot.srdf.xacro"));
		assert_eq!(
			semantic.resolve_text(&CannedLoader).unwrap().unwrap(),
			"/pkg/robot.srdf.xacro:1"
		);
	}

	#[test]
	fn test_pipelines_parameters() {
		let pipelines = PlanningPipelinesEntry::new(
			vec![
				("chomp".into(), entry("/pkg/chomp.yaml", Mappings::new())),
				("ompl".into(), entry("/pkg/ompl.yaml", Mappings::new())),
			],
			None,
		)
		.unwrap();
		let slots = Slots {
			planning_pipelines: Some(pipelines),
			..Default::default()
		};

		let configs = materializer()
			.materialize(PathBuf::from("/pkg"), &slots)
			.unwrap();
		let pipelines = &configs.planning_pipelines;
		let names = pipelines[PIPELINE_NAMES_KEY].as_value().unwrap();
		let names = names.as_sequence().unwrap();
		assert_eq!(names.len(), 2);
		assert_eq!(names[0].as_str(), Some("chomp"));
		assert_eq!(pipelines[DEFAULT_PIPELINE_KEY].as_text(), Some("ompl"));
		assert!(pipelines.contains_key("chomp"));
		assert!(pipelines.contains_key("ompl"));
	}

	#[test]
	fn test_loader_failure_propagates() {
		let mut slots = Slots::default();
		slots
			.entries
			.insert(Section::MoveitCpp, entry("/pkg/broken.yaml", Mappings::new()));

		let result = materializer().materialize(PathBuf::from("/pkg"), &slots);
		assert!(matches!(result, Err(ConfigError::Loader { .. })));
	}
}
