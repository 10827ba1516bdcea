use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Name of the manifest file looked up inside a configuration package.
pub const MANIFEST_FILE_NAME: &str = "moveit_configs.toml";

/// Legacy spelling of [`Section::Extends`] accepted in manifests.
pub const LEGACY_EXTENDS_KEY: &str = "extend";

/// The standard sections of a `moveit_configs.toml` manifest.
///
/// Declaration order is the canonical section order: existence checks and
/// `load_all` both walk [`Section::ALL`] front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
	Extends,
	MoveitConfigs,
	RobotDescription,
	RobotDescriptionSemantic,
	Sensors,
	MoveitCpp,
	RobotDescriptionKinematics,
	JointLimits,
	TrajectoryExecution,
	PlanningPipelines,
	PilzCartesianLimits,
}

impl Section {
	pub const ALL: [Section; 11] = [
		Section::Extends,
		Section::MoveitConfigs,
		Section::RobotDescription,
		Section::RobotDescriptionSemantic,
		Section::Sensors,
		Section::MoveitCpp,
		Section::RobotDescriptionKinematics,
		Section::JointLimits,
		Section::TrajectoryExecution,
		Section::PlanningPipelines,
		Section::PilzCartesianLimits,
	];

	/// Key used for this section in the manifest.
	pub fn as_str(&self) -> &'static str {
		match self {
			Section::Extends => "extends",
			Section::MoveitConfigs => "moveit_configs",
			Section::RobotDescription => "robot_description",
			Section::RobotDescriptionSemantic => "robot_description_semantic",
			Section::Sensors => "sensors",
			Section::MoveitCpp => "moveit_cpp",
			Section::RobotDescriptionKinematics => "robot_description_kinematics",
			Section::JointLimits => "joint_limits",
			Section::TrajectoryExecution => "trajectory_execution",
			Section::PlanningPipelines => "planning_pipelines",
			Section::PilzCartesianLimits => "pilz_cartesian_limits",
		}
	}

	/// Structural sections shape the manifest itself and never hold loadable data.
	pub fn is_structural(&self) -> bool {
		matches!(self, Section::Extends | Section::MoveitConfigs)
	}

	/// All data sections in canonical order.
	pub fn data_sections() -> impl Iterator<Item = Section> {
		Section::ALL.into_iter().filter(|s| !s.is_structural())
	}
}

impl fmt::Display for Section {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Section {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s == LEGACY_EXTENDS_KEY {
			return Ok(Section::Extends);
		}
		Section::ALL
			.into_iter()
			.find(|section| section.as_str() == s)
			.ok_or_else(|| ConfigError::UnknownSection {
				name: s.to_string(),
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_data_sections_skip_structural() {
		let data: Vec<_> = Section::data_sections().collect();
		assert_eq!(data.len(), 9);
		assert!(!data.contains(&Section::Extends));
		assert!(!data.contains(&Section::MoveitConfigs));
		assert_eq!(data[0], Section::RobotDescription);
		assert_eq!(data[8], Section::PilzCartesianLimits);
	}

	#[test]
	fn test_parse_section_names() {
		for section in Section::ALL {
			assert_eq!(section.as_str().parse::<Section>().unwrap(), section);
		}
		assert_eq!("extend".parse::<Section>().unwrap(), Section::Extends);
	}

	#[test]
	fn test_parse_unknown_section() {
		match "move_group".parse::<Section>() {
			Err(ConfigError::UnknownSection { name }) => assert_eq!(name, "move_group"),
			other => panic!("Expected UnknownSection error, got {other:?}"),
		}
	}
}
