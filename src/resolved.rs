use crate::error::{ConfigError, Result};
use crate::loaders::{DeferredTemplate, TemplateExpander};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Flat parameter namespace: parameter name to value.
pub type Parameters = BTreeMap<String, ParameterValue>;

/// Key under which joint limits and pilz cartesian limits are published.
pub const ROBOT_DESCRIPTION_PLANNING: &str = "robot_description_planning";

/// A resolved parameter: either loaded data or a template whose expansion was deferred.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
	Value(serde_yaml::Value),
	Deferred(DeferredTemplate),
}

impl ParameterValue {
	pub fn as_value(&self) -> Option<&serde_yaml::Value> {
		match self {
			ParameterValue::Value(value) => Some(value),
			ParameterValue::Deferred(_) => None,
		}
	}

	/// The text of a plain string value.
	pub fn as_text(&self) -> Option<&str> {
		self.as_value().and_then(serde_yaml::Value::as_str)
	}

	pub fn as_deferred(&self) -> Option<&DeferredTemplate> {
		match self {
			ParameterValue::Deferred(template) => Some(template),
			ParameterValue::Value(_) => None,
		}
	}

	/// Resolve to text, evaluating a deferred template with `expander`.
	pub fn resolve_text(&self, expander: &dyn TemplateExpander) -> Option<Result<String>> {
		match self {
			ParameterValue::Value(value) => value.as_str().map(|s| Ok(s.to_string())),
			ParameterValue::Deferred(template) => Some(template.evaluate(expander)),
		}
	}
}

impl From<serde_yaml::Value> for ParameterValue {
	fn from(value: serde_yaml::Value) -> Self {
		ParameterValue::Value(value)
	}
}

impl From<String> for ParameterValue {
	fn from(value: String) -> Self {
		ParameterValue::Value(serde_yaml::Value::String(value))
	}
}

impl From<DeferredTemplate> for ParameterValue {
	fn from(template: DeferredTemplate) -> Self {
		ParameterValue::Deferred(template)
	}
}

/// Split a loaded YAML document into top-level parameters.
///
/// An empty document yields no parameters; any other non-mapping is an error.
pub fn into_parameters(value: serde_yaml::Value, path: &Path) -> Result<Parameters> {
	let mapping = match value {
		serde_yaml::Value::Null => return Ok(Parameters::new()),
		serde_yaml::Value::Mapping(mapping) => mapping,
		_ => {
			return Err(ConfigError::NotAMapping {
				path: path.to_path_buf(),
			});
		}
	};

	let mut parameters = Parameters::new();
	for (key, value) in mapping {
		let key = match key {
			serde_yaml::Value::String(key) => key,
			serde_yaml::Value::Number(key) => key.to_string(),
			serde_yaml::Value::Bool(key) => key.to_string(),
			_ => {
				return Err(ConfigError::NotAMapping {
					path: path.to_path_buf(),
				});
			}
		};
		parameters.insert(key, ParameterValue::Value(value));
	}
	Ok(parameters)
}

/// MoveIt parameters loaded from a configuration package.
///
/// Each field holds the parameters of one section; unloaded sections stay empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveItConfigs {
	/// Directory of the configuration package.
	pub package_path: Option<PathBuf>,
	/// The expanded URDF.
	pub robot_description: Parameters,
	/// The expanded SRDF.
	pub robot_description_semantic: Parameters,
	/// IK solver parameters.
	pub robot_description_kinematics: Parameters,
	/// Planning pipeline names, the default pipeline and each pipeline's parameters.
	pub planning_pipelines: Parameters,
	/// Trajectory execution and controller manager parameters.
	pub trajectory_execution: Parameters,
	/// 3D sensor parameters.
	pub sensors_3d: Parameters,
	/// Joint limit overrides.
	pub joint_limits: Parameters,
	/// MoveItCpp parameters.
	pub moveit_cpp: Parameters,
	/// Cartesian limits for the Pilz planner.
	pub pilz_cartesian_limits: Parameters,
}

impl MoveItConfigs {
	/// Merge all parameters into one namespace.
	///
	/// Later sections win on key collisions; pilz cartesian limits are folded
	/// into `robot_description_planning`.
	pub fn to_dict(&self) -> Parameters {
		let mut parameters = Parameters::new();
		for section in [
			&self.robot_description,
			&self.robot_description_semantic,
			&self.robot_description_kinematics,
			&self.planning_pipelines,
			&self.trajectory_execution,
			&self.sensors_3d,
			&self.joint_limits,
			&self.moveit_cpp,
		] {
			parameters.extend(section.iter().map(|(k, v)| (k.clone(), v.clone())));
		}

		if !self.pilz_cartesian_limits.is_empty() {
			merge_planning_limits(&mut parameters, &self.pilz_cartesian_limits);
		}
		parameters
	}
}

fn merge_planning_limits(parameters: &mut Parameters, limits: &Parameters) {
	let entry = parameters
		.entry(ROBOT_DESCRIPTION_PLANNING.to_string())
		.or_insert_with(|| ParameterValue::Value(serde_yaml::Mapping::new().into()));

	if !matches!(entry, ParameterValue::Value(serde_yaml::Value::Mapping(_))) {
		*entry = ParameterValue::Value(serde_yaml::Value::Mapping(Default::default()));
	}
	let ParameterValue::Value(serde_yaml::Value::Mapping(planning)) = entry else {
		return;
	};

	for (key, value) in limits {
		let value = match value {
			ParameterValue::Value(value) => value.clone(),
			ParameterValue::Deferred(_) => continue,
		};
		planning.insert(serde_yaml::Value::String(key.clone()), value);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn yaml(content: &str) -> serde_yaml::Value {
		serde_yaml::from_str(content).unwrap()
	}

	fn params(content: &str) -> Parameters {
		into_parameters(yaml(content), Path::new("test.yaml")).unwrap()
	}

	#[test]
	fn test_into_parameters() {
		let parameters = params("moveit_manage_controllers: true\n1: one\n");
		assert_eq!(
			parameters["moveit_manage_controllers"],
			ParameterValue::Value(serde_yaml::Value::Bool(true))
		);
		assert!(parameters.contains_key("1"));

		let empty = into_parameters(serde_yaml::Value::Null, Path::new("empty.yaml"));
		assert!(empty.unwrap().is_empty());
		let list = into_parameters(yaml("- a\n- b\n"), Path::new("list.yaml"));
		assert!(matches!(list, Err(ConfigError::NotAMapping { .. })));
	}

	#[test]
	fn test_to_dict_later_sections_win() {
		let configs = MoveItConfigs {
			trajectory_execution: params(
				"shared: from_trajectory\nallowed_execution_duration_scaling: 1.2\n",
			),
			moveit_cpp: params("shared: from_moveit_cpp\n"),
			..Default::default()
		};

		let dict = configs.to_dict();
		assert_eq!(dict["shared"].as_text(), Some("from_moveit_cpp"));
		assert!(dict.contains_key("allowed_execution_duration_scaling"));
		assert_eq!(dict, configs.to_dict());
	}

	#[test]
	fn test_pilz_limits_fold_into_joint_limits() {
		let limits = yaml("joint_limits:\n  joint1:\n    has_velocity_limits: true\n");
		let mut joint_limits = Parameters::new();
		joint_limits.insert(
			ROBOT_DESCRIPTION_PLANNING.to_string(),
			ParameterValue::Value(limits),
		);
		let configs = MoveItConfigs {
			joint_limits,
			pilz_cartesian_limits: params("cartesian_limits:\n  max_trans_vel: 1.0\n"),
			..Default::default()
		};

		let dict = configs.to_dict();
		let planning = dict[ROBOT_DESCRIPTION_PLANNING].as_value().unwrap();
		assert!(planning.get("joint_limits").is_some());
		assert_eq!(
			planning["cartesian_limits"]["max_trans_vel"].as_f64(),
			Some(1.0)
		);
		assert!(!dict.contains_key("cartesian_limits"));
	}

	#[test]
	fn test_pilz_limits_without_joint_limits() {
		let configs = MoveItConfigs {
			pilz_cartesian_limits: params("cartesian_limits:\n  max_rot_vel: 1.57\n"),
			..Default::default()
		};

		let dict = configs.to_dict();
		let planning = dict[ROBOT_DESCRIPTION_PLANNING].as_value().unwrap();
		assert_eq!(
			planning["cartesian_limits"]["max_rot_vel"].as_f64(),
			Some(1.57)
		);
		assert_eq!(dict, configs.to_dict());
	}

	#[test]
	fn test_empty_configs_to_empty_dict() {
		assert!(MoveItConfigs::default().to_dict().is_empty());
	}
}
