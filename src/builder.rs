use crate::config::{Manifest, Mappings, load_extended_manifest};
use crate::entry::{ConfigEntry, PlanningPipelinesEntry};
use crate::error::{ConfigError, Result};
use crate::loaders::{ArgExpander, StructuredLoader, TemplateExpander, YamlLoader};
use crate::materialize::{Materializer, Slots};
use crate::package::{AmentIndex, PackageIndex, RootRef, expand_home};
use crate::resolved::MoveItConfigs;
use crate::section::Section;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads a section from the manifest with no explicit file.
type SectionHandler = fn(&mut MoveItConfigsBuilder) -> Result<()>;

/// Default-loading handler for every data section, in canonical order.
const SECTION_HANDLERS: [(Section, SectionHandler); 9] = [
	(Section::RobotDescription, |b| {
		b.robot_description(None, None).map(drop)
	}),
	(Section::RobotDescriptionSemantic, |b| {
		b.robot_description_semantic(None, None).map(drop)
	}),
	(Section::Sensors, |b| b.sensors(None, None).map(drop)),
	(Section::MoveitCpp, |b| b.moveit_cpp(None, None).map(drop)),
	(Section::RobotDescriptionKinematics, |b| {
		b.robot_description_kinematics(None, None).map(drop)
	}),
	(Section::JointLimits, |b| {
		b.joint_limits(None, None).map(drop)
	}),
	(Section::TrajectoryExecution, |b| {
		b.trajectory_execution(None, None).map(drop)
	}),
	(Section::PlanningPipelines, |b| {
		b.planning_pipelines(None, None, None).map(drop)
	}),
	(Section::PilzCartesianLimits, |b| {
		b.pilz_cartesian_limits(None, None).map(drop)
	}),
];

fn handler_for(section: Section) -> Option<SectionHandler> {
	SECTION_HANDLERS
		.iter()
		.find(|(candidate, _)| *candidate == section)
		.map(|(_, handler)| *handler)
}

/// Builds [`MoveItConfigs`] from a MoveIt configuration package.
///
/// Every section method takes an optional file path (relative to the
/// package, absolute, or `~`-prefixed) and optional mappings. Without a path
/// the section comes from the package's `moveit_configs.toml`, including
/// anything inherited through `extends`.
///
/// ```no_run
/// use moveit_configs::MoveItConfigsBuilder;
/// use std::path::Path;
///
/// let configs = MoveItConfigsBuilder::new("panda_moveit_config")?
///     .robot_description(None, None)?
///     .robot_description_semantic(Some(Path::new("config/panda.srdf")), None)?
///     .planning_pipelines(None, Some("ompl"), None)?
///     .build()?;
/// let parameters = configs.to_dict();
/// # Ok::<(), moveit_configs::ConfigError>(())
/// ```
pub struct MoveItConfigsBuilder {
	package_path: PathBuf,
	manifest: Manifest,
	index: Arc<dyn PackageIndex>,
	structured: Box<dyn StructuredLoader>,
	template: Box<dyn TemplateExpander>,
	slots: Slots,
}

impl MoveItConfigsBuilder {
	/// Resolve `root` through the ament index of `AMENT_PREFIX_PATH`.
	pub fn new(root: impl Into<RootRef>) -> Result<Self> {
		Self::with_index(root, Arc::new(AmentIndex::from_env()))
	}

	/// Resolve `root` through a custom package index.
	pub fn with_index(root: impl Into<RootRef>, index: Arc<dyn PackageIndex>) -> Result<Self> {
		let root = root.into();
		let manifest = load_extended_manifest(&root, index.as_ref())?;
		let package_path = manifest.root.clone();
		tracing::debug!(
			package = %package_path.display(),
			sections = ?manifest.present_sections(),
			"resolved manifest"
		);

		Ok(Self {
			package_path,
			manifest,
			structured: Box::new(YamlLoader::new(Arc::clone(&index))),
			template: Box::new(ArgExpander::new(Arc::clone(&index))),
			index,
			slots: Slots::default(),
		})
	}

	/// Replace the loaders used by [`build`](Self::build).
	pub fn with_loaders(
		mut self,
		structured: Box<dyn StructuredLoader>,
		template: Box<dyn TemplateExpander>,
	) -> Self {
		self.structured = structured;
		self.template = template;
		self
	}

	pub fn package_path(&self) -> &Path {
		&self.package_path
	}

	/// The manifest after inheritance.
	pub fn manifest(&self) -> &Manifest {
		&self.manifest
	}

	/// The entry currently set for `section`.
	pub fn entry(&self, section: Section) -> Option<&ConfigEntry> {
		self.slots.entries.get(&section)
	}

	pub fn planning_pipelines_entry(&self) -> Option<&PlanningPipelinesEntry> {
		self.slots.planning_pipelines.as_ref()
	}

	/// Load the URDF (template expanded).
	pub fn robot_description(
		&mut self,
		file_path: Option<&Path>,
		mappings: Option<Mappings>,
	) -> Result<&mut Self> {
		self.set_entry(Section::RobotDescription, file_path, mappings)
	}

	/// Load the SRDF (template expanded).
	pub fn robot_description_semantic(
		&mut self,
		file_path: Option<&Path>,
		mappings: Option<Mappings>,
	) -> Result<&mut Self> {
		self.set_entry(Section::RobotDescriptionSemantic, file_path, mappings)
	}

	/// Load IK solver parameters.
	pub fn robot_description_kinematics(
		&mut self,
		file_path: Option<&Path>,
		mappings: Option<Mappings>,
	) -> Result<&mut Self> {
		self.set_entry(Section::RobotDescriptionKinematics, file_path, mappings)
	}

	/// Load joint limit overrides.
	pub fn joint_limits(
		&mut self,
		file_path: Option<&Path>,
		mappings: Option<Mappings>,
	) -> Result<&mut Self> {
		self.set_entry(Section::JointLimits, file_path, mappings)
	}

	/// Load MoveItCpp parameters.
	pub fn moveit_cpp(
		&mut self,
		file_path: Option<&Path>,
		mappings: Option<Mappings>,
	) -> Result<&mut Self> {
		self.set_entry(Section::MoveitCpp, file_path, mappings)
	}

	/// Load trajectory execution and controller manager parameters.
	pub fn trajectory_execution(
		&mut self,
		file_path: Option<&Path>,
		mappings: Option<Mappings>,
	) -> Result<&mut Self> {
		self.set_entry(Section::TrajectoryExecution, file_path, mappings)
	}

	/// Load 3D sensor parameters.
	pub fn sensors(
		&mut self,
		file_path: Option<&Path>,
		mappings: Option<Mappings>,
	) -> Result<&mut Self> {
		self.set_entry(Section::Sensors, file_path, mappings)
	}

	/// Load the Pilz planner's cartesian limits.
	pub fn pilz_cartesian_limits(
		&mut self,
		file_path: Option<&Path>,
		mappings: Option<Mappings>,
	) -> Result<&mut Self> {
		self.set_entry(Section::PilzCartesianLimits, file_path, mappings)
	}

	/// Load planning pipelines.
	///
	/// Explicit `pipelines` load `config/<name>_planning.yaml` from the package,
	/// each with `mappings`. Otherwise every pipeline declared in the manifest
	/// is loaded. The default pipeline falls back to `ompl` when present.
	pub fn planning_pipelines(
		&mut self,
		pipelines: Option<&[&str]>,
		default_pipeline: Option<&str>,
		mappings: Option<Mappings>,
	) -> Result<&mut Self> {
		let entries = match pipelines {
			Some(names) => names
				.iter()
				.map(|name| {
					let path = self
						.package_path
						.join("config")
						.join(format!("{name}_planning.yaml"));
					ConfigEntry::from_file(path, mappings.clone())
						.map(|entry| (name.to_string(), entry))
				})
				.collect::<Result<Vec<_>>>()?,
			None => {
				let names = self.manifest_pipeline_names()?;
				names
					.into_iter()
					.map(|name| {
						ConfigEntry::from_section(
							&self.manifest,
							Section::PlanningPipelines,
							Some(&name),
							self.index.as_ref(),
						)
						.map(|entry| (name, entry.with_overrides(mappings.clone())))
					})
					.collect::<Result<Vec<_>>>()?
			}
		};

		let pipelines = PlanningPipelinesEntry::new(entries, default_pipeline)?;
		self.slots.planning_pipelines = Some(pipelines);
		Ok(self)
	}

	/// Load every section declared in the manifest.
	///
	/// A package without any manifest loads nothing and only logs a warning.
	pub fn load_all(&mut self) -> Result<&mut Self> {
		if self.manifest.is_empty() {
			tracing::warn!(
				package = %self.package_path.display(),
				"Request to load all configs, but no moveit_configs.toml was found"
			);
		}

		for section in self.manifest.present_sections() {
			if let Some(handler) = handler_for(section) {
				handler(self)?;
			}
		}
		Ok(self)
	}

	/// Load every configured entry into [`MoveItConfigs`].
	///
	/// Files are re-read on each call.
	pub fn build(&self) -> Result<MoveItConfigs> {
		let materializer = Materializer {
			structured: self.structured.as_ref(),
			template: self.template.as_ref(),
		};
		materializer.materialize(self.package_path.clone(), &self.slots)
	}

	fn set_entry(
		&mut self,
		section: Section,
		file_path: Option<&Path>,
		mappings: Option<Mappings>,
	) -> Result<&mut Self> {
		let entry = match file_path {
			Some(path) => {
				let path = self.package_path.join(expand_home(path)?);
				ConfigEntry::from_file(path, mappings)?
			}
			None => {
				let index = self.index.as_ref();
				ConfigEntry::from_section(&self.manifest, section, None, index)?
					.with_overrides(mappings)
			}
		};
		self.slots.entries.insert(section, entry);
		Ok(self)
	}

	fn manifest_pipeline_names(&self) -> Result<Vec<String>> {
		let section = Section::PlanningPipelines;
		if self.manifest.is_empty() {
			return Err(ConfigError::ManifestNotLoaded {
				section: section.to_string(),
			});
		}
		match self.manifest.section_value(section) {
			Some(toml::Value::Table(variants)) => Ok(variants.keys().cloned().collect()),
			Some(_) => Err(ConfigError::InvalidSectionType {
				section: section.to_string(),
				root: self.package_path.clone(),
			}),
			None => Err(ConfigError::SectionMissing {
				section: section.to_string(),
				manifest: self.manifest.location(),
			}),
		}
	}
}

impl std::fmt::Debug for MoveItConfigsBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MoveItConfigsBuilder")
			.field("package_path", &self.package_path)
			.field("manifest", &self.manifest)
			.field("slots", &self.slots)
			.finish_non_exhaustive()
	}
}
