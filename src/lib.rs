//! moveit-configs - builder for MoveIt configuration packages.
//!
//! This library provides:
//! - `moveit_configs.toml` manifest parsing with `extends` inheritance
//! - Package lookup through the ament index or a custom [`PackageIndex`]
//! - A chainable builder selecting which sections to load
//! - YAML loading and template expansion with `$(arg ..)` substitutions
//!
//! # Example
//!
//! ```no_run
//! use moveit_configs::MoveItConfigsBuilder;
//!
//! let configs = MoveItConfigsBuilder::new("panda_moveit_config")?
//!     .load_all()?
//!     .build()?;
//!
//! for (name, value) in configs.to_dict() {
//!     println!("{name}: {value:?}");
//! }
//! # Ok::<(), moveit_configs::ConfigError>(())
//! ```

pub mod builder;
pub mod config;
pub mod entry;
pub mod error;
pub mod loaders;
pub mod logging;
pub mod materialize;
pub mod package;
pub mod resolved;
pub mod section;

pub use builder::MoveItConfigsBuilder;
pub use config::{Manifest, Mappings};
pub use entry::{ConfigEntry, PlanningPipelinesEntry};
pub use error::{ConfigError, Result};
pub use package::{AmentIndex, PackageIndex, RootRef, StaticIndex};
pub use resolved::{MoveItConfigs, ParameterValue, Parameters};
pub use section::Section;
