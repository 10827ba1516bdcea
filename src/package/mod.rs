//! Package and path resolution for moveit-configs.
//!
//! This module handles:
//! - Looking up logical package names through a [`PackageIndex`]
//! - Resolving a package name or filesystem path to its root directory
//! - Expanding `package://` URIs and `~` prefixes

pub mod index;

pub use index::{AMENT_PREFIX_PATH, AmentIndex, PackageIndex, StaticIndex};

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

const PACKAGE_SCHEME: &str = "package://";

/// Reference to a configuration root: a logical package name or a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootRef {
	Package(String),
	Path(PathBuf),
}

impl From<&str> for RootRef {
	fn from(name: &str) -> Self {
		RootRef::Package(name.to_string())
	}
}

impl From<String> for RootRef {
	fn from(name: String) -> Self {
		RootRef::Package(name)
	}
}

impl From<&Path> for RootRef {
	fn from(path: &Path) -> Self {
		RootRef::Path(path.to_path_buf())
	}
}

impl From<PathBuf> for RootRef {
	fn from(path: PathBuf) -> Self {
		RootRef::Path(path)
	}
}

impl From<&PathBuf> for RootRef {
	fn from(path: &PathBuf) -> Self {
		RootRef::Path(path.clone())
	}
}

/// Get the full path a root refers to: the package directory, or the given path.
///
/// The returned path may be a file (e.g. a manifest passed directly).
pub fn locate(root: &RootRef, index: &dyn PackageIndex) -> Result<PathBuf> {
	match root {
		RootRef::Package(name) => index
			.lookup(name)
			.ok_or_else(|| ConfigError::PackageNotFound { name: name.clone() }),
		RootRef::Path(path) => {
			let path = expand_home(path)?;
			if path.exists() {
				Ok(path)
			} else {
				Err(ConfigError::RootPathNotFound { path })
			}
		}
	}
}

/// Resolve a root to its directory. A path to a file resolves to its parent.
pub fn resolve_root(root: &RootRef, index: &dyn PackageIndex) -> Result<PathBuf> {
	let full_path = locate(root, index)?;
	if full_path.is_file() {
		Ok(full_path
			.parent()
			.map(Path::to_path_buf)
			.unwrap_or(full_path))
	} else {
		Ok(full_path)
	}
}

/// Normalize a manifest path value.
///
/// `package://name/relative/path` becomes `<name's directory>/relative/path`;
/// anything else is returned unchanged for the caller to join against a root.
pub fn normalize(value: &str, index: &dyn PackageIndex) -> Result<PathBuf> {
	let Some(rest) = value.strip_prefix(PACKAGE_SCHEME) else {
		return Ok(PathBuf::from(value));
	};

	let (name, relative) = rest.split_once('/').unwrap_or((rest, ""));
	if name.is_empty() {
		return Err(ConfigError::InvalidPackageUri {
			value: value.to_string(),
		});
	}

	let package_dir = resolve_root(&RootRef::Package(name.to_string()), index)?;
	if relative.is_empty() {
		Ok(package_dir)
	} else {
		Ok(package_dir.join(relative))
	}
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
	match path.strip_prefix("~") {
		Ok(rest) => {
			let home_dir = dirs::home_dir().ok_or(ConfigError::HomeDirectoryNotFound)?;
			Ok(home_dir.join(rest))
		}
		Err(_) => Ok(path.to_path_buf()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn test_locate_unknown_package() {
		let index = StaticIndex::new();
		match locate(&RootRef::from("ghost_moveit_config"), &index) {
			Err(ConfigError::PackageNotFound { name }) => assert_eq!(name, "ghost_moveit_config"),
			other => panic!("Expected PackageNotFound error, got {other:?}"),
		}
	}

	#[test]
	fn test_locate_missing_path() {
		let temp_dir = tempfile::tempdir().unwrap();
		let missing = temp_dir.path().join("nope");
		match locate(&RootRef::from(missing.as_path()), &StaticIndex::new()) {
			Err(ConfigError::RootPathNotFound { path }) => assert_eq!(path, missing),
			other => panic!("Expected RootPathNotFound error, got {other:?}"),
		}
	}

	#[test]
	fn test_resolve_root_of_file_is_parent() {
		let temp_dir = tempfile::tempdir().unwrap();
		let manifest = temp_dir.path().join("moveit_configs.toml");
		fs::write(&manifest, "").unwrap();

		let root = resolve_root(&RootRef::from(manifest), &StaticIndex::new()).unwrap();
		assert_eq!(root, temp_dir.path());
	}

	#[test]
	fn test_resolve_root_of_package() {
		let temp_dir = tempfile::tempdir().unwrap();
		let index = StaticIndex::new().with("robot", temp_dir.path());
		let root = resolve_root(&RootRef::from("robot"), &index).unwrap();
		assert_eq!(root, temp_dir.path());
	}

	#[test]
	fn test_normalize_plain_value_unchanged() {
		let index = StaticIndex::new();
		assert_eq!(
			normalize("config/kinematics.yaml", &index).unwrap(),
			PathBuf::from("config/kinematics.yaml")
		);
		assert_eq!(
			normalize("/abs/kinematics.yaml", &index).unwrap(),
			PathBuf::from("/abs/kinematics.yaml")
		);
	}

	#[test]
	fn test_normalize_package_uri() {
		let temp_dir = tempfile::tempdir().unwrap();
		let index = StaticIndex::new().with("robot_description", temp_dir.path());

		assert_eq!(
			normalize("package://robot_description/urdf/robot.urdf.xacro", &index).unwrap(),
			temp_dir.path().join("urdf/robot.urdf.xacro")
		);
		assert_eq!(
			normalize("package://robot_description", &index).unwrap(),
			temp_dir.path()
		);
	}

	#[test]
	fn test_normalize_invalid_package_uri() {
		let result = normalize("package:///config/x.yaml", &StaticIndex::new());
		assert!(matches!(
			result,
			Err(ConfigError::InvalidPackageUri { .. })
		));
	}

	#[test]
	fn test_normalize_unknown_package_uri() {
		let result = normalize("package://missing/x.yaml", &StaticIndex::new());
		assert!(matches!(result, Err(ConfigError::PackageNotFound { .. })));
	}

	#[test]
	fn test_expand_home() {
		let relative = Path::new("config/x.yaml");
		assert_eq!(expand_home(relative).unwrap(), relative);

		if let Some(home) = dirs::home_dir() {
			assert_eq!(
				expand_home(Path::new("~/robot/config")).unwrap(),
				home.join("robot/config")
			);
		}
	}
}
