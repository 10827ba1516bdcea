use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable listing the install prefixes searched by [`AmentIndex`].
pub const AMENT_PREFIX_PATH: &str = "AMENT_PREFIX_PATH";

/// Maps a logical package name to the directory holding its shared files.
pub trait PackageIndex {
	/// Returns the package directory, or `None` if the name is not registered.
	fn lookup(&self, name: &str) -> Option<PathBuf>;
}

/// Package index backed by the ament resource index of one or more install prefixes.
///
/// A package `name` is registered under a prefix when
/// `<prefix>/share/ament_index/resource_index/packages/<name>` exists; its
/// directory is then `<prefix>/share/<name>`. Prefixes are searched in order.
#[derive(Debug, Clone, Default)]
pub struct AmentIndex {
	prefixes: Vec<PathBuf>,
}

impl AmentIndex {
	pub fn new(prefixes: Vec<PathBuf>) -> Self {
		Self { prefixes }
	}

	/// Build an index from `AMENT_PREFIX_PATH`. An unset variable yields an empty index.
	pub fn from_env() -> Self {
		Self::from_path_var(std::env::var_os(AMENT_PREFIX_PATH))
	}

	fn from_path_var(value: Option<OsString>) -> Self {
		let prefixes = value
			.map(|value| std::env::split_paths(&value).collect())
			.unwrap_or_default();
		Self { prefixes }
	}

	pub fn prefixes(&self) -> &[PathBuf] {
		&self.prefixes
	}
}

impl PackageIndex for AmentIndex {
	fn lookup(&self, name: &str) -> Option<PathBuf> {
		self.prefixes.iter().find_map(|prefix| {
			let marker = prefix
				.join("share")
				.join("ament_index")
				.join("resource_index")
				.join("packages")
				.join(name);
			if marker.exists() {
				tracing::debug!(
					package = name,
					prefix = %prefix.display(),
					"found package in ament index"
				);
				Some(prefix.join("share").join(name))
			} else {
				None
			}
		})
	}
}

/// In-memory package index, useful when packages live outside an install tree.
#[derive(Debug, Clone, Default)]
pub struct StaticIndex {
	packages: HashMap<String, PathBuf>,
}

impl StaticIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a package directory, replacing any previous entry for `name`.
	pub fn insert(&mut self, name: impl Into<String>, dir: impl AsRef<Path>) -> &mut Self {
		self.packages
			.insert(name.into(), dir.as_ref().to_path_buf());
		self
	}

	pub fn with(mut self, name: impl Into<String>, dir: impl AsRef<Path>) -> Self {
		self.insert(name, dir);
		self
	}
}

impl PackageIndex for StaticIndex {
	fn lookup(&self, name: &str) -> Option<PathBuf> {
		self.packages.get(name).cloned()
	}
}
