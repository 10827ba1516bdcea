use crate::config::types::Manifest;
use crate::error::{ConfigError, Result};
use crate::section::MANIFEST_FILE_NAME;
use std::path::{Path, PathBuf};

/// The manifest file a location refers to: the file itself, or the
/// `moveit_configs.toml` inside a directory. The file may not exist.
pub fn manifest_file(location: &Path) -> PathBuf {
	if location.is_file() {
		location.to_path_buf()
	} else {
		location.join(MANIFEST_FILE_NAME)
	}
}

/// Load the manifest found at `location`.
///
/// `location` is either a manifest file or a package directory; a directory
/// without a `moveit_configs.toml` yields an empty manifest.
pub fn load_manifest(location: &Path) -> Result<Manifest> {
	let file = manifest_file(location);
	let root = if location.is_file() {
		location
			.parent()
			.map(Path::to_path_buf)
			.unwrap_or_else(|| PathBuf::from("."))
	} else {
		location.to_path_buf()
	};

	if !file.is_file() {
		tracing::debug!(root = %root.display(), "no manifest found");
		return Ok(Manifest::empty(root));
	}

	parse_manifest_file(&file, root)
}

/// Parse a manifest file whose relative paths resolve against `root`.
pub fn parse_manifest_file(path: &Path, root: PathBuf) -> Result<Manifest> {
	let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ManifestRead {
		path: path.to_path_buf(),
		source,
	})?;

	let mut manifest = parse_manifest_str(&content, path)?;
	manifest.root = root;
	tracing::debug!(manifest = %path.display(), "loaded manifest");
	Ok(manifest)
}

/// Parse a manifest from a string (useful for testing).
///
/// The root defaults to the parent directory of `path`.
pub fn parse_manifest_str(content: &str, path: &Path) -> Result<Manifest> {
	let table: toml::Table =
		toml::from_str(content).map_err(|source| ConfigError::ManifestParse {
			path: path.to_path_buf(),
			source,
		})?;

	Ok(Manifest {
		root: path
			.parent()
			.map(Path::to_path_buf)
			.unwrap_or_else(|| PathBuf::from(".")),
		source: Some(path.to_path_buf()),
		table,
	})
}
