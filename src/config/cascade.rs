use crate::config::parser::{load_manifest, manifest_file};
use crate::config::types::Manifest;
use crate::error::{ConfigError, Result};
use crate::package::{PackageIndex, RootRef, locate, normalize, resolve_root};
use crate::section::Section;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Load the manifest of `root` and fill its missing sections from the roots it extends.
pub fn load_extended_manifest(root: &RootRef, index: &dyn PackageIndex) -> Result<Manifest> {
	let location = locate(root, index)?;
	let root_dir = resolve_root(root, index)?;
	let mut manifest = load_manifest(&location)?;
	manifest.root = root_dir;
	extend_manifest(manifest, index)
}

/// Fill the sections missing from `manifest` by walking its `extends` chain.
///
/// The walk is:
/// 1. Stop when no data section is missing or no `extends` is declared
/// 2. Resolve `extends` relative to the current root, falling back to a package name
/// 3. Copy each missing section the base declares, with paths made absolute
///    against the base root, plus its substitution table
/// 4. Continue from the base root with whatever `extends` it declared
///
/// Sections already present are never overwritten. Loading the same manifest
/// file twice fails with [`ConfigError::CyclicExtension`]; several manifest
/// files may share one root.
pub fn extend_manifest(mut manifest: Manifest, index: &dyn PackageIndex) -> Result<Manifest> {
	let mut current_root = manifest.root.clone();
	let mut chain = vec![manifest.location()];
	let mut visited = HashSet::from([canonical(&manifest.location())]);

	loop {
		let missing = manifest.missing_sections();
		if missing.is_empty() {
			break;
		}
		let Some(target) = manifest.extends().cloned() else {
			break;
		};

		let base_ref = extends_target(&current_root, &target)?;
		let base_location = locate(&base_ref, index)?;
		let base_root = resolve_root(&base_ref, index)?;

		let base_file = manifest_file(&base_location);
		chain.push(base_file.clone());
		if !visited.insert(canonical(&base_file)) {
			return Err(ConfigError::CyclicExtension { chain });
		}

		let base = load_manifest(&base_location)?;
		manifest.take_extends();
		let inherited = inherit_sections(&mut manifest, &base, &base_root, &missing, index)?;
		tracing::info!(
			root = %current_root.display(),
			base = %base_root.display(),
			sections = ?inherited,
			"inherited sections from base"
		);

		current_root = base_root;
	}

	Ok(manifest)
}

/// Copy `missing` sections from `base` into `manifest`.
///
/// The base's own `extends` is carried over only while sections are still missing.
fn inherit_sections(
	manifest: &mut Manifest,
	base: &Manifest,
	base_root: &Path,
	missing: &[Section],
	index: &dyn PackageIndex,
) -> Result<Vec<Section>> {
	let mut inherited = Vec::new();

	for &section in missing {
		let Some(value) = base.section_value(section) else {
			continue;
		};
		let resolved = rebase_value(section, value, base_root, index)?;

		if let Some(configs) = manifest.configs_mut() {
			configs.insert(section.as_str().to_string(), resolved);
		}
		if let Some(substitutions) = base.substitutions(section) {
			manifest
				.table
				.insert(section.as_str().to_string(), substitutions.clone());
		}
		inherited.push(section);
	}

	if !manifest.missing_sections().is_empty()
		&& let Some(base_extends) = base.extends()
		&& let Some(configs) = manifest.configs_mut()
	{
		configs.insert(Section::Extends.as_str().to_string(), base_extends.clone());
	}

	Ok(inherited)
}

/// Make an inherited section value absolute with respect to the base root.
fn rebase_value(
	section: Section,
	value: &toml::Value,
	base_root: &Path,
	index: &dyn PackageIndex,
) -> Result<toml::Value> {
	match value {
		toml::Value::String(path) => rebase_path(path, base_root, index),
		toml::Value::Table(variants) => {
			let mut rebased = toml::Table::new();
			for (key, variant) in variants {
				let variant = match variant {
					toml::Value::String(path) => rebase_path(path, base_root, index)?,
					other => other.clone(),
				};
				rebased.insert(key.clone(), variant);
			}
			Ok(toml::Value::Table(rebased))
		}
		_ => Err(ConfigError::InvalidSectionType {
			section: section.to_string(),
			root: base_root.to_path_buf(),
		}),
	}
}

fn rebase_path(path: &str, base_root: &Path, index: &dyn PackageIndex) -> Result<toml::Value> {
	let absolute = base_root.join(normalize(path, index)?);
	Ok(toml::Value::String(absolute.to_string_lossy().into_owned()))
}

/// Interpret an `extends` value declared by the manifest at `root`.
///
/// A path relative to `root` wins if it exists; otherwise it names a package.
fn extends_target(root: &Path, target: &toml::Value) -> Result<RootRef> {
	let Some(target) = target.as_str() else {
		return Err(ConfigError::InvalidSectionType {
			section: Section::Extends.to_string(),
			root: root.to_path_buf(),
		});
	};

	let candidate = root.join(target);
	if candidate.exists() {
		Ok(RootRef::Path(candidate))
	} else {
		Ok(RootRef::Package(target.to_string()))
	}
}

fn canonical(path: &Path) -> PathBuf {
	path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
