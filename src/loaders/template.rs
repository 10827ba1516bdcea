use crate::config::Mappings;
use crate::error::{ConfigError, Result};
use crate::loaders::TemplateExpander;
use crate::loaders::substitution::{Substitutor, render_value};
use crate::package::PackageIndex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Expands `$(arg ..)`, `$(find ..)` and `$(env ..)` in description templates.
///
/// Mapping values are rendered to text before substitution, so typed values
/// expand the same way whether expanded eagerly or through a [`DeferredTemplate`].
#[derive(Debug, Clone)]
pub struct ArgExpander {
	substitutor: Substitutor,
}

impl ArgExpander {
	pub fn new(index: Arc<dyn PackageIndex>) -> Self {
		Self {
			substitutor: Substitutor::new(index),
		}
	}
}

impl TemplateExpander for ArgExpander {
	fn expand(&self, path: &Path, mappings: &Mappings) -> Result<String> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), "expanding template");
		self.substitutor.apply(&content, mappings, path)
	}
}

/// A template expansion postponed until the caller decides to evaluate it.
///
/// Produced for description sections whose mappings hold typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredTemplate {
	path: PathBuf,
	mappings: Mappings,
}

impl DeferredTemplate {
	pub fn new(path: impl Into<PathBuf>, mappings: Mappings) -> Self {
		Self {
			path: path.into(),
			mappings,
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn mappings(&self) -> &Mappings {
		&self.mappings
	}

	/// Mappings with every value rendered to plain text.
	pub fn text_mappings(&self) -> Mappings {
		self.mappings
			.iter()
			.map(|(key, value)| (key.clone(), toml::Value::String(render_value(value))))
			.collect()
	}

	/// Expand the template now.
	pub fn evaluate(&self, expander: &dyn TemplateExpander) -> Result<String> {
		expander.expand(&self.path, &self.text_mappings())
	}
}
