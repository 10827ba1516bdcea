use crate::config::Mappings;
use crate::error::{ConfigError, Result};
use crate::loaders::StructuredLoader;
use crate::loaders::substitution::Substitutor;
use crate::package::PackageIndex;
use std::path::Path;
use std::sync::Arc;

/// Loads YAML parameter files after applying text substitutions.
#[derive(Debug, Clone)]
pub struct YamlLoader {
	substitutor: Substitutor,
}

impl YamlLoader {
	pub fn new(index: Arc<dyn PackageIndex>) -> Self {
		Self {
			substitutor: Substitutor::new(index),
		}
	}

	/// Parse YAML text, applying substitutions first (useful for testing).
	pub fn load_str(
		&self,
		content: &str,
		path: &Path,
		mappings: &Mappings,
	) -> Result<serde_yaml::Value> {
		let content = self.substitutor.apply(content, mappings, path)?;
		serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
			path: path.to_path_buf(),
			source,
		})
	}
}

impl StructuredLoader for YamlLoader {
	fn load(&self, path: &Path, mappings: &Mappings) -> Result<serde_yaml::Value> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), "loading yaml");
		self.load_str(&content, path, mappings)
	}
}
