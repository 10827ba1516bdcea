//! File loaders for moveit-configs.
//!
//! This module handles:
//! - Text substitution of `$(arg ..)`, `$(find ..)` and `$(env ..)` directives
//! - Structured (YAML) parameter files
//! - Template expansion of robot descriptions, eager or deferred

pub mod substitution;
pub mod template;
pub mod yaml;

pub use substitution::{Directive, Substitutor, is_plain_text, render_value};
pub use template::{ArgExpander, DeferredTemplate};
pub use yaml::YamlLoader;

use crate::config::Mappings;
use crate::error::Result;
use std::path::Path;

/// Loads a structured-markup file into a parameter tree.
pub trait StructuredLoader {
	fn load(&self, path: &Path, mappings: &Mappings) -> Result<serde_yaml::Value>;
}

/// Expands a template file into text.
pub trait TemplateExpander {
	fn expand(&self, path: &Path, mappings: &Mappings) -> Result<String>;
}
