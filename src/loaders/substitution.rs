use crate::config::Mappings;
use crate::error::{ConfigError, Result};
use crate::package::{PackageIndex, RootRef, resolve_root};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Matches `$(directive argument)`, e.g. `$(arg robot_ip)` or `$(find my_robot)`.
static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\$\((\w+)\s+([^()\s]+)\s*\)").expect("directive pattern is valid")
});

/// A substitution directive recognized inside configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
	/// `$(arg NAME)`: a value from the entry's mappings.
	Arg,
	/// `$(find PACKAGE)`: the package's directory.
	Find,
	/// `$(env VAR)`: an environment variable.
	Env,
}

impl Directive {
	fn parse(name: &str) -> Option<Self> {
		match name {
			"arg" => Some(Directive::Arg),
			"find" => Some(Directive::Find),
			"env" => Some(Directive::Env),
			_ => None,
		}
	}
}

/// Render a mapping value as substitution text.
///
/// Strings are used verbatim; everything else uses its TOML form.
pub fn render_value(value: &toml::Value) -> String {
	match value {
		toml::Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// True when every mapping value is plain text.
pub fn is_plain_text(mappings: &Mappings) -> bool {
	mappings.values().all(toml::Value::is_str)
}

/// Text substitution shared by the YAML loader and the template expander.
///
/// Unknown directives are left untouched so that files meant for a fuller
/// template engine still pass through.
#[derive(Clone)]
pub struct Substitutor {
	index: Arc<dyn PackageIndex>,
}

impl Substitutor {
	pub fn new(index: Arc<dyn PackageIndex>) -> Self {
		Self { index }
	}

	/// Apply all directives in `input`. `path` is only used for error messages.
	pub fn apply(&self, input: &str, mappings: &Mappings, path: &Path) -> Result<String> {
		let mut output = String::with_capacity(input.len());
		let mut last = 0;

		for captures in DIRECTIVE.captures_iter(input) {
			let Some(whole) = captures.get(0) else {
				continue;
			};
			output.push_str(&input[last..whole.start()]);
			match self.resolve(&captures, mappings, path)? {
				Some(replacement) => output.push_str(&replacement),
				None => output.push_str(whole.as_str()),
			}
			last = whole.end();
		}

		output.push_str(&input[last..]);
		Ok(output)
	}

	fn resolve(
		&self,
		captures: &Captures,
		mappings: &Mappings,
		path: &Path,
	) -> Result<Option<String>> {
		let Some(directive) = Directive::parse(&captures[1]) else {
			return Ok(None);
		};
		let name = &captures[2];

		let replacement = match directive {
			Directive::Arg => mappings.get(name).map(render_value).ok_or_else(|| {
				ConfigError::UndefinedArgument {
					name: name.to_string(),
					path: path.to_path_buf(),
				}
			})?,
			Directive::Find => {
				let dir = resolve_root(&RootRef::Package(name.to_string()), self.index.as_ref())?;
				dir.to_string_lossy().into_owned()
			}
			Directive::Env => std::env::var(name).map_err(|_| ConfigError::UndefinedEnvironment {
				name: name.to_string(),
				path: path.to_path_buf(),
			})?,
		};

		Ok(Some(replacement))
	}
}

impl std::fmt::Debug for Substitutor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Substitutor").finish_non_exhaustive()
	}
}
