//! Manifest loading and inheritance for moveit-configs.
//!
//! This module handles:
//! - `moveit_configs.toml` parsing
//! - `extends` chain resolution
//! - Rebasing inherited paths onto the root that declared them

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{extend_manifest, load_extended_manifest};
pub use parser::{load_manifest, manifest_file, parse_manifest_file, parse_manifest_str};
pub use types::{Manifest, Mappings};
