//! Host configuration.
//!
//! ```toml
//! # Load only these companions, in this order. Omit to load every linked companion.
//! companions = ["xeno.lsp.services", "xeno.vcs.services"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable naming the config file read by [`HostServices::default_instance`](crate::HostServices::default_instance).
pub const CONFIG_ENV: &str = "XENO_SERVICES_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
	/// Companion names to load, in order. `None` loads all linked companions.
	pub companions: Option<Vec<String>>,
}

impl HostConfig {
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	/// Reads the file named by [`CONFIG_ENV`], falling back to defaults if unset or invalid.
	pub fn from_env() -> Self {
		let Some(path) = std::env::var_os(CONFIG_ENV) else {
			return Self::default();
		};
		match Self::load(Path::new(&path)) {
			Ok(config) => config,
			Err(error) => {
				tracing::warn!(%error, "ignoring services config");
				Self::default()
			}
		}
	}
}
