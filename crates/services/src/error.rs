use std::path::PathBuf;

/// Caller-visible registry failures.
///
/// A capability without a provider is not an error: `get_service` returns
/// `None`. [`ServicesError::MissingService`] only comes from the
/// `get_required_service` accessors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServicesError {
	/// No export anywhere serves this language.
	#[error("unsupported language: {language}")]
	UnsupportedLanguage { language: String },
	/// A required capability resolved to no provider.
	#[error("no provider for required service {service} in {scope}")]
	MissingService { service: &'static str, scope: String },
}

/// Companion load failures. Never propagated past catalogue assembly.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompanionError {
	/// Reported by a companion that cannot provide its exports.
	#[error("companion unavailable: {0}")]
	Unavailable(String),
	/// Configured but not linked into the binary.
	#[error("companion '{0}' is not linked")]
	Missing(String),
	/// The companion's load hook returned an error.
	#[error("companion '{name}' failed to load: {reason}")]
	Failed { name: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid services config: {0}")]
	Parse(#[from] toml::de::Error),
}
