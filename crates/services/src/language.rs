//! Per-(workspace, language) service registry.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::ServicesError;
use crate::export::{ErasedService, Export, Producer};
use crate::key::{Capability, ExportKey, TypeKey};
use crate::resolve;
use crate::snapshot::SnapshotMap;
use crate::workspace::WorkspaceServices;

/// Services scoped to one language within one workspace.
///
/// The candidate set is fixed at construction: the host's language exports
/// whose metadata names this language. It is never filtered again.
pub struct LanguageServices {
	workspace: Weak<WorkspaceServices>,
	workspace_kind: Arc<str>,
	language: Arc<str>,
	exports: Vec<Arc<Export>>,
	services: SnapshotMap<TypeKey, Option<ErasedService>>,
}

impl LanguageServices {
	pub(crate) fn new(workspace: &WorkspaceServices, language: &str) -> Self {
		let host = workspace.host();
		let services = host.get_exports(ExportKey::LANGUAGE_SERVICES);
		let factories = host.get_exports(ExportKey::LANGUAGE_SERVICE_FACTORIES);
		let exports: Vec<Arc<Export>> = services
			.iter()
			.chain(factories.iter())
			.filter(|export| export.metadata.serves_language(language))
			.cloned()
			.collect();
		tracing::debug!(language, exports = exports.len(), "language services created");

		Self {
			workspace: workspace.weak(),
			workspace_kind: workspace.kind_arc(),
			language: Arc::from(language),
			exports,
			services: SnapshotMap::new(),
		}
	}

	pub fn language(&self) -> &str {
		&self.language
	}

	/// The owning workspace registry, if it is still alive.
	pub fn workspace_services(&self) -> Option<Arc<WorkspaceServices>> {
		self.workspace.upgrade()
	}

	/// Whether any export at all serves this language.
	pub fn has_services(&self) -> bool {
		!self.exports.is_empty()
	}

	/// Resolves the language singleton for capability `T`.
	pub fn get_service<T: Capability + ?Sized>(&self) -> Option<Arc<T>> {
		let key = TypeKey::of::<T>();
		self.services.get_or_install_with(key, || self.resolve(key))?.downcast::<T>()
	}

	pub fn get_required_service<T: Capability + ?Sized>(&self) -> Result<Arc<T>, ServicesError> {
		self.get_service::<T>().ok_or_else(|| ServicesError::MissingService {
			service: T::NAME,
			scope: format!("language '{}'", self.language),
		})
	}

	fn resolve(&self, key: TypeKey) -> Option<ErasedService> {
		let candidates: Vec<&Arc<Export>> = self
			.exports
			.iter()
			.filter(|export| export.metadata.service_type == key)
			.filter(|export| {
				let usable = !matches!(export.producer, Producer::Workspace(_));
				if !usable {
					tracing::warn!(service = %key, language = %self.language, "workspace factory exported as a language service; ignored");
				}
				usable
			})
			.collect();

		let Some((winner, rule)) = resolve::pick(&self.workspace_kind, &candidates, |export| &export.metadata.layer) else {
			tracing::debug!(service = %key, language = %self.language, candidates = candidates.len(), "no language service");
			return None;
		};
		tracing::debug!(service = %key, language = %self.language, layer = %winner.metadata.layer, ?rule, "language service resolved");

		match &winner.producer {
			Producer::Shared(lazy) => Some(lazy.get()),
			Producer::Language(factory) => Some(factory(self)),
			Producer::Workspace(_) => None,
		}
	}
}

impl fmt::Debug for LanguageServices {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LanguageServices")
			.field("language", &self.language)
			.field("workspace_kind", &self.workspace_kind)
			.field("exports", &self.exports.len())
			.finish_non_exhaustive()
	}
}
