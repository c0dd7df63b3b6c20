//! Per-workspace service registry.

use std::fmt;
use std::sync::{Arc, Weak};

use rustc_hash::FxHashSet as HashSet;
use uuid::Uuid;

use crate::error::ServicesError;
use crate::export::{ErasedService, Export, Producer};
use crate::host::HostServices;
use crate::key::{Capability, ExportKey, TypeKey};
use crate::language::LanguageServices;
use crate::resolve;
use crate::snapshot::SnapshotMap;

/// Opaque workspace identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkspaceId(Uuid);

impl WorkspaceId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for WorkspaceId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for WorkspaceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// Services scoped to one workspace.
///
/// Resolved services and language registries are cached for the lifetime of
/// this registry. Misses, including "no provider", are cached too.
pub struct WorkspaceServices {
	host: Arc<HostServices>,
	this: Weak<WorkspaceServices>,
	id: WorkspaceId,
	kind: Arc<str>,
	services: SnapshotMap<TypeKey, Option<ErasedService>>,
	languages: SnapshotMap<Arc<str>, Arc<LanguageServices>>,
}

impl WorkspaceServices {
	pub(crate) fn new(host: Arc<HostServices>, id: WorkspaceId, kind: Arc<str>) -> Arc<Self> {
		Arc::new_cyclic(|this| Self {
			host,
			this: this.clone(),
			id,
			kind,
			services: SnapshotMap::new(),
			languages: SnapshotMap::new(),
		})
	}

	pub fn host(&self) -> &Arc<HostServices> {
		&self.host
	}

	pub fn workspace_id(&self) -> WorkspaceId {
		self.id
	}

	/// Kind tag matched against [`Layer::Workspace`](crate::Layer::Workspace) exports.
	pub fn workspace_kind(&self) -> &str {
		&self.kind
	}

	pub(crate) fn kind_arc(&self) -> Arc<str> {
		self.kind.clone()
	}

	/// Resolves the workspace singleton for capability `T`.
	///
	/// Returns the same instance on every call once resolved, from any thread.
	pub fn get_service<T: Capability + ?Sized>(&self) -> Option<Arc<T>> {
		let key = TypeKey::of::<T>();
		self.services.get_or_install_with(key, || self.resolve(key))?.downcast::<T>()
	}

	pub fn get_required_service<T: Capability + ?Sized>(&self) -> Result<Arc<T>, ServicesError> {
		self.get_service::<T>().ok_or_else(|| ServicesError::MissingService {
			service: T::NAME,
			scope: format!("workspace '{}'", self.kind),
		})
	}

	fn resolve(&self, key: TypeKey) -> Option<ErasedService> {
		let services = self.host.get_exports(ExportKey::WORKSPACE_SERVICES);
		let factories = self.host.get_exports(ExportKey::WORKSPACE_SERVICE_FACTORIES);
		let candidates: Vec<&Arc<Export>> = services
			.iter()
			.chain(factories.iter())
			.filter(|export| export.metadata.service_type == key)
			.filter(|export| {
				let usable = !matches!(export.producer, Producer::Language(_));
				if !usable {
					tracing::warn!(service = %key, "language factory exported as a workspace service; ignored");
				}
				usable
			})
			.collect();

		let Some((winner, rule)) = resolve::pick(&self.kind, &candidates, |export| &export.metadata.layer) else {
			tracing::debug!(service = %key, kind = %self.kind, candidates = candidates.len(), "no workspace service");
			return None;
		};
		tracing::debug!(service = %key, kind = %self.kind, layer = %winner.metadata.layer, ?rule, "workspace service resolved");

		match &winner.producer {
			Producer::Shared(lazy) => Some(lazy.get()),
			Producer::Workspace(factory) => Some(factory(self)),
			Producer::Language(_) => None,
		}
	}

	/// Every language the host has exports for.
	pub fn supported_languages(&self) -> Arc<HashSet<String>> {
		self.host.supported_languages()
	}

	pub fn is_supported(&self, language: &str) -> bool {
		self.supported_languages().contains(language)
	}

	/// Returns the registry for `language`, creating it on first request.
	///
	/// Fails with [`ServicesError::UnsupportedLanguage`] if no export serves the
	/// language at all. A supported language that merely lacks one capability
	/// succeeds here and yields `None` from [`LanguageServices::get_service`].
	pub fn get_language_services(&self, language: &str) -> Result<Arc<LanguageServices>, ServicesError> {
		let services = match self.languages.get(language) {
			Some(services) => services,
			None => self
				.languages
				.get_or_install_with(Arc::from(language), || Arc::new(LanguageServices::new(self, language))),
		};

		if services.has_services() {
			Ok(services)
		} else {
			Err(ServicesError::UnsupportedLanguage {
				language: language.to_string(),
			})
		}
	}

	/// Resolves `T` in every supported language accepted by `filter`, in language name order.
	///
	/// Languages where `T` has no provider are skipped.
	pub fn find_language_services<T, F>(&self, filter: F) -> Vec<(String, Arc<T>)>
	where
		T: Capability + ?Sized,
		F: Fn(&str) -> bool,
	{
		let mut languages: Vec<String> = self.supported_languages().iter().filter(|l| filter(l.as_str())).cloned().collect();
		languages.sort();

		languages
			.into_iter()
			.filter_map(|language| {
				let service = self.get_language_services(&language).ok()?.get_service::<T>()?;
				Some((language, service))
			})
			.collect()
	}

	pub(crate) fn weak(&self) -> Weak<WorkspaceServices> {
		self.this.clone()
	}
}

impl fmt::Debug for WorkspaceServices {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WorkspaceServices")
			.field("id", &self.id)
			.field("kind", &self.kind)
			.field("resolved", &self.services.len())
			.finish_non_exhaustive()
	}
}

/// A minimal workspace: an identity, a kind, and the service registry created for it.
///
/// The registry is created once in [`Workspace::new`] and lives as long as the workspace.
#[derive(Debug)]
pub struct Workspace {
	id: WorkspaceId,
	services: Arc<WorkspaceServices>,
}

impl Workspace {
	pub fn new(host: &Arc<HostServices>, kind: impl Into<Arc<str>>) -> Self {
		let id = WorkspaceId::new();
		Self {
			id,
			services: host.create_workspace_services(id, kind),
		}
	}

	pub fn id(&self) -> WorkspaceId {
		self.id
	}

	pub fn kind(&self) -> &str {
		self.services.workspace_kind()
	}

	pub fn services(&self) -> &Arc<WorkspaceServices> {
		&self.services
	}
}

#[cfg(test)]
mod tests;
