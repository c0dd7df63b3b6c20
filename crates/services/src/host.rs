//! Process-wide host registry.

use std::sync::Arc;

use rustc_hash::FxHashSet as HashSet;

use crate::catalogue::{ExportCatalogue, ExtensionCatalogue};
use crate::config::HostConfig;
use crate::export::Export;
use crate::key::ExportKey;
use crate::snapshot::{SnapshotCell, SnapshotMap};
use crate::workspace::{WorkspaceId, WorkspaceServices};

static DEFAULT_HOST: SnapshotCell<HostServices> = SnapshotCell::new();

/// Owns the catalogue and caches its answers for every workspace created from it.
///
/// Both caches only grow and are never invalidated.
pub struct HostServices {
	catalogue: Arc<dyn ExtensionCatalogue>,
	exports: SnapshotMap<ExportKey, Arc<[Arc<Export>]>>,
	languages: SnapshotCell<HashSet<String>>,
}

impl HostServices {
	pub fn create(catalogue: Arc<dyn ExtensionCatalogue>) -> Arc<Self> {
		Arc::new(Self::with_catalogue(catalogue))
	}

	fn with_catalogue(catalogue: Arc<dyn ExtensionCatalogue>) -> Self {
		Self {
			catalogue,
			exports: SnapshotMap::new(),
			languages: SnapshotCell::new(),
		}
	}

	/// Returns the process-wide host, assembling it from linked companions on first access.
	///
	/// Concurrent first accesses may each assemble a host, but only one is
	/// installed and every caller receives that one. Companions that fail to
	/// load are left out.
	pub fn default_instance() -> Arc<Self> {
		DEFAULT_HOST.get_or_install_with(|| {
			let config = HostConfig::from_env();
			let catalogue = ExportCatalogue::from_companions(config.companions.as_deref());
			Self::with_catalogue(Arc::new(catalogue))
		})
	}

	/// Returns the exports for `key`, querying the catalogue on first request.
	///
	/// An empty list is a valid answer and is cached like any other.
	pub fn get_exports(&self, key: ExportKey) -> Arc<[Arc<Export>]> {
		self.exports.get_or_install_with(key, || {
			let exports: Arc<[Arc<Export>]> = self.catalogue.query(&key).into();
			tracing::debug!(contract = %key.contract, count = exports.len(), "exports materialized");
			exports
		})
	}

	/// Every language named by a language service or language service factory.
	pub fn supported_languages(&self) -> Arc<HashSet<String>> {
		self.languages.get_or_install_with(|| {
			let services = self.get_exports(ExportKey::LANGUAGE_SERVICES);
			let factories = self.get_exports(ExportKey::LANGUAGE_SERVICE_FACTORIES);
			services
				.iter()
				.chain(factories.iter())
				.flat_map(|export| export.metadata.languages.iter().cloned())
				.collect()
		})
	}

	/// Creates the service registry for one workspace.
	///
	/// The caller owns the result; the host keeps no reference to it.
	pub fn create_workspace_services(self: &Arc<Self>, id: WorkspaceId, kind: impl Into<Arc<str>>) -> Arc<WorkspaceServices> {
		WorkspaceServices::new(self.clone(), id, kind.into())
	}
}
