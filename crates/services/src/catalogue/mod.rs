//! Extension catalogues: where exports come from.
//!
//! The registries only ever call [`ExtensionCatalogue::query`]. How exports are
//! discovered is up to the implementation; [`ExportCatalogue`] is the in-memory
//! one, filled directly through its builder or from linked [`CompanionDef`]s.

use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;

use crate::export::Export;
use crate::key::{Capability, ExportKey};
use crate::language::LanguageServices;
use crate::layer::Layer;
use crate::workspace::WorkspaceServices;

mod companion;

pub use companion::CompanionDef;

/// Source of exports for a (contract, metadata shape) pair.
///
/// Implementations may be queried repeatedly for the same key; callers cache
/// the result and do not rely on the catalogue deduplicating work.
pub trait ExtensionCatalogue: Send + Sync {
	fn query(&self, key: &ExportKey) -> Vec<Arc<Export>>;
}

/// In-memory catalogue keyed by [`ExportKey`].
#[derive(Debug, Default)]
pub struct ExportCatalogue {
	exports: HashMap<ExportKey, Vec<Arc<Export>>>,
}

impl ExportCatalogue {
	pub fn builder() -> ExportCatalogueBuilder {
		ExportCatalogueBuilder::default()
	}

	pub fn empty() -> Self {
		Self::default()
	}

	/// Total number of exports across all keys.
	pub fn len(&self) -> usize {
		self.exports.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl ExtensionCatalogue for ExportCatalogue {
	fn query(&self, key: &ExportKey) -> Vec<Arc<Export>> {
		self.exports.get(key).cloned().unwrap_or_default()
	}
}

/// Collects exports under their contracts.
#[derive(Debug, Default)]
pub struct ExportCatalogueBuilder {
	exports: HashMap<ExportKey, Vec<Arc<Export>>>,
}

impl ExportCatalogueBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an export under an explicit key.
	pub fn push(&mut self, key: ExportKey, export: Export) -> &mut Self {
		self.exports.entry(key).or_default().push(Arc::new(export));
		self
	}

	pub fn add_workspace_service<T, F>(&mut self, layer: Layer, init: F) -> &mut Self
	where
		T: Capability + ?Sized,
		F: Fn() -> Arc<T> + Send + Sync + 'static,
	{
		self.push(ExportKey::WORKSPACE_SERVICES, Export::shared::<T, F>(layer, init))
	}

	pub fn add_workspace_factory<T, F>(&mut self, layer: Layer, factory: F) -> &mut Self
	where
		T: Capability + ?Sized,
		F: Fn(&WorkspaceServices) -> Arc<T> + Send + Sync + 'static,
	{
		self.push(ExportKey::WORKSPACE_SERVICE_FACTORIES, Export::workspace_factory::<T, F>(layer, factory))
	}

	pub fn add_language_service<T, F>(&mut self, languages: &[&str], layer: Layer, init: F) -> &mut Self
	where
		T: Capability + ?Sized,
		F: Fn() -> Arc<T> + Send + Sync + 'static,
	{
		self.push(ExportKey::LANGUAGE_SERVICES, Export::language_service::<T, F>(languages, layer, init))
	}

	pub fn add_language_factory<T, F>(&mut self, languages: &[&str], layer: Layer, factory: F) -> &mut Self
	where
		T: Capability + ?Sized,
		F: Fn(&LanguageServices) -> Arc<T> + Send + Sync + 'static,
	{
		self.push(ExportKey::LANGUAGE_SERVICE_FACTORIES, Export::language_factory::<T, F>(languages, layer, factory))
	}

	pub fn workspace_service<T, F>(mut self, layer: Layer, init: F) -> Self
	where
		T: Capability + ?Sized,
		F: Fn() -> Arc<T> + Send + Sync + 'static,
	{
		self.add_workspace_service(layer, init);
		self
	}

	pub fn workspace_factory<T, F>(mut self, layer: Layer, factory: F) -> Self
	where
		T: Capability + ?Sized,
		F: Fn(&WorkspaceServices) -> Arc<T> + Send + Sync + 'static,
	{
		self.add_workspace_factory(layer, factory);
		self
	}

	pub fn language_service<T, F>(mut self, languages: &[&str], layer: Layer, init: F) -> Self
	where
		T: Capability + ?Sized,
		F: Fn() -> Arc<T> + Send + Sync + 'static,
	{
		self.add_language_service(languages, layer, init);
		self
	}

	pub fn language_factory<T, F>(mut self, languages: &[&str], layer: Layer, factory: F) -> Self
	where
		T: Capability + ?Sized,
		F: Fn(&LanguageServices) -> Arc<T> + Send + Sync + 'static,
	{
		self.add_language_factory(languages, layer, factory);
		self
	}

	/// Appends every export collected by `other`, keeping its order.
	pub fn merge(&mut self, other: ExportCatalogueBuilder) {
		for (key, exports) in other.exports {
			self.exports.entry(key).or_default().extend(exports);
		}
	}

	pub fn build(self) -> ExportCatalogue {
		ExportCatalogue { exports: self.exports }
	}
}
