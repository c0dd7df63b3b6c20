//! Exports: lazily constructed candidate implementations of a capability.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::key::{Capability, TypeKey};
use crate::language::LanguageServices;
use crate::layer::Layer;
use crate::snapshot::SnapshotCell;
use crate::workspace::WorkspaceServices;

/// Type-erased `Arc<T>` for a capability `T`.
///
/// Cloning shares the same inner `Arc`, so identity survives erasure.
#[derive(Clone)]
pub struct ErasedService(Arc<dyn Any + Send + Sync>);

impl ErasedService {
	pub fn new<T: Capability + ?Sized>(service: Arc<T>) -> Self {
		Self(Arc::new(service))
	}

	/// Recovers the service as capability `T`, or `None` if it was erased from a different type.
	pub fn downcast<T: Capability + ?Sized>(&self) -> Option<Arc<T>> {
		self.0.downcast_ref::<Arc<T>>().cloned()
	}
}

impl fmt::Debug for ErasedService {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ErasedService").finish_non_exhaustive()
	}
}

type SharedInit = Box<dyn Fn() -> ErasedService + Send + Sync>;
type WorkspaceInit = Box<dyn Fn(&WorkspaceServices) -> ErasedService + Send + Sync>;
type LanguageInit = Box<dyn Fn(&LanguageServices) -> ErasedService + Send + Sync>;

/// A ready-made service, built on first use and shared afterwards.
pub struct LazyService {
	init: SharedInit,
	value: SnapshotCell<ErasedService>,
}

impl LazyService {
	pub fn new(init: impl Fn() -> ErasedService + Send + Sync + 'static) -> Self {
		Self {
			init: Box::new(init),
			value: SnapshotCell::new(),
		}
	}

	pub fn get(&self) -> ErasedService {
		ErasedService::clone(&self.value.get_or_install_with(|| (self.init)()))
	}

	pub fn is_created(&self) -> bool {
		self.value.get().is_some()
	}
}

/// How an export builds its instance.
pub enum Producer {
	/// One instance per export, shared by every registry that selects it.
	Shared(LazyService),
	/// Built by the selecting workspace registry.
	Workspace(WorkspaceInit),
	/// Built by the selecting language registry.
	Language(LanguageInit),
}

impl Producer {
	pub(crate) fn kind(&self) -> &'static str {
		match self {
			Self::Shared(_) => "shared",
			Self::Workspace(_) => "workspace factory",
			Self::Language(_) => "language factory",
		}
	}
}

impl fmt::Debug for Producer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.kind())
	}
}

/// Metadata attached to every export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMetadata {
	/// Capability the export implements.
	pub service_type: TypeKey,
	pub layer: Layer,
	/// Languages the export serves. Empty for workspace-scoped exports.
	pub languages: Vec<String>,
}

impl ExportMetadata {
	pub fn serves_language(&self, language: &str) -> bool {
		self.languages.iter().any(|l| l == language)
	}
}

/// One candidate implementation of a capability.
#[derive(Debug)]
pub struct Export {
	pub metadata: ExportMetadata,
	pub producer: Producer,
}

impl Export {
	/// Ready-made workspace service.
	pub fn shared<T, F>(layer: Layer, init: F) -> Self
	where
		T: Capability + ?Sized,
		F: Fn() -> Arc<T> + Send + Sync + 'static,
	{
		Self {
			metadata: metadata::<T>(layer, Vec::new()),
			producer: Producer::Shared(LazyService::new(move || ErasedService::new(init()))),
		}
	}

	/// Workspace service built from the resolving [`WorkspaceServices`].
	pub fn workspace_factory<T, F>(layer: Layer, factory: F) -> Self
	where
		T: Capability + ?Sized,
		F: Fn(&WorkspaceServices) -> Arc<T> + Send + Sync + 'static,
	{
		Self {
			metadata: metadata::<T>(layer, Vec::new()),
			producer: Producer::Workspace(Box::new(move |ws| ErasedService::new(factory(ws)))),
		}
	}

	/// Ready-made service for each of `languages`.
	pub fn language_service<T, F>(languages: &[&str], layer: Layer, init: F) -> Self
	where
		T: Capability + ?Sized,
		F: Fn() -> Arc<T> + Send + Sync + 'static,
	{
		Self {
			metadata: metadata::<T>(layer, owned(languages)),
			producer: Producer::Shared(LazyService::new(move || ErasedService::new(init()))),
		}
	}

	/// Language service built from the resolving [`LanguageServices`].
	pub fn language_factory<T, F>(languages: &[&str], layer: Layer, factory: F) -> Self
	where
		T: Capability + ?Sized,
		F: Fn(&LanguageServices) -> Arc<T> + Send + Sync + 'static,
	{
		Self {
			metadata: metadata::<T>(layer, owned(languages)),
			producer: Producer::Language(Box::new(move |ls| ErasedService::new(factory(ls)))),
		}
	}
}

fn metadata<T: Capability + ?Sized>(layer: Layer, languages: Vec<String>) -> ExportMetadata {
	ExportMetadata {
		service_type: TypeKey::of::<T>(),
		layer,
		languages,
	}
}

fn owned(languages: &[&str]) -> Vec<String> {
	languages.iter().map(|l| (*l).to_string()).collect()
}
