//! Layered service registries.
//!
//! A process-wide [`HostServices`] owns an [`ExtensionCatalogue`] and narrows it,
//! on demand, into one [`WorkspaceServices`] per workspace and one
//! [`LanguageServices`] per (workspace, language) pair. Each registry resolves a
//! capability to a single singleton instance by picking among the catalogue's
//! exports with a fixed layer precedence:
//!
//! 1. the workspace's own kind
//! 2. [`Layer::Host`]
//! 3. [`Layer::Editor`]
//! 4. [`Layer::Default`]
//! 5. the only remaining export, whatever its layer
//!
//! Every rule must match exactly one export to fire. Ties fall through, and a
//! capability with no winner resolves to `None`.
//!
//! # Concurrency
//!
//! All caches are append-only snapshot maps published with CAS (see
//! [`snapshot`]). Readers never block; racing writers may build a value twice,
//! but only one is ever installed and every caller observes that one.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use xeno_services::{ExportCatalogue, HostServices, Layer, Workspace, capability};
//!
//! pub trait Formatter: Send + Sync {
//! 	fn format(&self, text: &str) -> String;
//! }
//! capability!(dyn Formatter => "Formatter");
//!
//! let catalogue = ExportCatalogue::builder()
//! 	.workspace_service::<dyn Formatter>(Layer::Default, || Arc::new(PlainFormatter))
//! 	.build();
//! let host = HostServices::create(Arc::new(catalogue));
//! let workspace = Workspace::new(&host, "Scratch");
//! let formatter = workspace.services().get_service::<dyn Formatter>();
//! ```

pub mod catalogue;
pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod key;
pub mod language;
pub mod layer;
pub mod resolve;
pub mod snapshot;
pub mod workspace;

pub use catalogue::{CompanionDef, ExportCatalogue, ExportCatalogueBuilder, ExtensionCatalogue};
pub use config::HostConfig;
pub use error::{CompanionError, ConfigError, ServicesError};
pub use export::{ErasedService, Export, ExportMetadata, LazyService, Producer};
pub use host::HostServices;
pub use key::{Capability, ExportKey, TypeKey};
pub use language::LanguageServices;
pub use layer::Layer;
pub use workspace::{Workspace, WorkspaceId, WorkspaceServices};

#[doc(hidden)]
pub use inventory as __inventory;
