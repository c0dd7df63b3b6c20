use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;

use super::*;
use crate::{ExportCatalogue, ExportCatalogueBuilder, ExtensionCatalogue, Layer};

trait Formatter: Send + Sync {
	fn origin(&self) -> &str;
}
crate::capability!(dyn Formatter => "Formatter");

trait Diagnostics: Send + Sync {}
crate::capability!(dyn Diagnostics => "Diagnostics");

struct Origin(String);

impl Formatter for Origin {
	fn origin(&self) -> &str {
		&self.0
	}
}

fn origin(name: &str) -> Arc<dyn Formatter> {
	Arc::new(Origin(name.to_string()))
}

fn host(builder: ExportCatalogueBuilder) -> Arc<HostServices> {
	HostServices::create(Arc::new(builder.build()))
}

#[test]
fn host_layer_beats_default() {
	let host = host(
		ExportCatalogue::builder()
			.workspace_service::<dyn Formatter, _>(Layer::Default, || origin("default"))
			.workspace_service::<dyn Formatter, _>(Layer::Host, || origin("host")),
	);
	let ws = Workspace::new(&host, "Scratch");
	assert_eq!(ws.services().get_service::<dyn Formatter>().unwrap().origin(), "host");
}

#[test]
fn workspace_kind_overrides_host() {
	let host = host(
		ExportCatalogue::builder()
			.workspace_service::<dyn Formatter, _>(Layer::Host, || origin("host"))
			.workspace_factory::<dyn Formatter, _>(Layer::workspace("Scratch"), |_| origin("scratch")),
	);

	let scratch = Workspace::new(&host, "Scratch");
	assert_eq!(scratch.services().get_service::<dyn Formatter>().unwrap().origin(), "scratch");

	let project = Workspace::new(&host, "Project");
	assert_eq!(project.services().get_service::<dyn Formatter>().unwrap().origin(), "host");
}

#[test]
fn resolution_is_idempotent() {
	let host = host(ExportCatalogue::builder().workspace_factory::<dyn Formatter, _>(Layer::Default, |_| origin("factory")));
	let ws = Workspace::new(&host, "Scratch");

	let a = ws.services().get_service::<dyn Formatter>().unwrap();
	let b = ws.services().get_service::<dyn Formatter>().unwrap();
	assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn ambiguous_default_resolves_to_none() {
	let host = host(
		ExportCatalogue::builder()
			.workspace_service::<dyn Formatter, _>(Layer::Default, || origin("one"))
			.workspace_service::<dyn Formatter, _>(Layer::Default, || origin("two")),
	);
	let ws = Workspace::new(&host, "Scratch");
	assert!(ws.services().get_service::<dyn Formatter>().is_none());
}

#[test]
fn shared_exports_are_shared_across_workspaces() {
	let host = host(ExportCatalogue::builder().workspace_service::<dyn Formatter, _>(Layer::Default, || origin("shared")));
	let a = Workspace::new(&host, "Scratch");
	let b = Workspace::new(&host, "Scratch");

	let from_a = a.services().get_service::<dyn Formatter>().unwrap();
	let from_b = b.services().get_service::<dyn Formatter>().unwrap();
	assert!(Arc::ptr_eq(&from_a, &from_b));
}

#[test]
fn factories_build_one_instance_per_workspace() {
	let host = host(ExportCatalogue::builder().workspace_factory::<dyn Formatter, _>(Layer::Default, |ws| origin(ws.workspace_kind())));
	let a = Workspace::new(&host, "Scratch");
	let b = Workspace::new(&host, "Project");

	let from_a = a.services().get_service::<dyn Formatter>().unwrap();
	let from_b = b.services().get_service::<dyn Formatter>().unwrap();
	assert!(!Arc::ptr_eq(&from_a, &from_b));
	assert_eq!(from_a.origin(), "Scratch");
	assert_eq!(from_b.origin(), "Project");
}

#[test]
fn factories_can_resolve_other_services() {
	struct Wrapped;
	impl Diagnostics for Wrapped {}

	let host = host(
		ExportCatalogue::builder()
			.workspace_service::<dyn Formatter, _>(Layer::Default, || origin("inner"))
			.workspace_factory::<dyn Diagnostics, _>(Layer::Default, |ws| {
				assert!(ws.get_service::<dyn Formatter>().is_some());
				Arc::new(Wrapped)
			}),
	);
	let ws = Workspace::new(&host, "Scratch");
	assert!(ws.services().get_service::<dyn Diagnostics>().is_some());
}

struct CountingCatalogue {
	inner: ExportCatalogue,
	queries: AtomicUsize,
}

impl ExtensionCatalogue for CountingCatalogue {
	fn query(&self, key: &ExportKey) -> Vec<Arc<Export>> {
		self.queries.fetch_add(1, Ordering::SeqCst);
		self.inner.query(key)
	}
}

#[test]
fn missing_service_is_cached() {
	let catalogue = Arc::new(CountingCatalogue {
		inner: ExportCatalogue::empty(),
		queries: AtomicUsize::new(0),
	});
	let host = HostServices::create(catalogue.clone());
	let ws = Workspace::new(&host, "Scratch");

	assert!(ws.services().get_service::<dyn Formatter>().is_none());
	let after_first = catalogue.queries.load(Ordering::SeqCst);
	assert!(ws.services().get_service::<dyn Formatter>().is_none());
	assert_eq!(catalogue.queries.load(Ordering::SeqCst), after_first);
}

#[test]
fn required_service_fails_without_provider() {
	let host = host(ExportCatalogue::builder());
	let ws = Workspace::new(&host, "Scratch");
	let Err(err) = ws.services().get_required_service::<dyn Formatter>() else {
		panic!("Formatter has no provider");
	};
	assert_eq!(
		err,
		ServicesError::MissingService {
			service: "Formatter",
			scope: "workspace 'Scratch'".to_string(),
		}
	);
}

#[test]
fn unsupported_language_is_an_error() {
	let host = host(ExportCatalogue::builder().language_service::<dyn Diagnostics, _>(&["Alpha"], Layer::Default, || {
		struct Unit;
		impl Diagnostics for Unit {}
		Arc::new(Unit)
	}));
	let ws = Workspace::new(&host, "Scratch");

	assert!(ws.services().is_supported("Alpha"));
	assert!(!ws.services().is_supported("Beta"));

	let alpha = ws.services().get_language_services("Alpha").unwrap();
	assert!(alpha.get_service::<dyn Diagnostics>().is_some());
	assert!(alpha.get_service::<dyn Formatter>().is_none());

	let err = ws.services().get_language_services("Beta").unwrap_err();
	assert_eq!(
		err,
		ServicesError::UnsupportedLanguage {
			language: "Beta".to_string()
		}
	);
}

#[test]
fn language_services_are_memoized() {
	let host = host(ExportCatalogue::builder().language_service::<dyn Formatter, _>(&["rust"], Layer::Default, || origin("rust")));
	let ws = Workspace::new(&host, "Scratch");

	let a = ws.services().get_language_services("rust").unwrap();
	let b = ws.services().get_language_services("rust").unwrap();
	assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn find_language_services_visits_filtered_languages_in_order() {
	let host = host(
		ExportCatalogue::builder()
			.language_factory::<dyn Formatter, _>(&["toml", "rust", "nix"], Layer::Default, |ls| origin(ls.language()))
			.language_service::<dyn Diagnostics, _>(&["markdown"], Layer::Default, || {
				struct Unit;
				impl Diagnostics for Unit {}
				Arc::new(Unit)
			}),
	);
	let ws = Workspace::new(&host, "Scratch");

	let found: Vec<(String, String)> = ws
		.services()
		.find_language_services::<dyn Formatter, _>(|language| language != "nix")
		.into_iter()
		.map(|(language, service)| (language, service.origin().to_string()))
		.collect();

	assert_eq!(
		found,
		vec![("rust".to_string(), "rust".to_string()), ("toml".to_string(), "toml".to_string()),]
	);
}

#[test]
fn workspaces_have_distinct_ids() {
	let host = host(ExportCatalogue::builder());
	let a = Workspace::new(&host, "Scratch");
	let b = Workspace::new(&host, "Scratch");
	assert_ne!(a.id(), b.id());
	assert_eq!(a.services().workspace_id(), a.id());
	assert_eq!(a.kind(), "Scratch");
}

#[test]
fn language_factories_are_never_workspace_candidates() {
	let mut builder = ExportCatalogue::builder().workspace_service::<dyn Formatter, _>(Layer::Default, || origin("default"));
	builder.push(
		ExportKey::WORKSPACE_SERVICE_FACTORIES,
		Export {
			metadata: crate::ExportMetadata {
				service_type: TypeKey::of::<dyn Formatter>(),
				layer: Layer::Host,
				languages: Vec::new(),
			},
			producer: Producer::Language(Box::new(|_: &LanguageServices| ErasedService::new::<dyn Formatter>(origin("language")))),
		},
	);
	let ws = Workspace::new(&host(builder), "Scratch");

	let formatter = ws.services().get_service::<dyn Formatter>().expect("default export resolves");
	assert_eq!(formatter.origin(), "default");
}
