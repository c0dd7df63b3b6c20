use super::{ExportCatalogue, ExportCatalogueBuilder};
use crate::error::CompanionError;

/// A linked component contributing exports to the default catalogue.
///
/// Submitted with [`inventory::submit!`] from the crate that owns the exports:
///
/// ```ignore
/// xeno_services::__inventory::submit! {
/// 	CompanionDef::new("xeno.lsp.services", register)
/// }
/// ```
pub struct CompanionDef {
	/// Name the companion is selected by in [`HostConfig`](crate::HostConfig).
	pub name: &'static str,
	/// Adds the companion's exports. An error discards everything it added.
	pub load: fn(&mut ExportCatalogueBuilder) -> Result<(), CompanionError>,
}

inventory::collect!(CompanionDef);

impl CompanionDef {
	pub const fn new(name: &'static str, load: fn(&mut ExportCatalogueBuilder) -> Result<(), CompanionError>) -> Self {
		Self { name, load }
	}
}

/// Returns all linked companions sorted by name.
pub(crate) fn linked() -> Vec<&'static CompanionDef> {
	let mut companions: Vec<&'static CompanionDef> = inventory::iter::<CompanionDef>.into_iter().collect();
	companions.sort_by(|a, b| a.name.cmp(b.name));
	companions
}

impl ExportCatalogue {
	/// Builds a catalogue from linked companions.
	///
	/// `None` loads every linked companion in name order; `Some` loads the named
	/// companions in the given order. Missing or failing companions are skipped.
	pub fn from_companions(names: Option<&[String]>) -> Self {
		let linked = linked();
		let selected: Vec<Result<&'static CompanionDef, CompanionError>> = match names {
			None => linked.into_iter().map(Ok).collect(),
			Some(names) => names
				.iter()
				.map(|name| {
					linked
						.iter()
						.copied()
						.find(|c| c.name == name.as_str())
						.ok_or_else(|| CompanionError::Missing(name.clone()))
				})
				.collect(),
		};

		let mut builder = ExportCatalogueBuilder::new();
		for companion in selected {
			match companion.and_then(load_one) {
				Ok(exports) => builder.merge(exports),
				Err(error) => tracing::warn!(%error, "skipping companion"),
			}
		}

		let catalogue = builder.build();
		tracing::debug!(exports = catalogue.len(), "default catalogue assembled");
		catalogue
	}
}

fn load_one(companion: &'static CompanionDef) -> Result<ExportCatalogueBuilder, CompanionError> {
	let mut scratch = ExportCatalogueBuilder::new();
	(companion.load)(&mut scratch).map_err(|error| CompanionError::Failed {
		name: companion.name,
		reason: error.to_string(),
	})?;
	tracing::debug!(companion = companion.name, "companion loaded");
	Ok(scratch)
}
