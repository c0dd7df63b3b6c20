//! Capability and export keys.
//!
//! Keys are plain static names compared ASCII-case-insensitively, so
//! `"Formatter"` and `"formatter"` name the same capability. Lookups never
//! allocate.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A capability interface that registries can resolve.
///
/// Implemented for capability trait objects with [`capability!`](crate::capability).
pub trait Capability: Send + Sync + 'static {
	/// Stable name the capability is registered under.
	const NAME: &'static str;
}

/// Implements [`Capability`] for a capability type.
///
/// ```ignore
/// pub trait Formatter: Send + Sync {}
/// xeno_services::capability!(dyn Formatter => "Formatter");
/// ```
#[macro_export]
macro_rules! capability {
	($ty:ty => $name:expr) => {
		impl $crate::Capability for $ty {
			const NAME: &'static str = $name;
		}
	};
}

/// Case-insensitive name of a capability, contract or metadata shape.
#[derive(Clone, Copy)]
pub struct TypeKey(&'static str);

impl TypeKey {
	pub const fn new(name: &'static str) -> Self {
		Self(name)
	}

	/// Returns the key of capability `T`.
	#[inline]
	pub fn of<T: Capability + ?Sized>() -> Self {
		Self(T::NAME)
	}

	pub const fn as_str(self) -> &'static str {
		self.0
	}
}

impl PartialEq for TypeKey {
	fn eq(&self, other: &Self) -> bool {
		self.0.eq_ignore_ascii_case(other.0)
	}
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		for byte in self.0.bytes() {
			state.write_u8(byte.to_ascii_lowercase());
		}
		state.write_u8(0xff);
	}
}

impl fmt::Debug for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("TypeKey").field(&self.0).finish()
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

pub const WORKSPACE_SERVICE: TypeKey = TypeKey::new("xeno.WorkspaceService");
pub const WORKSPACE_SERVICE_FACTORY: TypeKey = TypeKey::new("xeno.WorkspaceServiceFactory");
pub const LANGUAGE_SERVICE: TypeKey = TypeKey::new("xeno.LanguageService");
pub const LANGUAGE_SERVICE_FACTORY: TypeKey = TypeKey::new("xeno.LanguageServiceFactory");

pub const WORKSPACE_SERVICE_METADATA: TypeKey = TypeKey::new("xeno.WorkspaceServiceMetadata");
pub const LANGUAGE_SERVICE_METADATA: TypeKey = TypeKey::new("xeno.LanguageServiceMetadata");

/// Catalogue query key: an export contract plus the metadata shape attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExportKey {
	pub contract: TypeKey,
	pub metadata: TypeKey,
}

impl ExportKey {
	/// Ready-made workspace services.
	pub const WORKSPACE_SERVICES: Self = Self::new(WORKSPACE_SERVICE, WORKSPACE_SERVICE_METADATA);
	/// Factories that build a workspace service from its [`WorkspaceServices`](crate::WorkspaceServices).
	pub const WORKSPACE_SERVICE_FACTORIES: Self = Self::new(WORKSPACE_SERVICE_FACTORY, WORKSPACE_SERVICE_METADATA);
	/// Ready-made language services.
	pub const LANGUAGE_SERVICES: Self = Self::new(LANGUAGE_SERVICE, LANGUAGE_SERVICE_METADATA);
	/// Factories that build a language service from its [`LanguageServices`](crate::LanguageServices).
	pub const LANGUAGE_SERVICE_FACTORIES: Self = Self::new(LANGUAGE_SERVICE_FACTORY, LANGUAGE_SERVICE_METADATA);

	pub const fn new(contract: TypeKey, metadata: TypeKey) -> Self {
		Self { contract, metadata }
	}
}
