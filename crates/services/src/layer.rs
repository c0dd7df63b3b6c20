use std::fmt;
use std::sync::Arc;

/// Override tier an export is registered under.
///
/// Layers carry no behavior of their own; they are only compared against the
/// precedence order used by [`resolve::pick`](crate::resolve::pick).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Layer {
	/// Supplied by the hosting process; overrides editor and default exports.
	Host,
	/// Supplied by an editor front end; overrides default exports.
	Editor,
	/// Fallback implementation.
	Default,
	/// Applies only to workspaces of this kind; overrides every other layer.
	Workspace(Arc<str>),
}

impl Layer {
	pub const HOST: &'static str = "Host";
	pub const EDITOR: &'static str = "Editor";
	pub const DEFAULT: &'static str = "Default";

	/// Parses a layer tag. Unknown tags name a workspace kind.
	pub fn parse(tag: &str) -> Self {
		match tag {
			Self::HOST => Self::Host,
			Self::EDITOR => Self::Editor,
			Self::DEFAULT => Self::Default,
			kind => Self::Workspace(Arc::from(kind)),
		}
	}

	/// Shorthand for [`Layer::Workspace`].
	pub fn workspace(kind: impl Into<Arc<str>>) -> Self {
		Self::Workspace(kind.into())
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Host => Self::HOST,
			Self::Editor => Self::EDITOR,
			Self::Default => Self::DEFAULT,
			Self::Workspace(kind) => kind,
		}
	}
}

impl From<&str> for Layer {
	fn from(tag: &str) -> Self {
		Self::parse(tag)
	}
}

impl fmt::Display for Layer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
