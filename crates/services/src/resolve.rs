//! Layer resolution shared by workspace and language registries.

use crate::layer::Layer;

/// Which precedence rule selected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
	WorkspaceKind,
	Host,
	Editor,
	Default,
	OnlyCandidate,
}

/// Picks the single winning candidate for one capability.
///
/// Rules are tried in order and each fires only on exactly one match:
/// the workspace kind, then [`Layer::Host`], [`Layer::Editor`], [`Layer::Default`],
/// and finally the sole candidate regardless of layer. Two candidates tied on
/// a rule never pick arbitrarily; resolution falls through and may end with `None`.
pub fn pick<'a, C>(workspace_kind: &str, candidates: &'a [C], layer_of: impl Fn(&C) -> &Layer) -> Option<(&'a C, Rule)> {
	let tiers = [
		(workspace_kind, Rule::WorkspaceKind),
		(Layer::HOST, Rule::Host),
		(Layer::EDITOR, Rule::Editor),
		(Layer::DEFAULT, Rule::Default),
	];

	for (tag, rule) in tiers {
		let mut matching = candidates.iter().filter(|c| layer_of(c).as_str() == tag);
		match (matching.next(), matching.next()) {
			(Some(one), None) => return Some((one, rule)),
			(Some(_), Some(_)) => {
				tracing::warn!(layer = tag, "ambiguous exports at one layer; falling through");
			}
			_ => {}
		}
	}

	match candidates {
		[only] => Some((only, Rule::OnlyCandidate)),
		_ => None,
	}
}
