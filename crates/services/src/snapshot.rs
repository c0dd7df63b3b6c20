//! Append-only caches published with CAS.
//!
//! # Mental model
//!
//! * Readers load the current `Arc` snapshot and look up against that immutable view.
//! * Writers copy the snapshot, add one entry, and publish with `compare_and_swap`.
//! * A failed CAS means someone else published first; the writer reloads and, if
//!   the key is now present, discards its own value in favor of the installed one.
//!
//! # Invariants
//!
//! * Once a key is visible, every later read returns the identical value.
//! * Entries are never removed or replaced.
//! * No locks are held while a caller-supplied constructor runs, so constructors
//!   may re-enter the same cache for other keys.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use rustc_hash::FxHashMap as HashMap;

/// Append-only map with install-if-absent publication.
pub struct SnapshotMap<K, V> {
	snap: ArcSwap<HashMap<K, V>>,
}

impl<K, V> Default for SnapshotMap<K, V> {
	fn default() -> Self {
		Self {
			snap: ArcSwap::from_pointee(HashMap::default()),
		}
	}
}

impl<K, V> SnapshotMap<K, V>
where
	K: Eq + Hash + Clone,
	V: Clone,
{
	pub fn new() -> Self {
		Self::default()
	}

	#[inline]
	pub fn get<Q>(&self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.snap.load().get(key).cloned()
	}

	/// Returns the value installed for `key`, building and installing it first if absent.
	///
	/// `make` runs at most once per call, outside any critical section. Under
	/// contention several callers may run it; exactly one result is installed and
	/// all callers return that result.
	pub fn get_or_install_with<F>(&self, key: K, make: F) -> V
	where
		F: FnOnce() -> V,
	{
		if let Some(existing) = self.snap.load().get(&key) {
			return existing.clone();
		}

		let value = make();
		loop {
			let cur = self.snap.load_full();
			if let Some(existing) = cur.get(&key) {
				return existing.clone();
			}

			let mut next = (*cur).clone();
			next.insert(key.clone(), value.clone());

			let prev = self.snap.compare_and_swap(&cur, Arc::new(next));
			if Arc::ptr_eq(&prev, &cur) {
				return value;
			}
			tracing::trace!("snapshot map publish lost a race; retrying");
		}
	}

	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Write-once slot with install-if-absent publication.
pub struct SnapshotCell<T> {
	slot: ArcSwapOption<T>,
}

impl<T> Default for SnapshotCell<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> SnapshotCell<T> {
	pub const fn new() -> Self {
		Self {
			slot: ArcSwapOption::const_empty(),
		}
	}

	#[inline]
	pub fn get(&self) -> Option<Arc<T>> {
		self.slot.load_full()
	}

	/// Returns the installed value, building and installing it first if the slot is empty.
	pub fn get_or_install_with<F>(&self, make: F) -> Arc<T>
	where
		F: FnOnce() -> T,
	{
		if let Some(existing) = self.slot.load_full() {
			return existing;
		}

		let candidate = Arc::new(make());
		let prev = self.slot.compare_and_swap(&None::<Arc<T>>, Some(candidate.clone()));
		match &*prev {
			Some(existing) => {
				tracing::trace!("snapshot cell already filled; discarding candidate");
				existing.clone()
			}
			None => candidate,
		}
	}
}
