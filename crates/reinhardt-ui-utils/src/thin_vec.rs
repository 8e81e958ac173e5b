//! Small-size optimized collection.
//!
//! Almost every component carries zero or one listener of each kind. A plain
//! `Vec` would allocate for the single-element case; [`ThinVec`] keeps that
//! element inline in a [`SmallVec`] and spills to the heap on the second
//! push.

use core::fmt;
use core::mem;
use core::slice;

use smallvec::SmallVec;

/// A sequence that stores zero or one element inline.
///
/// Elements are kept in insertion order. Iteration order always matches
/// the order of [`push`](ThinVec::push) calls.
///
/// # Example
///
/// ```
/// use reinhardt_ui_utils::ThinVec;
///
/// let mut items = ThinVec::new();
/// assert!(items.is_empty());
///
/// items.push("mount");
/// items.push("update");
/// assert_eq!(items.len(), 2);
/// assert_eq!(items.iter().copied().collect::<Vec<_>>(), ["mount", "update"]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ThinVec<T>(SmallVec<[T; 1]>);

impl<T> ThinVec<T> {
	/// Creates an empty collection without allocating.
	pub fn new() -> Self {
		Self(SmallVec::new())
	}

	/// Appends an element.
	pub fn push(&mut self, value: T) {
		self.0.push(value);
	}

	/// Number of stored elements.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no element is stored.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the element at `index`, if any.
	pub fn get(&self, index: usize) -> Option<&T> {
		self.0.get(index)
	}

	/// Whether the elements have moved to the heap.
	pub fn spilled(&self) -> bool {
		self.0.spilled()
	}

	pub fn as_slice(&self) -> &[T] {
		self.0.as_slice()
	}

	pub fn as_mut_slice(&mut self) -> &mut [T] {
		self.0.as_mut_slice()
	}

	/// Iterates over the elements in insertion order.
	pub fn iter(&self) -> slice::Iter<'_, T> {
		self.0.iter()
	}

	pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
		self.0.iter_mut()
	}

	/// Keeps only the elements for which `keep` returns `true`.
	pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
		self.0.retain(|item| keep(item));
	}

	/// Removes every element, returning the previous contents.
	pub fn take(&mut self) -> Self {
		mem::take(self)
	}

	pub fn clear(&mut self) {
		self.0.clear();
	}
}

impl<T: Clone> ThinVec<T> {
	/// Copies the elements into a `Vec`.
	///
	/// Listener dispatch uses this to release the owning `RefCell` before
	/// calling out, so listeners may register further listeners.
	pub fn to_vec(&self) -> Vec<T> {
		self.0.to_vec()
	}
}

impl<T> Default for ThinVec<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: fmt::Debug> fmt::Debug for ThinVec<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

impl<T> FromIterator<T> for ThinVec<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<T> Extend<T> for ThinVec<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		self.0.extend(iter);
	}
}

impl<'a, T> IntoIterator for &'a ThinVec<T> {
	type Item = &'a T;
	type IntoIter = slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Owning iterator returned by [`ThinVec::into_iter`].
pub type IntoIter<T> = smallvec::IntoIter<[T; 1]>;

impl<T> IntoIterator for ThinVec<T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
