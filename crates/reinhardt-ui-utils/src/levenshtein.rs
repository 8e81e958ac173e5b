//! Minimal edit scripts between two sequences.
//!
//! [`calc_levenshtein_operations`] computes the cheapest sequence of
//! insertions, removals and replacements that turns `old` into `new`, where
//! every operation costs one. Equality is supplied by the caller so the same
//! routine serves value comparison and identity comparison.
//!
//! ## Application order
//!
//! Operations are returned **right to left**: each operation's `index`
//! refers to the original `old` sequence, and applying the operations in the
//! returned order to a working copy of `old` never invalidates a later
//! operation's index. [`EditOperation::apply`] does exactly that.
//!
//! `Insert` and `Replace` also carry `before`: the element of `new` that will
//! directly follow the inserted item once the whole script is applied. A live
//! container that positions children by reference (rather than by index) can
//! use it as the insertion anchor; the anchor is always already in place when
//! the operation is reached.
//!
//! ## Example
//!
//! ```
//! use reinhardt_ui_utils::{EditOperation, calc_levenshtein_operations};
//!
//! let old = vec!['a', 'b', 'c'];
//! let new = vec!['a', 'x', 'c', 'd'];
//! let ops = calc_levenshtein_operations(&old, &new, |a, b| a == b);
//!
//! let mut working = old.clone();
//! for op in &ops {
//! 	op.apply(&mut working);
//! }
//! assert_eq!(working, new);
//! assert_eq!(ops.len(), 2);
//! ```

/// A single step of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation<T> {
	/// Insert `item` at `index` of the working sequence.
	Insert {
		index: usize,
		item: T,
		/// Element that follows `item` in the final sequence.
		before: Option<T>,
	},
	/// Remove the element at `index`.
	Remove { index: usize, item: T },
	/// Replace the element at `index`.
	Replace {
		index: usize,
		old: T,
		new: T,
		/// Element that follows `new` in the final sequence.
		before: Option<T>,
	},
}

impl<T> EditOperation<T> {
	/// Index into the original sequence this operation targets.
	pub fn index(&self) -> usize {
		match self {
			Self::Insert { index, .. } | Self::Remove { index, .. } | Self::Replace { index, .. } => {
				*index
			}
		}
	}
}

impl<T: Clone> EditOperation<T> {
	/// Applies this operation to a working copy of the original sequence.
	///
	/// Only valid when the operations of one script are applied in the
	/// order they were returned.
	pub fn apply(&self, target: &mut Vec<T>) {
		match self {
			Self::Insert { index, item, .. } => target.insert(*index, item.clone()),
			Self::Remove { index, .. } => {
				target.remove(*index);
			}
			Self::Replace { index, new, .. } => target[*index] = new.clone(),
		}
	}
}

/// Computes a minimal edit script turning `old` into `new`.
///
/// The common prefix and suffix are skipped before the dynamic programming
/// pass, so appending to or trimming the end of a long list costs time
/// proportional to the list length rather than its square. When several
/// scripts share the minimal cost, matches and replacements are preferred
/// over paired insert/remove operations.
pub fn calc_levenshtein_operations<T, F>(old: &[T], new: &[T], eq: F) -> Vec<EditOperation<T>>
where
	T: Clone,
	F: Fn(&T, &T) -> bool,
{
	let prefix = old
		.iter()
		.zip(new.iter())
		.take_while(|(a, b)| eq(a, b))
		.count();
	let suffix = old[prefix..]
		.iter()
		.rev()
		.zip(new[prefix..].iter().rev())
		.take_while(|(a, b)| eq(a, b))
		.count();

	let old_mid = &old[prefix..old.len() - suffix];
	let new_mid = &new[prefix..new.len() - suffix];
	let rows = old_mid.len();
	let cols = new_mid.len();
	let width = cols + 1;

	let mut distance = vec![0usize; (rows + 1) * width];
	for i in 0..=rows {
		distance[i * width] = i;
	}
	for (j, cell) in distance.iter_mut().enumerate().take(width) {
		*cell = j;
	}
	for i in 1..=rows {
		for j in 1..=cols {
			let cost = usize::from(!eq(&old_mid[i - 1], &new_mid[j - 1]));
			let diagonal = distance[(i - 1) * width + j - 1] + cost;
			let removal = distance[(i - 1) * width + j] + 1;
			let insertion = distance[i * width + j - 1] + 1;
			distance[i * width + j] = diagonal.min(removal).min(insertion);
		}
	}

	// `before` is looked up in the full `new` so anchors may land in the
	// skipped suffix.
	let anchor = |j: usize| new.get(prefix + j).cloned();

	let mut operations = Vec::with_capacity(distance[rows * width + cols]);
	let (mut i, mut j) = (rows, cols);
	while i > 0 || j > 0 {
		let current = distance[i * width + j];

		if i > 0 && j > 0 {
			let same = eq(&old_mid[i - 1], &new_mid[j - 1]);
			let diagonal = distance[(i - 1) * width + j - 1] + usize::from(!same);
			if diagonal == current {
				if !same {
					operations.push(EditOperation::Replace {
						index: prefix + i - 1,
						old: old_mid[i - 1].clone(),
						new: new_mid[j - 1].clone(),
						before: anchor(j),
					});
				}
				i -= 1;
				j -= 1;
				continue;
			}
		}

		if i > 0 && distance[(i - 1) * width + j] + 1 == current {
			operations.push(EditOperation::Remove {
				index: prefix + i - 1,
				item: old_mid[i - 1].clone(),
			});
			i -= 1;
		} else {
			operations.push(EditOperation::Insert {
				index: prefix + i,
				item: new_mid[j - 1].clone(),
				before: anchor(j),
			});
			j -= 1;
		}
	}

	operations
}

/// Returns the edit distance between `old` and `new`.
pub fn levenshtein_distance<T, F>(old: &[T], new: &[T], eq: F) -> usize
where
	T: Clone,
	F: Fn(&T, &T) -> bool,
{
	calc_levenshtein_operations(old, new, eq).len()
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	fn chars(value: &str) -> Vec<char> {
		value.chars().collect()
	}

	fn apply_all(old: &[char], ops: &[EditOperation<char>]) -> Vec<char> {
		let mut working = old.to_vec();
		for op in ops {
			op.apply(&mut working);
		}
		working
	}

	#[rstest]
	#[case("", "", 0)]
	#[case("abc", "abc", 0)]
	#[case("", "abc", 3)]
	#[case("abc", "", 3)]
	#[case("kitten", "sitting", 3)]
	#[case("abcdefgh", "bCdDefh", 4)]
	fn test_distance_and_application(#[case] old: &str, #[case] new: &str, #[case] expected: usize) {
		// Arrange
		let (old, new) = (chars(old), chars(new));

		// Act
		let ops = calc_levenshtein_operations(&old, &new, |a, b| a == b);

		// Assert
		assert_eq!(ops.len(), expected);
		assert_eq!(apply_all(&old, &ops), new);
	}

	#[rstest]
	fn test_operations_are_ordered_right_to_left() {
		let old = chars("abcdefgh");
		let new = chars("bCdDefh");

		let ops = calc_levenshtein_operations(&old, &new, |a, b| a == b);

		let indexes: Vec<usize> = ops.iter().map(EditOperation::index).collect();
		let mut sorted = indexes.clone();
		sorted.sort_unstable_by(|a, b| b.cmp(a));
		assert_eq!(indexes, sorted);
	}

	#[rstest]
	fn test_insert_anchor_is_following_new_element() {
		let old = chars("ac");
		let new = chars("abc");

		let ops = calc_levenshtein_operations(&old, &new, |a, b| a == b);

		assert_eq!(
			ops,
			vec![EditOperation::Insert {
				index: 1,
				item: 'b',
				before: Some('c'),
			}]
		);
	}

	#[rstest]
	fn test_append_has_no_anchor() {
		let ops = calc_levenshtein_operations(&chars("ab"), &chars("abz"), |a, b| a == b);

		assert_eq!(
			ops,
			vec![EditOperation::Insert {
				index: 2,
				item: 'z',
				before: None,
			}]
		);
	}

	#[rstest]
	fn test_prefers_replacement_over_insert_and_remove() {
		let ops = calc_levenshtein_operations(&chars("axc"), &chars("ayc"), |a, b| a == b);

		assert!(matches!(
			ops.as_slice(),
			[EditOperation::Replace {
				index: 1,
				old: 'x',
				new: 'y',
				before: Some('c'),
			}]
		));
	}

	#[rstest]
	fn test_custom_equality_is_used() {
		let old = vec!["Alpha".to_string(), "beta".to_string()];
		let new = vec!["alpha".to_string(), "BETA".to_string()];

		let ops = calc_levenshtein_operations(&old, &new, |a, b| a.eq_ignore_ascii_case(b));

		assert!(ops.is_empty());
	}

	proptest! {
		#[test]
		fn prop_script_transforms_old_into_new(
			old in proptest::collection::vec(0u8..6, 0..24),
			new in proptest::collection::vec(0u8..6, 0..24),
		) {
			let ops = calc_levenshtein_operations(&old, &new, |a, b| a == b);
			let mut working = old.clone();
			for op in &ops {
				op.apply(&mut working);
			}
			prop_assert_eq!(working, new.clone());
			prop_assert!(ops.len() <= old.len().max(new.len()));
		}

		#[test]
		fn prop_distance_is_symmetric(
			old in proptest::collection::vec(0u8..4, 0..16),
			new in proptest::collection::vec(0u8..4, 0..16),
		) {
			prop_assert_eq!(
				levenshtein_distance(&old, &new, |a, b| a == b),
				levenshtein_distance(&new, &old, |a, b| a == b)
			);
		}
	}
}
