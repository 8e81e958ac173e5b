//! Runtime tuning knobs.

/// Configuration of a thread's reactive runtime.
///
/// With the `serde` feature enabled this can be loaded from application
/// settings; missing fields fall back to [`RuntimeConfig::default`].
///
/// ```
/// use reinhardt_reactive::{RuntimeConfig, configure_runtime, runtime_config};
///
/// configure_runtime(RuntimeConfig {
/// 	max_flush_iterations: 64,
/// 	..RuntimeConfig::default()
/// });
/// assert_eq!(runtime_config().max_flush_iterations, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuntimeConfig {
	/// Effect runs allowed in one flush before the queue is abandoned.
	///
	/// Guards against effects that keep invalidating each other.
	pub max_flush_iterations: usize,
	/// Log a warning when an effect finishes with no tracked reads, since
	/// such an effect can never be re-triggered.
	pub warn_on_untracked_effects: bool,
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		Self {
			max_flush_iterations: 10_000,
			warn_on_untracked_effects: false,
		}
	}
}
