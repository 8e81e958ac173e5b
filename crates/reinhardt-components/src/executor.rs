//! Hook for running async work on the application's local executor.
//!
//! The component tree never owns an event loop. The application installs a
//! spawner for the current thread: a [`LocalSpawner`] from a
//! [`LocalPool`](futures::executor::LocalPool) in native builds and tests,
//! or any closure forwarding to the platform's local task queue.

use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawnExt, SpawnError};

use crate::error::{UiError, UiResult};

type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>) -> Result<(), SpawnError>>;

thread_local! {
	static SPAWNER: RefCell<Option<Spawner>> = const { RefCell::new(None) };
}

/// Installs `spawner` for this thread, replacing any previous one.
pub fn set_spawner(
	spawner: impl Fn(LocalBoxFuture<'static, ()>) -> Result<(), SpawnError> + 'static,
) {
	SPAWNER.with(|slot| *slot.borrow_mut() = Some(Rc::new(spawner)));
}

/// Installs a [`LocalSpawner`] for this thread.
pub fn set_local_spawner(spawner: LocalSpawner) {
	set_spawner(move |future| spawner.spawn_local(future));
}

/// Removes the spawner installed for this thread.
pub fn clear_spawner() {
	SPAWNER.with(|slot| slot.borrow_mut().take());
}

pub fn has_spawner() -> bool {
	SPAWNER.with(|slot| slot.borrow().is_some())
}

pub(crate) fn spawn_local(future: LocalBoxFuture<'static, ()>) -> UiResult<()> {
	// Clone out so a spawner that polls eagerly may spawn again.
	let spawner = SPAWNER.with(|slot| slot.borrow().clone());
	let Some(spawner) = spawner else {
		tracing::warn!("async work started with no spawner installed");
		return Err(UiError::NoExecutor);
	};
	spawner(future).map_err(|error| UiError::Spawn(error.to_string()))
}
