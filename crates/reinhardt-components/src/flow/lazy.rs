use std::cell::RefCell;
use std::future::Future;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::component::Component;
use crate::fragment::{Fragment, IntoComponent};

enum Load {
	Now(Box<dyn FnOnce() -> Fragment>),
	Later(Box<dyn FnOnce() -> LocalBoxFuture<'static, Fragment>>),
}

/// Content built the first time the component is mounted.
///
/// [`Lazy::future`] loads the content asynchronously; until it arrives the
/// load counts as pending work for the nearest [`Suspense`](super::Suspense).
pub struct Lazy {
	load: Load,
}

impl Lazy {
	pub fn new<F: Into<Fragment>>(thunk: impl FnOnce() -> F + 'static) -> Self {
		Self {
			load: Load::Now(Box::new(move || -> Fragment { thunk().into() })),
		}
	}

	pub fn future<F, Fut>(thunk: impl FnOnce() -> Fut + 'static) -> Self
	where
		F: Into<Fragment> + 'static,
		Fut: Future<Output = F> + 'static,
	{
		Self {
			load: Load::Later(Box::new(move || {
				thunk().map(Into::<Fragment>::into).boxed_local()
			})),
		}
	}
}

impl IntoComponent for Lazy {
	fn into_component(self) -> Component {
		let group = Component::group_named("lazy");
		let load = RefCell::new(Some(self.load));
		group.on_mount(move |group| {
			let Some(load) = load.borrow_mut().take() else {
				return Ok(());
			};
			match load {
				Load::Now(thunk) => group.append_fragment(thunk())?,
				Load::Later(thunk) => group.track_future(thunk(), |group, fragment| {
					group.append_fragment(fragment)?;
					Ok(())
				}),
			}
			Ok(())
		});
		group
	}
}
