use std::cell::Cell;

use crate::component::Component;
use crate::fragment::{Fragment, IntoComponent};

/// Shows `fallback` while async work inside `body` is pending.
///
/// The body is built and mounted right away; while its pending count is
/// above zero its host nodes are held out of the document and the fallback
/// is shown instead. The switch happens only when the count moves between
/// zero and non-zero, so any number of loads resolving in any order cause a
/// single transition each way. Pending work in the body does not reach an
/// enclosing `Suspense`.
pub struct Suspense {
	fallback: Fragment,
	body: Fragment,
}

impl Suspense {
	pub fn new(fallback: impl Into<Fragment>, body: impl Into<Fragment>) -> Self {
		Self {
			fallback: fallback.into(),
			body: body.into(),
		}
	}
}

impl IntoComponent for Suspense {
	fn into_component(self) -> Component {
		let root = Component::group_named("suspense");
		let body = Component::group_named("suspense-body");
		let fallback = Component::from_fragment(self.fallback);

		let structure = fallback
			.set_detached(true)
			.and_then(|()| root.append_child(&body))
			.and_then(|()| root.append_child(&fallback));
		if let Err(error) = structure {
			root.inject_error(error.into());
		}

		let showing_fallback = Cell::new(false);
		let fallback_handle = fallback.downgrade();
		body.set_suspense_handler(move |body, pending| {
			let pending = pending > 0;
			if showing_fallback.replace(pending) == pending {
				return;
			}
			let Some(fallback) = fallback_handle.upgrade() else {
				return;
			};
			tracing::debug!(pending, "suspense boundary switching");
			let result = body
				.set_detached(pending)
				.and_then(|()| fallback.set_detached(!pending));
			if let Err(error) = result {
				body.inject_error(error.into());
			}
		});

		if let Err(error) = body.append_fragment(self.body) {
			body.inject_error(error.into());
		}
		root
	}
}
