//! Declarative control flow built on the component tree.
//!
//! Every combinator renders into a group component that owns its content
//! and rewires its children as the watched value changes:
//!
//! - [`If`] and [`Match`] keep one component per branch and swap them;
//! - [`For`] keeps one component per key and reorders them;
//! - [`Repeat`] grows and shrinks a run of indexed children;
//! - [`Suspense`] shows a fallback while its body has pending async work;
//! - [`ErrorBoundary`] replaces its body with a fallback on error;
//! - [`Lazy`] defers building its content until first mounted.
//!
//! All of them convert into a [`Component`](crate::Component) through
//! [`IntoComponent`](crate::IntoComponent) and into a
//! [`Fragment`](crate::Fragment) through `From`.

mod conditional;
mod error_boundary;
mod lazy;
mod list;
mod repeat;
mod suspense;

use std::rc::Rc;

use crate::fragment::Fragment;

pub use conditional::{If, Match};
pub use error_boundary::{ErrorBoundary, ResetHandle};
pub use lazy::Lazy;
pub use list::For;
pub use repeat::Repeat;
pub use suspense::Suspense;

type Render = Rc<dyn Fn() -> Fragment>;

fn render_fn<F: Into<Fragment>>(render: impl Fn() -> F + 'static) -> Render {
	Rc::new(move || -> Fragment { render().into() })
}

macro_rules! fragment_from_flow {
	($($ty:ident $(<$($param:ident),+>)?),* $(,)?) => {
		$(
			impl$(<$($param: 'static),+>)? From<$ty$(<$($param),+>)?> for Fragment
			where
				$ty$(<$($param),+>)?: crate::fragment::IntoComponent,
			{
				fn from(flow: $ty$(<$($param),+>)?) -> Self {
					Fragment::Component(crate::fragment::IntoComponent::into_component(flow))
				}
			}
		)*
	};
}

fragment_from_flow!(If, Match<T>, For<T, K>, Repeat, Suspense, ErrorBoundary, Lazy);
