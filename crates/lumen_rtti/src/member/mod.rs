//! Member descriptors.
//!
//! A [`Class`](crate::class::Class) lists its members through these shared,
//! immutable descriptors. Each one knows how to reach its member on a live
//! object given as `&dyn Object`.
//!
//! ## Menu
//!
//! - [`VarDesc`]: an attribute, read and written through a [`VarAccess`].
//! - [`MethodDesc`]: a method called with [`DynParams`](crate::func::DynParams).
//! - [`ConstructorDesc`]: creates a new instance.
//! - [`EventDesc`]: a signal stored in the object.
//! - [`EventHandlerDesc`]: a slot, bindable to a signal of another object.

use alloc::borrow::Cow;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// Modules

mod constructor;
mod desc;
mod event;
mod method;
mod slot;
mod var;

// -----------------------------------------------------------------------------
// Exports

pub use constructor::ConstructorDesc;
pub use desc::{MemberDesc, MemberKind};
pub use event::{EventAccess, EventDesc};
pub use method::MethodDesc;
pub use slot::EventHandlerDesc;
pub use var::{VarAccess, VarDesc};

// -----------------------------------------------------------------------------
// Shared accessors

macro_rules! impl_member_accessors {
    ($ty:ty) => {
        impl $ty {
            #[inline]
            pub fn member(&self) -> &$crate::member::MemberDesc {
                &self.member
            }

            #[inline]
            pub fn name(&self) -> &str {
                self.member.name()
            }

            #[inline]
            pub fn description(&self) -> &str {
                self.member.description()
            }

            #[inline]
            pub fn annotation(&self) -> &str {
                self.member.annotation()
            }

            pub fn with_description(
                mut self,
                description: impl Into<alloc::borrow::Cow<'static, str>>,
            ) -> Self {
                self.member.description = description.into();
                self
            }

            pub fn with_annotation(
                mut self,
                annotation: impl Into<alloc::borrow::Cow<'static, str>>,
            ) -> Self {
                self.member.annotation = annotation.into();
                self
            }
        }
    };
}

use impl_member_accessors;

/// Collects parameter names for the `Name='Value'` readers.
fn names_of<'a>(names: &'a [Cow<'static, str>]) -> Vec<&'a str> {
    names.iter().map(|n| n.as_ref()).collect()
}
