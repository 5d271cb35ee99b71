#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    lumen_cfg::define_alias! {
        #[cfg(feature = "std")] => std,
        #[cfg(feature = "auto_register")] => auto_register,
        #[cfg(all(debug_assertions, feature = "debug"))] => debug,
    }
}

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate by its absolute path, which must also
// resolve inside the crate and in its doc tests.
extern crate self as lumen_rtti;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod class;
pub mod event;
pub mod func;
pub mod member;
pub mod object;
pub mod parse;
pub mod serde;
pub mod types;
pub mod var;
pub mod xml;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use lumen_rtti_derive as derive;

pub use class::{Class, ClassManager};
pub use object::{Object, ObjectExt, ObjectRef};
pub use var::{DynVar, DynVarMut, Var};

/// Commonly used items.
pub mod prelude {
    pub use crate::class::{Class, ClassBuilder, ClassManager, ObjectClass};
    pub use crate::derive::{Object, VarEnum};
    pub use crate::event::Event;
    pub use crate::func::DynParams;
    pub use crate::object::{DefaultMode, Object, ObjectExt, ObjectRef};
    pub use crate::types::{EnumType, Flags, VarType};
    pub use crate::var::{DynVar, DynVarMut, Var};
}
