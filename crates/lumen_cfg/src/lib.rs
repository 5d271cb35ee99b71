//! Macros for compilation control.
//!
//! ## Menu
//!
//! - [`define_alias!`]: binds a `#[cfg(...)]` predicate to a macro name.
//! - [`enabled!`] / [`disabled!`]: the two states an alias can take.
//!
//! # Examples
//!
//! ```
//! mod cfg {
//!     lumen_cfg::define_alias! {
//!         #[cfg(debug_assertions)] => debug,
//!         #[cfg(any())] => never,
//!     }
//! }
//!
//! cfg::never! { compile_error!("unreachable"); }
//!
//! let level = cfg::never! { if { 0 } else { 1 } };
//! assert_eq!(level, 1);
//! assert!(!cfg::never!());
//! ```
#![no_std]

// -----------------------------------------------------------------------------
// States

/// Expands its content as-is.
///
/// With the `if { .. } else { .. }` form, only the first block is kept.
/// With no input it expands to `true`.
#[macro_export]
#[doc(hidden)]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($p)* };
    (if { $($p:tt)* }) => { $($p)* };
    ($($p:tt)*) => { $($p)* };
}

/// Discards its content.
///
/// With the `if { .. } else { .. }` form, only the second block is kept.
/// With no input it expands to `false`.
#[macro_export]
#[doc(hidden)]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($n)* };
    (if { $($p:tt)* }) => {};
    ($($p:tt)*) => {};
}

// -----------------------------------------------------------------------------
// Alias

/// Defines one macro per `#[cfg(...)] => name` entry.
///
/// The generated macro behaves like [`enabled!`] when the predicate holds and
/// like [`disabled!`] otherwise, so a feature check can be written as a
/// block instead of repeating the attribute on every item:
///
/// ```
/// mod cfg {
///     lumen_cfg::define_alias! {
///         #[cfg(all())] => always,
///     }
/// }
///
/// let value = cfg::always! { if { 10 } else { 20 } };
/// assert_eq!(value, 10);
/// assert!(cfg::always!());
/// ```
#[macro_export]
macro_rules! define_alias {
    () => {};
    (
        #[cfg($meta:meta)] => $p:ident
        $(, $($rest:tt)*)?
    ) => {
        #[cfg($meta)]
        #[doc(inline)]
        #[allow(unused_imports)]
        pub use $crate::enabled as $p;

        #[cfg(not($meta))]
        #[doc(inline)]
        #[allow(unused_imports)]
        pub use $crate::disabled as $p;

        $($crate::define_alias! { $($rest)* })?
    };
}
