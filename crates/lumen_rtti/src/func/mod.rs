//! Type-erased argument lists.
//!
//! ## Menu
//!
//! - [`Param`]: one standalone typed value.
//! - [`DynParams`]: the arguments and the return slot of one call.
//! - [`ParamList`]: converts argument tuples to and from [`DynParams`].
//! - [`signature`]: formats a call signature such as `int(float,String)`.

// -----------------------------------------------------------------------------
// Modules

mod param_list;
mod params;

// -----------------------------------------------------------------------------
// Exports

pub use param_list::ParamList;
pub use params::{DynParams, Param, signature};
