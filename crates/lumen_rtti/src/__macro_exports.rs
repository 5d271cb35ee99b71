//! Items named by the code `#[derive(Object)]` and `#[derive(VarEnum)]`
//! generate. Not part of the public API.

pub use alloc::string::String;
pub use alloc::sync::Arc;
pub use alloc::vec;
pub use core::any::Any;
pub use core::option::Option;

// -----------------------------------------------------------------------------
// auto_register

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::class::{ClassManager, ObjectClass};

    pub use inventory;

    /// A registration submitted by `#[class(auto_register)]` or
    /// `impl_auto_register!`.
    pub struct __AutoRegisterFunc(pub fn(&ClassManager));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(manager: &ClassManager);
    }

    impl<T: ObjectClass> __RegisterType for T {
        #[inline]
        fn __register(manager: &ClassManager) {
            manager.register::<T>();
        }
    }

    pub(crate) fn register_all(manager: &ClassManager) {
        let mut count = 0_usize;
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(manager);
            count += 1;
        }
        log::debug!("auto registered {count} classes");
    }
}
