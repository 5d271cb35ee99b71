use alloc::vec;
use alloc::vec::Vec;

use crate::func::DynParams;
use crate::types::{TypeInfo, VarType};
use crate::var::{DynVarMut, Var};

/// A tuple of typed arguments.
///
/// Implemented for tuples of up to six [`VarType`] elements, including `()`.
/// Missing positions read back as zero values.
pub trait ParamList: Sized + 'static {
    const LEN: usize;

    fn type_infos() -> Vec<&'static TypeInfo>;

    /// Stores the tuple into the first `LEN` parameters of `params`.
    fn write_to(&self, params: &mut DynParams);

    fn read_from(params: &DynParams) -> Self;
}

impl ParamList for () {
    const LEN: usize = 0;

    #[inline]
    fn type_infos() -> Vec<&'static TypeInfo> {
        Vec::new()
    }

    #[inline]
    fn write_to(&self, _: &mut DynParams) {}

    #[inline]
    fn read_from(_: &DynParams) -> Self {}
}

fn read_param<T: VarType>(params: &DynParams, index: usize) -> T {
    match params.param(index) {
        Some(param) => param.get(),
        None => T::from_var(&Var::Void),
    }
}

fn write_param<T: VarType>(params: &mut DynParams, index: usize, value: &T) {
    if let Some(param) = params.param_mut(index) {
        param.set_var(&value.to_var());
    }
}

macro_rules! impl_param_list {
    ($len:literal => $($name:ident : $index:tt),*) => {
        impl<$($name: VarType),*> ParamList for ($($name,)*) {
            const LEN: usize = $len;

            fn type_infos() -> Vec<&'static TypeInfo> {
                vec![$($name::type_info()),*]
            }

            fn write_to(&self, params: &mut DynParams) {
                $(write_param(params, $index, &self.$index);)*
            }

            fn read_from(params: &DynParams) -> Self {
                ($(read_param::<$name>(params, $index),)*)
            }
        }
    };
}

impl_param_list!(1 => A: 0);
impl_param_list!(2 => A: 0, B: 1);
impl_param_list!(3 => A: 0, B: 1, C: 2);
impl_param_list!(4 => A: 0, B: 1, C: 2, D: 3);
impl_param_list!(5 => A: 0, B: 1, C: 2, D: 3, E: 4);
impl_param_list!(6 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

#[cfg(test)]
mod tests {
    use super::ParamList;
    use crate::func::DynParams;
    use crate::types::{TypeInfo, TypeKind};
    use alloc::string::String;

    #[test]
    fn tuples_read_back_what_they_wrote() {
        let params = DynParams::with_args::<(), _>((1_u8, String::from("a"), true));
        assert_eq!(<(u8, String, bool)>::LEN, 3);
        assert_eq!(<(u8, String, bool)>::read_from(&params), (1, String::from("a"), true));
    }

    #[test]
    fn short_lists_read_zero_values() {
        let params = DynParams::new(TypeInfo::of_kind(TypeKind::Void), &[]);
        assert_eq!(<(i32, String)>::read_from(&params), (0, String::new()));
    }
}
