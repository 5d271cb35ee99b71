use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::func::{DynParams, ParamList, signature};
use crate::member::{MemberDesc, MemberKind, names_of};
use crate::object::Object;
use crate::types::{TypeInfo, VarType};
use crate::xml::XmlElement;

type Invoke = dyn Fn(&mut dyn Object, &mut DynParams) -> bool + Send + Sync;

/// Descriptor of one method.
///
/// ```
/// use lumen_rtti::member::MethodDesc;
/// use lumen_rtti::prelude::*;
///
/// #[derive(Object, Default)]
/// #[class(name = "Counter", namespace = "doc")]
/// struct Counter {
///     #[attribute]
///     value: i32,
/// }
///
/// let add = MethodDesc::new("Add", |this: &mut Counter, (n,): (i32,)| {
///     this.value += n;
///     this.value
/// })
/// .with_param_names(["Amount"]);
/// assert_eq!(add.signature(), "int(int)");
///
/// let mut counter = Counter::default();
/// let result = add.call_str(&mut counter, "Amount='4'");
/// assert_eq!(result.get_return::<i32>(), 4);
/// ```
pub struct MethodDesc {
    member: MemberDesc,
    ret: &'static TypeInfo,
    params: Vec<&'static TypeInfo>,
    param_names: Vec<Cow<'static, str>>,
    invoke: Box<Invoke>,
}

super::impl_member_accessors!(MethodDesc);

impl MethodDesc {
    /// A method implemented by a closure over `C` with typed arguments.
    pub fn new<C, R, P>(
        name: impl Into<Cow<'static, str>>,
        method: impl Fn(&mut C, P) -> R + Send + Sync + 'static,
    ) -> Self
    where
        C: Object,
        R: VarType,
        P: ParamList,
    {
        Self::dynamic(name, R::type_info(), P::type_infos(), move |object, params| {
            match object.downcast_mut::<C>() {
                Some(this) => {
                    let ret = method(this, P::read_from(params));
                    params.set_return(&ret.to_var());
                    true
                }
                None => false,
            }
        })
    }

    /// A method working on the type-erased object and arguments directly.
    ///
    /// `invoke` returns `false` if the object is not one it can handle.
    pub fn dynamic(
        name: impl Into<Cow<'static, str>>,
        ret: &'static TypeInfo,
        params: Vec<&'static TypeInfo>,
        invoke: impl Fn(&mut dyn Object, &mut DynParams) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            member: MemberDesc::new(MemberKind::Method, name),
            ret,
            params,
            param_names: Vec::new(),
            invoke: Box::new(invoke),
        }
    }

    /// Names the parameters for `Name='Value'` and XML calls.
    pub fn with_param_names<N: Into<Cow<'static, str>>>(
        mut self,
        names: impl IntoIterator<Item = N>,
    ) -> Self {
        self.param_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn return_type(&self) -> &'static TypeInfo {
        self.ret
    }

    #[inline]
    pub fn param_types(&self) -> &[&'static TypeInfo] {
        &self.params
    }

    pub fn param_names(&self) -> Vec<&str> {
        names_of(&self.param_names)
    }

    pub fn signature(&self) -> String {
        signature(self.ret, self.params.iter().copied())
    }

    /// Fresh arguments for this method, every slot at its zero value.
    pub fn new_params(&self) -> DynParams {
        DynParams::new(self.ret, &self.params)
    }

    /// Calls the method. The argument types must match exactly.
    pub fn call(&self, object: &mut dyn Object, params: &mut DynParams) -> bool {
        if !params.matches(&self.params) || params.return_type() != self.ret {
            log::warn!(
                "method `{}` has signature `{}`, called with `{}`",
                self.name(),
                self.signature(),
                params.signature()
            );
            return false;
        }
        self.invoke_unchecked(object, params)
    }

    /// Calls the method with arguments read from a `Name='Value'` string.
    pub fn call_str(&self, object: &mut dyn Object, text: &str) -> DynParams {
        let mut params = self.new_params();
        params.set_from_str(text, &self.param_names());
        self.invoke_unchecked(object, &mut params);
        params
    }

    /// Calls the method with arguments read from XML attributes.
    pub fn call_xml(&self, object: &mut dyn Object, element: &XmlElement) -> DynParams {
        let mut params = self.new_params();
        params.set_from_xml(element, &self.param_names());
        self.invoke_unchecked(object, &mut params);
        params
    }

    fn invoke_unchecked(&self, object: &mut dyn Object, params: &mut DynParams) -> bool {
        let called = (self.invoke)(object, params);
        if !called {
            log::warn!(
                "method `{}` cannot be called on a `{}`",
                self.name(),
                object.class().name()
            );
        }
        called
    }
}

impl fmt::Debug for MethodDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDesc")
            .field("name", &self.name())
            .field("signature", &self.signature())
            .finish()
    }
}
