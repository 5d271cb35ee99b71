use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::func::{DynParams, ParamList, signature};
use crate::member::{MemberDesc, MemberKind, names_of};
use crate::object::{Object, ObjectRef};
use crate::types::{TypeInfo, TypeKind};

type Create = dyn Fn(&DynParams) -> ObjectRef<dyn Object> + Send + Sync;

/// Descriptor of one constructor.
///
/// Constructors belong to exactly one class and are not inherited.
pub struct ConstructorDesc {
    member: MemberDesc,
    params: Vec<&'static TypeInfo>,
    param_names: Vec<Cow<'static, str>>,
    create: Box<Create>,
}

super::impl_member_accessors!(ConstructorDesc);

impl ConstructorDesc {
    /// The name given to parameterless constructors made by
    /// [`default_of`](Self::default_of).
    pub const DEFAULT_NAME: &'static str = "DefaultConstructor";

    pub fn new<C, P>(
        name: impl Into<Cow<'static, str>>,
        create: impl Fn(P) -> C + Send + Sync + 'static,
    ) -> Self
    where
        C: Object,
        P: ParamList,
    {
        Self {
            member: MemberDesc::new(MemberKind::Constructor, name),
            params: P::type_infos(),
            param_names: Vec::new(),
            create: Box::new(move |params| ObjectRef::new(create(P::read_from(params))).into_dyn()),
        }
    }

    /// A parameterless constructor calling `C::default()`.
    pub fn default_of<C: Object + Default>() -> Self {
        Self::new(Self::DEFAULT_NAME, |()| C::default())
    }

    pub fn with_param_names<N: Into<Cow<'static, str>>>(
        mut self,
        names: impl IntoIterator<Item = N>,
    ) -> Self {
        self.param_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.params.is_empty()
    }

    #[inline]
    pub fn param_types(&self) -> &[&'static TypeInfo] {
        &self.params
    }

    pub fn param_names(&self) -> Vec<&str> {
        names_of(&self.param_names)
    }

    pub fn signature(&self) -> String {
        signature(TypeInfo::of_kind(TypeKind::Void), self.params.iter().copied())
    }

    pub fn new_params(&self) -> DynParams {
        DynParams::new(TypeInfo::of_kind(TypeKind::Void), &self.params)
    }

    /// Creates an instance, or `None` if the argument types do not match.
    pub fn create(&self, params: &DynParams) -> Option<ObjectRef<dyn Object>> {
        params.matches(&self.params).then(|| (self.create)(params))
    }

    /// Creates an instance from a `Name='Value'` argument string.
    pub fn create_from_str(&self, text: &str) -> ObjectRef<dyn Object> {
        let mut params = self.new_params();
        params.set_from_str(text, &self.param_names());
        (self.create)(&params)
    }
}

impl fmt::Debug for ConstructorDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDesc")
            .field("name", &self.name())
            .field("signature", &self.signature())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::ConstructorDesc;
    use crate::prelude::*;

    #[derive(Object, Default)]
    #[class(name = "Point", namespace = "test_ctor_desc")]
    struct Point {
        x: i32,
        label: String,
    }

    #[test]
    fn creates_from_typed_and_string_arguments() {
        let ctor = ConstructorDesc::new("FromXY", |(x, label): (i32, String)| Point { x, label })
            .with_param_names(["X", "Label"]);
        assert_eq!(ctor.signature(), "void(int,String)");
        assert!(!ctor.is_default());

        let object = ctor.create_from_str("X='3' Label='a'");
        let point = object.borrow_as::<Point>().unwrap();
        assert_eq!((point.x, point.label.as_str()), (3, "a"));

        let params = DynParams::with_args::<(), (i32, String)>((5, String::from("b")));
        let object = ctor.create(&params).unwrap();
        assert_eq!(object.borrow_as::<Point>().unwrap().x, 5);

        let wrong = DynParams::with_args::<(), (bool,)>((true,));
        assert!(ctor.create(&wrong).is_none());
    }

    #[test]
    fn default_constructor() {
        let ctor = ConstructorDesc::default_of::<Point>();
        assert!(ctor.is_default());
        assert_eq!(ctor.name(), ConstructorDesc::DEFAULT_NAME);
        let object = ctor.create(&ctor.new_params()).unwrap();
        assert!(object.borrow().is::<Point>());
    }
}
