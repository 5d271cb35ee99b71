use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::class::{Class, ClassBuilder};
use crate::func::DynParams;
use crate::member::{EventDesc, MethodDesc};
use crate::object::{Object, ObjectExt};
use crate::types::{TypeInfo, TypeKind, VarType};

/// The name of the root class every class derives from.
pub const OBJECT_CLASS: &str = "lumen::Object";

/// The signal emitted by [`ObjectRef`](crate::object::ObjectRef) when the
/// last reference to an object goes away.
pub const SIGNAL_DESTROYED: &str = "SignalDestroyed";

fn string_arg(params: &DynParams, index: usize) -> String {
    params.param(index).map(|p| p.get::<String>()).unwrap_or_default()
}

fn method(
    name: &'static str,
    ret: &'static TypeInfo,
    params: Vec<&'static TypeInfo>,
    names: &[&'static str],
    invoke: fn(&mut dyn Object, &mut DynParams),
) -> MethodDesc {
    MethodDesc::dynamic(name, ret, params, move |object, params| {
        invoke(object, params);
        true
    })
    .with_param_names(names.iter().copied())
}

/// Builds the root class with the dynamic API available to scripts.
pub(crate) fn root_class() -> Class {
    let void = TypeInfo::of_kind(TypeKind::Void);
    let string = String::type_info();

    ClassBuilder::new("Object")
        .namespace("lumen")
        .root()
        .description("Root class of every reflected class")
        .method(
            method("IsInstanceOf", bool::type_info(), vec![string], &["Class"], |object, params| {
                let result = object.is_instance_of(&string_arg(params, 0));
                params.set_return(&result.to_var());
            })
            .with_description("Returns true if the object is an instance of the named class"),
        )
        .method(
            method("SetAttribute", void, vec![string, string], &["Name", "Value"], |object, params| {
                object.set_attribute(&string_arg(params, 0), &string_arg(params, 1));
            })
            .with_description("Sets an attribute from its string form"),
        )
        .method(
            method("SetAttributeDefault", void, vec![string], &["Name"], |object, params| {
                object.set_attribute_default(&string_arg(params, 0));
            })
            .with_description("Restores the default value of an attribute"),
        )
        .method(
            method("CallMethod", void, vec![string, string], &["Name", "Params"], |object, params| {
                object.call_method_str(&string_arg(params, 0), &string_arg(params, 1));
            })
            .with_description("Calls a method with a parameter string"),
        )
        .method(
            method("SetValues", void, vec![string], &["Values"], |object, params| {
                object.set_values(&string_arg(params, 0));
            })
            .with_description("Sets attributes from a Name='Value' string"),
        )
        .method(
            method("SetDefaultValues", void, Vec::new(), &[], |object, _| {
                object.set_default_values();
            })
            .with_description("Restores the default values of all attributes"),
        )
        .method(
            method("ToString", string, Vec::new(), &[], |object, params| {
                let text = object.to_string_value();
                params.set_return(&text.to_var());
            })
            .with_description("Returns the object as a string"),
        )
        .method(
            method("FromString", void, vec![string], &["String"], |object, params| {
                object.from_string_value(&string_arg(params, 0));
            })
            .with_description("Reads the object from a string"),
        )
        .signal(
            EventDesc::detached(SIGNAL_DESTROYED, Vec::new())
                .with_description("Emitted when the object is destroyed"),
        )
        .build()
}
