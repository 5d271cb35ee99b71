use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::class::Class;
use crate::event::{DynEvent, DynEventHandler};
use crate::func::DynParams;
use crate::member::EventDesc;
use crate::object::Object;
use crate::parse::{ParamsParser, write_token};
use crate::var::{Attribute, AttributeMut, DynVar, DynVarMut};
use crate::xml::XmlElement;

/// Which attributes [`ObjectExt::get_values`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DefaultMode {
    /// Every attribute.
    #[default]
    WithDefault,
    /// Only attributes that differ from their declared default.
    NoDefault,
}

/// The dynamic API of every [`Object`], driven by its class's descriptors.
///
/// Unknown attribute, method and signal names are not errors: setters do
/// nothing and return `false`, lookups return `None`.
///
/// ```
/// use lumen_rtti::prelude::*;
///
/// #[derive(Object, Default)]
/// #[class(name = "Lamp", namespace = "doc")]
/// struct Lamp {
///     #[attribute(default = 1.0)]
///     brightness: f32,
///     #[attribute]
///     label: String,
/// }
///
/// let mut lamp = Lamp { brightness: 1.0, label: String::new() };
/// lamp.set_values("Brightness='0.5' Label=\"Hall\" Unknown='1'");
/// assert_eq!(lamp.brightness, 0.5);
/// assert_eq!(lamp.get_values(DefaultMode::NoDefault), "Brightness='0.5' Label='Hall'");
///
/// lamp.set_default_values();
/// assert_eq!(lamp.get_values(DefaultMode::NoDefault), "");
/// assert_eq!(lamp.get_values(DefaultMode::WithDefault), "Brightness='1' Label=''");
/// ```
pub trait ObjectExt: Object {
    /// Returns `true` if the object's class is `class_name` or derives from it.
    fn is_instance_of(&self, class_name: &str) -> bool {
        self.class().is_derived_from(class_name)
    }

    fn is_instance_of_class(&self, class: &Class) -> bool {
        self.class().is_derived_from_class(class)
    }

    fn attributes(&self) -> Vec<Attribute<'_>> {
        let object = self.as_object();
        self.class()
            .attributes()
            .into_iter()
            .map(|desc| Attribute::new(object, desc))
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        let desc = self.class().attribute(name)?;
        Some(Attribute::new(self.as_object(), desc))
    }

    fn attribute_mut(&mut self, name: &str) -> Option<AttributeMut<'_>> {
        let desc = self.class().attribute(name)?;
        Some(AttributeMut::new(self.as_object_mut(), desc))
    }

    /// Sets an attribute from its string form.
    fn set_attribute(&mut self, name: &str, value: &str) -> bool {
        match self.attribute_mut(name) {
            Some(mut attribute) => {
                attribute.set_string(value);
                true
            }
            None => false,
        }
    }

    /// Sets an attribute from another value, converting to its type.
    fn set_attribute_var(&mut self, name: &str, value: &dyn DynVar) -> bool {
        match self.attribute_mut(name) {
            Some(mut attribute) => {
                attribute.set_from(value);
                true
            }
            None => false,
        }
    }

    /// Restores the declared default of an attribute.
    fn set_attribute_default(&mut self, name: &str) -> bool {
        match self.attribute_mut(name) {
            Some(mut attribute) => {
                attribute.set_default();
                true
            }
            None => false,
        }
    }

    /// Calls a method with prepared arguments.
    ///
    /// Returns `false` if there is no such method or the argument types differ.
    fn call_method(&mut self, name: &str, params: &mut DynParams) -> bool {
        match self.class().method(name) {
            Some(method) => method.call(self.as_object_mut(), params),
            None => false,
        }
    }

    /// Calls a method with arguments from a `Name='Value'` string and returns
    /// the arguments with the return value filled in.
    fn call_method_str(&mut self, name: &str, params: &str) -> Option<DynParams> {
        let method = self.class().method(name)?;
        Some(method.call_str(self.as_object_mut(), params))
    }

    /// Calls a method with arguments from the attributes of an element.
    fn call_method_xml(&mut self, name: &str, element: &XmlElement) -> Option<DynParams> {
        let method = self.class().method(name)?;
        Some(method.call_xml(self.as_object_mut(), element))
    }

    /// Writes the attributes as a `Name='Value'` token string.
    fn get_values(&self, mode: DefaultMode) -> String {
        let mut out = String::new();
        for attribute in self.attributes() {
            if mode == DefaultMode::NoDefault && attribute.is_default() {
                continue;
            }
            write_token(&mut out, attribute.name(), &attribute.get_string());
        }
        out
    }

    /// Sets attributes from a `Name='Value'` token string.
    ///
    /// Unknown names and malformed tokens are skipped.
    fn set_values(&mut self, text: &str) {
        for (name, value) in ParamsParser::new(text) {
            if !self.set_attribute(name, &value) {
                log::warn!("`{}` has no attribute `{name}`, value skipped", self.class().name());
            }
        }
    }

    /// Writes the attributes as XML attributes of `element`.
    fn get_values_xml(&self, element: &mut XmlElement, mode: DefaultMode) {
        for attribute in self.attributes() {
            if mode == DefaultMode::NoDefault && attribute.is_default() {
                continue;
            }
            element.set_attribute(attribute.name(), attribute.get_string());
        }
    }

    /// Sets attributes from the XML attributes of `element`.
    fn set_values_xml(&mut self, element: &XmlElement) {
        for (name, value) in element.attributes() {
            if !self.set_attribute(name, value) {
                log::warn!("`{}` has no attribute `{name}`, value skipped", self.class().name());
            }
        }
    }

    /// Restores every attribute to its declared default.
    fn set_default_values(&mut self) {
        for desc in self.class().attributes() {
            AttributeMut::new(self.as_object_mut(), desc).set_default();
        }
    }

    /// The descriptors of every signal of this object.
    fn signals(&self) -> Vec<Arc<EventDesc>> {
        self.class().signals()
    }

    /// A signal of this object, by name.
    fn signal(&mut self, name: &str) -> Option<DynEvent<'_>> {
        let desc = self.class().signal(name)?;
        let storage = desc.event_mut(self.as_object_mut())?;
        Some(DynEvent::new(desc, storage))
    }

    /// The handlers currently connected to a signal.
    fn signal_handlers(&self, name: &str) -> Option<Vec<DynEventHandler>> {
        let desc = self.class().signal(name)?;
        let storage = desc.event(self.as_object())?;
        Some(storage.handlers().to_vec())
    }
}

impl<T: Object + ?Sized> ObjectExt for T {}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::func::DynParams;
    use crate::member::MethodDesc;
    use crate::prelude::*;
    use crate::xml::XmlElement;

    #[derive(VarEnum, Clone, Copy, Debug, PartialEq, Default)]
    enum Shape {
        #[default]
        Point,
        Spot,
        Area,
    }

    #[derive(VarEnum, Clone, Copy)]
    enum Channel {
        Diffuse = 1,
        Specular = 2,
        Shadow = 4,
    }

    #[derive(Object, Default)]
    #[class(name = "Entity", namespace = "test_ext", property(Icon = "entity.png"))]
    struct Entity {
        #[attribute]
        name: String,
    }

    #[derive(Object, Default)]
    #[class(namespace = "test_ext", constructor, members = Self::members)]
    struct Light {
        #[base]
        entity: Entity,
        #[attribute(default = "Spot")]
        shape: Shape,
        #[attribute]
        channels: Flags<Channel>,
        #[attribute(default = 1.0, description = "Light intensity")]
        intensity: f32,
    }

    impl Light {
        fn members(builder: ClassBuilder) -> ClassBuilder {
            builder.method(
                MethodDesc::new("Scale", |this: &mut Light, (factor,): (f32,)| {
                    this.intensity *= factor;
                    this.intensity
                })
                .with_param_names(["Factor"]),
            )
        }
    }

    #[test]
    fn base_members_reach_the_embedded_base() {
        let mut light = Light::default();
        let class = light.class();
        assert_eq!(class.name(), "test_ext::Light");
        assert_eq!(class.base_class_name(), Some("test_ext::Entity"));
        assert_eq!(class.property("Icon").as_deref(), Some("entity.png"));

        assert!(light.is_instance_of("test_ext::Entity"));
        assert!(light.is_instance_of("lumen::Object"));
        assert!(light.set_attribute("Name", "Key"));
        assert_eq!(light.entity.name, "Key");
        assert_eq!(light.attribute("Name").unwrap().get_string(), "Key");

        let object: &dyn Object = &light;
        assert!(object.is::<Entity>());
        assert_eq!(object.downcast_ref::<Entity>().unwrap().name, "Key");
    }

    #[test]
    fn enums_and_flags_use_names() {
        let mut light = Light::default();
        light.set_default_values();
        assert_eq!(light.shape, Shape::Spot);
        assert_eq!(light.intensity, 1.0);

        light.set_values("Shape='Area' Channels='Diffuse|Shadow'");
        assert_eq!(light.shape, Shape::Area);
        assert!(light.channels.contains(Channel::Shadow));
        assert!(!light.channels.contains(Channel::Specular));
        assert_eq!(
            light.get_values(DefaultMode::NoDefault),
            "Shape='Area' Channels='Diffuse|Shadow'"
        );

        light.set_attribute("Shape", "7");
        assert_eq!(light.shape, Shape::Point);
        let intensity = light.attribute("Intensity").unwrap();
        assert_eq!(intensity.desc().description(), "Light intensity");
        assert_eq!(intensity.type_name(), "float");
    }

    #[test]
    fn methods_by_name() {
        let mut light = Light::default();
        light.intensity = 2.0;

        let result = light.call_method_str("Scale", "Factor='1.5'").unwrap();
        assert_eq!(result.get_return::<f32>(), 3.0);

        let mut params = DynParams::with_args::<f32, (f32,)>((2.0,));
        assert!(light.call_method("Scale", &mut params));
        assert_eq!(light.intensity, 6.0);

        let mut wrong = DynParams::with_args::<f32, (i32,)>((2,));
        assert!(!light.call_method("Scale", &mut wrong));
        assert!(light.call_method_str("Missing", "").is_none());
    }

    #[test]
    fn root_methods_are_inherited() {
        let mut light = Light::default();
        let check = light.call_method_str("IsInstanceOf", "Class='test_ext::Entity'").unwrap();
        assert!(check.get_return::<bool>());

        light.call_method_str("SetAttribute", "Name='Intensity' Value='0.25'");
        assert_eq!(light.intensity, 0.25);

        light.call_method_str("CallMethod", "Name='Scale' Params=\"Factor='4'\"");
        assert_eq!(light.intensity, 1.0);

        let text = light.call_method_str("ToString", "").unwrap();
        assert_eq!(
            text.get_return::<String>(),
            "Shape='Point' Channels='0' Intensity='1' Name=''"
        );
    }

    #[test]
    fn xml_round_trip() {
        let mut light = Light::default();
        light.set_default_values();
        light.set_attribute("Name", "Fill");
        light.set_attribute("Intensity", "0.5");

        let element = light.to_xml();
        assert_eq!(element.name(), "test_ext::Light");
        assert_eq!(element.attribute("Intensity"), Some("0.5"));
        assert_eq!(element.attribute("Shape"), Some("Spot"));

        let mut copy = Light::default();
        assert!(copy.from_xml(&element));
        assert_eq!(copy.intensity, 0.5);
        assert_eq!(copy.shape, Shape::Spot);
        assert_eq!(copy.entity.name, "Fill");

        let text = XmlElement::parse(&element.to_xml_string()).unwrap();
        let mut reread = Light::default();
        assert!(reread.from_xml(&text));
        assert_eq!(
            reread.get_values(DefaultMode::WithDefault),
            light.get_values(DefaultMode::WithDefault)
        );

        let mut short = XmlElement::new("Light");
        short.set_attribute("Intensity", "3");
        assert!(copy.from_xml(&short));
        assert_eq!(copy.intensity, 3.0);

        assert!(!copy.from_xml(&XmlElement::new("Camera")));
    }

    #[test]
    fn string_form_keeps_values_equal_to_defaults() {
        let mut saved = Light::default();
        saved.set_default_values();
        assert_eq!(saved.intensity, 1.0);

        let mut loaded = Light::default();
        assert_eq!(loaded.intensity, 0.0);
        loaded.from_string_value(&saved.to_string_value());
        assert_eq!(loaded.intensity, 1.0);
        assert_eq!(loaded.shape, Shape::Spot);

        let mut loaded = Light::default();
        assert!(loaded.from_xml(&saved.to_xml()));
        assert_eq!(loaded.intensity, 1.0);
        assert_eq!(loaded.shape, Shape::Spot);
    }

    #[test]
    fn values_round_trip_with_defaults() {
        let mut light = Light::default();
        light.set_values(r#"Shape='Area' Channels='Specular|Shadow' Intensity='0.125'"#);
        light.entity.name = String::from(r#"it's "x" y='z' C:\dir\"#);

        let text = light.get_values(DefaultMode::WithDefault);
        let mut copy = Light::default();
        copy.set_default_values();
        copy.set_values(&text);

        assert_eq!(copy.shape, light.shape);
        assert_eq!(copy.channels, light.channels);
        assert_eq!(copy.intensity, light.intensity);
        assert_eq!(copy.entity.name, light.entity.name);
        for attribute in light.attributes() {
            let other = copy.attribute(attribute.name()).unwrap();
            assert_eq!(other.get_var(), attribute.get_var(), "{}", attribute.name());
        }

        light.set_values(&text);
        assert_eq!(light.get_values(DefaultMode::WithDefault), text);
    }

    #[derive(Object, Default)]
    #[class(name = "Foo", namespace = "test_values")]
    struct Foo {
        #[attribute(default = 0)]
        count: i32,
        #[attribute(default = "")]
        name: String,
    }

    #[test]
    fn non_default_values_only() {
        let mut foo = Foo::default();
        assert_eq!(foo.get_values(DefaultMode::NoDefault), "");

        assert!(foo.set_attribute("Count", "5"));
        assert_eq!(foo.count, 5);
        assert_eq!(foo.get_values(DefaultMode::NoDefault), "Count='5'");
        assert_eq!(foo.get_values(DefaultMode::WithDefault), "Count='5' Name=''");

        assert!(foo.set_attribute_default("Count"));
        assert_eq!(foo.count, 0);
        assert_eq!(foo.get_values(DefaultMode::NoDefault), "");

        assert!(!foo.set_attribute("Missing", "1"));
        assert!(!foo.set_attribute_default("Missing"));
        foo.set_values("Missing='1' Name='Bob'");
        assert_eq!(foo.get_values(DefaultMode::NoDefault), "Name='Bob'");
    }

    #[test]
    fn mismatched_getters_convert() {
        let mut foo = Foo::default();
        foo.count = 5;
        foo.name = String::from("abc");

        let count = foo.attribute("Count").unwrap();
        assert!(count.get_bool());
        assert_eq!(count.get_string(), "5");
        assert_eq!(count.get_double(), 5.0);
        assert_eq!(count.get_uint8(), 5);

        let name = foo.attribute("Name").unwrap();
        assert!(!name.get_bool());
        assert_eq!(name.get_int32(), 0);
        assert_eq!(name.get_float(), 0.0);
        assert_eq!(name.get_string(), "abc");

        let mut count = foo.attribute_mut("Count").unwrap();
        count.set_string("not a number");
        assert_eq!(count.get_int32(), 0);
        count.set_var(&Var::from("12"));
        assert_eq!(count.get_int64(), 12);
        count.set_var(&Var::Bool(true));
        assert_eq!(foo.count, 1);
    }

    #[test]
    fn created_through_the_class() {
        let class = ClassManager::get().class_of::<Light>();
        let object = class.create().unwrap();
        assert!(object.borrow().is_instance_of("test_ext::Light"));
        let light = object.borrow_as::<Light>().unwrap();
        assert_eq!(light.shape, Shape::Point);
    }
}
