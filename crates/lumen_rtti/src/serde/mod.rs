//! `serde` support for values and object attributes.
//!
//! ## Menu
//!
//! - [`Var`](crate::var::Var) implements `Serialize` and `Deserialize`, mapping
//!   each variant to the matching serde primitive.
//! - [`ObjectValues`]: serializes the attributes of an object as a map from
//!   attribute name to value. Enum and flag attributes are written by name.
//! - [`ObjectValuesSeed`]: a `DeserializeSeed` that writes such a map back
//!   into an existing object, converting each value to the attribute's type.
//!
//! This is the structured counterpart of
//! [`ObjectExt::get_values`](crate::object::ObjectExt::get_values) and
//! [`ObjectExt::set_values`](crate::object::ObjectExt::set_values).

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::ObjectValuesSeed;
pub use ser::ObjectValues;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use serde_core::de::DeserializeSeed;

    use super::{ObjectValues, ObjectValuesSeed};
    use crate::prelude::*;

    #[derive(VarEnum, Clone, Copy, Debug, PartialEq, Default)]
    enum Quality {
        #[default]
        Low,
        High,
    }

    #[derive(Object, Default)]
    #[class(name = "Settings", namespace = "test_serde")]
    struct Settings {
        #[attribute(default = 60)]
        fps: u32,
        #[attribute]
        scale: f32,
        #[attribute]
        title: String,
        #[attribute]
        quality: Quality,
    }

    fn settings() -> Settings {
        Settings {
            fps: 60,
            scale: 0.5,
            title: String::from("Demo"),
            quality: Quality::High,
        }
    }

    #[test]
    fn values_to_json() {
        let object = settings();
        let all = serde_json::to_string(&ObjectValues::new(&object, DefaultMode::WithDefault)).unwrap();
        assert_eq!(all, r#"{"Fps":60,"Scale":0.5,"Title":"Demo","Quality":"High"}"#);

        let changed = serde_json::to_string(&ObjectValues::new(&object, DefaultMode::NoDefault)).unwrap();
        assert_eq!(changed, r#"{"Scale":0.5,"Title":"Demo","Quality":"High"}"#);
    }

    #[test]
    fn values_from_json() {
        let mut object = Settings::default();
        let mut de = serde_json::Deserializer::from_str(
            r#"{"Fps": "30", "Scale": 2, "Quality": "High", "Missing": [1, 2]}"#,
        );
        ObjectValuesSeed::new(&mut object).deserialize(&mut de).unwrap();
        assert_eq!(object.fps, 30);
        assert_eq!(object.scale, 2.0);
        assert_eq!(object.quality, Quality::High);
        assert_eq!(object.title, "");
    }

    #[test]
    fn values_from_ron() {
        let mut object = Settings::default();
        let mut de = ron::Deserializer::from_str(r#"{"Title": "Ron", "Fps": 24}"#).unwrap();
        ObjectValuesSeed::new(&mut object).deserialize(&mut de).unwrap();
        assert_eq!(object.title, "Ron");
        assert_eq!(object.fps, 24);
    }

    #[test]
    fn var_through_json() {
        let values = [Var::Bool(true), Var::Int32(-3), Var::from("x"), Var::Void];
        let text = serde_json::to_string(&values).unwrap();
        assert_eq!(text, r#"[true,-3,"x",null]"#);

        let back: Vec<Var> = serde_json::from_str(&text).unwrap();
        assert_eq!(back[0], Var::Bool(true));
        assert_eq!(back[1].to_int32(), -3);
        assert_eq!(back[2], Var::from("x"));
        assert_eq!(back[3], Var::Void);
    }
}
