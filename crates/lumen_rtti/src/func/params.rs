use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::func::ParamList;
use crate::parse::ParamsParser;
use crate::types::{TypeInfo, VarType};
use crate::var::{DynVar, DynVarMut, Var};
use crate::xml::XmlElement;

// -----------------------------------------------------------------------------
// Param

/// A standalone value of a declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    info: &'static TypeInfo,
    value: Var,
}

impl Param {
    /// Creates a parameter holding the type's zero value.
    #[inline]
    pub fn new(info: &'static TypeInfo) -> Self {
        Self {
            info,
            value: info.default_var(),
        }
    }

    #[inline]
    pub fn of<T: VarType>() -> Self {
        Self::new(T::type_info())
    }

    #[inline]
    pub fn from_value<T: VarType>(value: &T) -> Self {
        Self {
            info: T::type_info(),
            value: value.to_var(),
        }
    }

    #[inline]
    pub fn value(&self) -> &Var {
        &self.value
    }

    /// Reads the value as `T`, converting if needed.
    #[inline]
    pub fn get<T: VarType>(&self) -> T {
        T::from_var(&self.value)
    }
}

impl DynVar for Param {
    #[inline]
    fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline]
    fn get_var(&self) -> Var {
        self.value.clone()
    }
}

impl DynVarMut for Param {
    #[inline]
    fn set_var(&mut self, value: &Var) {
        self.value = self.info.coerce(value);
    }
}

// -----------------------------------------------------------------------------
// DynParams

/// The arguments and the return value of one dynamic call.
///
/// Parameters are positional. When filled from a token string or an XML
/// element, parameter `i` is matched by its declared name or by `Param{i}`;
/// positions without a readable value keep their zero value.
///
/// ```
/// use lumen_rtti::func::DynParams;
/// use lumen_rtti::var::DynVar;
///
/// let mut params = DynParams::with_args::<f32, _>((0_i32, String::new()));
/// assert_eq!(params.signature(), "float(int,String)");
///
/// params.set_from_str("Param1='hello' Param0='x'", &[]);
/// assert_eq!(params.param(0).unwrap().get_int32(), 0);
/// assert_eq!(params.param(1).unwrap().get_string(), "hello");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynParams {
    params: Vec<Param>,
    ret: Param,
}

impl DynParams {
    /// Creates an argument list with every slot at its zero value.
    pub fn new(ret: &'static TypeInfo, params: &[&'static TypeInfo]) -> Self {
        Self {
            params: params.iter().copied().map(Param::new).collect(),
            ret: Param::new(ret),
        }
    }

    /// Creates an argument list holding `args`, returning `R`.
    pub fn with_args<R: VarType, P: ParamList>(args: P) -> Self {
        let mut params = Self::new(R::type_info(), &P::type_infos());
        args.write_to(&mut params);
        params
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    #[inline]
    pub fn param_type(&self, index: usize) -> Option<&'static TypeInfo> {
        self.params.get(index).map(|p| p.info)
    }

    #[inline]
    pub fn param(&self, index: usize) -> Option<&Param> {
        self.params.get(index)
    }

    #[inline]
    pub fn param_mut(&mut self, index: usize) -> Option<&mut Param> {
        self.params.get_mut(index)
    }

    #[inline]
    pub fn return_type(&self) -> &'static TypeInfo {
        self.ret.info
    }

    #[inline]
    pub fn return_value(&self) -> &Param {
        &self.ret
    }

    #[inline]
    pub fn return_value_mut(&mut self) -> &mut Param {
        &mut self.ret
    }

    /// Reads the return value as `T`.
    #[inline]
    pub fn get_return<T: VarType>(&self) -> T {
        self.ret.get()
    }

    #[inline]
    pub fn set_return(&mut self, value: &Var) {
        self.ret.set_var(value);
    }

    /// Returns `true` if the parameter types are exactly `types`.
    pub fn matches(&self, types: &[&'static TypeInfo]) -> bool {
        self.params.len() == types.len()
            && self.params.iter().zip(types).all(|(p, t)| p.info == *t)
    }

    pub fn signature(&self) -> String {
        signature(self.ret.info, self.params.iter().map(|p| p.info))
    }

    fn position(&self, key: &str, names: &[&str]) -> Option<usize> {
        if let Some(index) = names.iter().position(|name| *name == key) {
            return Some(index);
        }
        key.strip_prefix("Param")
            .and_then(|index| index.parse::<usize>().ok())
    }

    /// Fills parameters from a `Name='Value'` token string.
    pub fn set_from_str(&mut self, text: &str, names: &[&str]) {
        for (key, value) in ParamsParser::new(text) {
            self.set_named(key, &value, names);
        }
    }

    /// Fills parameters from the attributes of an XML element.
    pub fn set_from_xml(&mut self, element: &XmlElement, names: &[&str]) {
        for (key, value) in element.attributes() {
            self.set_named(key, value, names);
        }
    }

    fn set_named(&mut self, key: &str, value: &str, names: &[&str]) {
        let index = self.position(key, names);
        if let Some(param) = index.and_then(|i| self.params.get_mut(i)) {
            param.set_string(value);
        } else {
            log::debug!("no parameter `{key}` in `{}`", self.signature());
        }
    }
}

/// Formats a call signature, e.g. `void(int,String)`.
pub fn signature<'a>(ret: &TypeInfo, params: impl IntoIterator<Item = &'a TypeInfo>) -> String {
    let params: Vec<&str> = params.into_iter().map(TypeInfo::name).collect();
    format!("{}({})", ret.name(), params.join(","))
}

#[cfg(test)]
mod tests {
    use super::{DynParams, Param};
    use crate::types::{TypeInfo, TypeKind, VarType};
    use crate::var::{DynVar, DynVarMut, Var};
    use crate::xml::XmlElement;

    #[test]
    fn param_coerces_on_set() {
        let mut param = Param::of::<u8>();
        param.set_var(&Var::from("300"));
        assert_eq!(param.value(), &Var::UInt8(u8::MAX));
        param.set_string("12");
        assert_eq!(param.get::<u8>(), 12);
        assert_eq!(param.get_string(), "12");
        assert!(!param.is_default());
    }

    #[test]
    fn named_parameters() {
        let mut params = DynParams::new(
            TypeInfo::of_kind(TypeKind::Void),
            &[i32::type_info(), bool::type_info()],
        );
        params.set_from_str("Enabled='yes' Amount=-3 Unknown='1'", &["Amount", "Enabled"]);
        assert_eq!(params.param(0).unwrap().get_int32(), -3);
        assert!(params.param(1).unwrap().get_bool());
        assert_eq!(params.signature(), "void(int,bool)");
    }

    #[test]
    fn xml_parameters() {
        let mut params = DynParams::new(f64::type_info(), &[f64::type_info()]);
        let mut element = XmlElement::new("Call");
        element.set_attribute("Param0", "2.5");
        params.set_from_xml(&element, &[]);
        assert_eq!(params.param(0).unwrap().get_double(), 2.5);

        params.set_return(&Var::Int32(4));
        assert_eq!(params.get_return::<f64>(), 4.0);
        assert_eq!(params.return_value().value(), &Var::Double(4.0));
    }
}
