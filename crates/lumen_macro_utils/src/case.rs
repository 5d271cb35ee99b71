/// Converts a `snake_case` identifier to `PascalCase`.
///
/// Reflected member names follow the `PascalCase` convention, while Rust
/// fields are `snake_case`. A leading `r#` is stripped.
///
/// ```
/// use lumen_macro_utils::to_pascal_case;
///
/// assert_eq!(to_pascal_case("count"), "Count");
/// assert_eq!(to_pascal_case("signal_destroyed"), "SignalDestroyed");
/// assert_eq!(to_pascal_case("r#type"), "Type");
/// assert_eq!(to_pascal_case("Name"), "Name");
/// ```
pub fn to_pascal_case(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    let mut out = String::with_capacity(ident.len());
    let mut upper = true;
    for ch in ident.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
