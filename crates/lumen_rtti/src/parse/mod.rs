//! The `Name='Value'` token format used by `get_values`, `set_values` and
//! string method calls.
//!
//! Tokens are separated by whitespace. Values are single quoted when written;
//! double quoted and bare values are accepted when read. Inside quotes, `\\`,
//! `\'` and `\"` stand for the escaped character, any other backslash is kept.

use alloc::borrow::Cow;
use alloc::string::String;

// -----------------------------------------------------------------------------
// ParamsParser

/// Iterates the `(name, value)` pairs of a token string.
///
/// Malformed tokens are skipped; the rest of the string is still read.
///
/// ```
/// use std::borrow::Cow;
/// use lumen_rtti::parse::ParamsParser;
///
/// let pairs: Vec<_> = ParamsParser::new(r#"Count='5' Title="It's" broken Flag=on"#).collect();
/// assert_eq!(
///     pairs,
///     [("Count", Cow::from("5")), ("Title", Cow::from("It's")), ("Flag", Cow::from("on"))]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ParamsParser<'a> {
    rest: &'a str,
}

impl<'a> ParamsParser<'a> {
    #[inline]
    pub const fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    /// Skips to the next whitespace, dropping the current token.
    fn skip_token(&mut self) {
        let end = self.rest.find(char::is_whitespace).unwrap_or(self.rest.len());
        self.rest = &self.rest[end..];
    }

    fn read_value(&mut self) -> Cow<'a, str> {
        let rest = self.rest;
        match rest.chars().next() {
            Some(quote @ ('\'' | '"')) => {
                let body = &rest[1..];
                let (value, end) = unquote(body, quote);
                self.rest = &body[end..];
                value
            }
            _ => {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                self.rest = &rest[end..];
                Cow::Borrowed(&rest[..end])
            }
        }
    }
}

/// Reads a quoted body up to the closing `quote`.
///
/// Returns the unescaped value and the byte offset just past the closing
/// quote, or the body length if the quote is missing.
fn unquote(body: &str, quote: char) -> (Cow<'_, str>, usize) {
    let mut owned: Option<String> = None;
    let mut chars = body.char_indices();
    while let Some((index, c)) = chars.next() {
        if c == quote {
            let value = match owned {
                Some(owned) => Cow::Owned(owned),
                None => Cow::Borrowed(&body[..index]),
            };
            return (value, index + 1);
        }
        if c == '\\' {
            let escaped = chars.clone().next().map(|(_, next)| next);
            if let Some(next @ ('\\' | '\'' | '"')) = escaped {
                chars.next();
                owned.get_or_insert_with(|| String::from(&body[..index])).push(next);
                continue;
            }
        }
        if let Some(owned) = owned.as_mut() {
            owned.push(c);
        }
    }
    let value = match owned {
        Some(owned) => Cow::Owned(owned),
        None => Cow::Borrowed(body),
    };
    (value, body.len())
}

impl<'a> Iterator for ParamsParser<'a> {
    type Item = (&'a str, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.rest = self.rest.trim_start();
            if self.rest.is_empty() {
                return None;
            }
            let name_end = self
                .rest
                .find(|c: char| c == '=' || c.is_whitespace())
                .unwrap_or(self.rest.len());
            let name = &self.rest[..name_end];
            if name.is_empty() || !self.rest[name_end..].starts_with('=') {
                self.skip_token();
                continue;
            }
            self.rest = &self.rest[name_end + 1..];
            let value = self.read_value();
            return Some((name, value));
        }
    }
}

// -----------------------------------------------------------------------------
// Writing

/// Appends `name='value'` to `out`, separated from earlier tokens by a space.
///
/// Values containing a single quote but no double quote are written in double
/// quotes. Backslashes and the quote character are escaped.
pub fn write_token(out: &mut String, name: &str, value: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push_str(name);
    out.push('=');
    out.push(quote);
    for c in value.chars() {
        if c == quote || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::{ParamsParser, write_token};
    use alloc::borrow::Cow;
    use alloc::string::String;
    use alloc::vec::Vec;

    fn pairs(text: &str) -> Vec<(&str, Cow<'_, str>)> {
        ParamsParser::new(text).collect()
    }

    #[test]
    fn tolerates_malformed_input() {
        assert_eq!(pairs("  =x Name='unterminated"), [("Name", Cow::from("unterminated"))]);
        assert_eq!(pairs("A= B='' C"), [("A", Cow::from("")), ("B", Cow::from(""))]);
        assert_eq!(pairs(r"Path='C:\dir\file'"), [("Path", Cow::from(r"C:\dir\file"))]);
        assert!(pairs("").is_empty());
    }

    #[test]
    fn written_tokens_parse_back() {
        let mut out = String::new();
        write_token(&mut out, "Count", "5");
        write_token(&mut out, "Name", "Bob's");
        write_token(&mut out, "Empty", "");
        assert_eq!(out, r#"Count='5' Name="Bob's" Empty=''"#);

        assert_eq!(
            pairs(&out),
            [("Count", Cow::from("5")), ("Name", Cow::from("Bob's")), ("Empty", Cow::from(""))]
        );
    }

    #[test]
    fn both_quote_kinds_are_escaped() {
        let value = r#"it's "x" y='z' \ end\"#;
        let mut out = String::new();
        write_token(&mut out, "Label", value);
        write_token(&mut out, "Next", "1");
        assert_eq!(out, r#"Label='it\'s "x" y=\'z\' \\ end\\' Next='1'"#);

        assert_eq!(pairs(&out), [("Label", Cow::from(value)), ("Next", Cow::from("1"))]);
    }
}
