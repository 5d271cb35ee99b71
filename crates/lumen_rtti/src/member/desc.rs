use alloc::borrow::Cow;
use core::fmt;

/// The kinds of class members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Attribute,
    Method,
    Constructor,
    Event,
    EventHandler,
}

impl MemberKind {
    pub const fn name(self) -> &'static str {
        match self {
            MemberKind::Attribute => "Attribute",
            MemberKind::Method => "Method",
            MemberKind::Constructor => "Constructor",
            MemberKind::Event => "Event",
            MemberKind::EventHandler => "EventHandler",
        }
    }
}

impl fmt::Display for MemberKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The part every member descriptor shares.
///
/// The annotation is free-form text for tools, such as an editor hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDesc {
    kind: MemberKind,
    name: Cow<'static, str>,
    pub(super) description: Cow<'static, str>,
    pub(super) annotation: Cow<'static, str>,
}

impl MemberDesc {
    pub fn new(kind: MemberKind, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: Cow::Borrowed(""),
            annotation: Cow::Borrowed(""),
        }
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn annotation(&self) -> &str {
        &self.annotation
    }
}
