use std::fmt;

use crate::ast::write_bracketed;

/// A dot-suffixed call on a member.
///
/// # Examples
/// ```text
/// [Date].[Calendar].Children
/// [Date].[Calendar].[2014].Lag(1)
/// [Product].[Category].CurrentMember.MEMBER_CAPTION
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationFunction {
    title: String,
    parameters: Vec<String>,
}

impl NavigationFunction {
    pub fn new(title: impl Into<String>) -> Self {
        NavigationFunction::default().titled(title)
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.extend(parameters.into_iter().map(Into::into));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}

impl fmt::Display for NavigationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)?;
        if !self.parameters.is_empty() {
            write!(f, "({})", self.parameters.join(", "))?;
        }
        Ok(())
    }
}

/// A dimension member reference.
///
/// A member is a dotted path of bracketed titles, optionally pinned to a key
/// with `.&[value]` and followed by any number of navigation functions.
///
/// # Examples
/// ```text
/// [Measures].[Sales]
/// [Dim].[Hierarchy].&[2014]
/// [Dim].[Hierarchy].&[2014].Children
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Member {
    titles: Vec<String>,
    value: Option<String>,
    functions: Vec<NavigationFunction>,
}

impl Member {
    pub fn new(title: impl Into<String>) -> Self {
        Member::default().titled(title)
    }

    /// Appends one more title part.
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.titles.push(title.into());
        self
    }

    /// Pins the member to a key. Replaces any earlier value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_function(mut self, function: NavigationFunction) -> Self {
        self.functions.push(function);
        self
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn functions(&self) -> &[NavigationFunction] {
        &self.functions
    }

    pub fn is_value_member(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bracketed(f, &self.titles)?;
        if let Some(value) = &self.value {
            write!(f, ".&[{value}]")?;
        }
        for function in &self.functions {
            write!(f, ".{function}")?;
        }
        Ok(())
    }
}

/// An inclusive span between two members.
///
/// # Example
/// ```text
/// [Date].[Year].&[2010]:[Date].[Year].&[2014]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Range {
    from: Member,
    to: Member,
}

impl Range {
    pub fn new(from: Member, to: Member) -> Self {
        Range { from, to }
    }

    pub fn from(mut self, member: Member) -> Self {
        self.from = member;
        self
    }

    pub fn to(mut self, member: Member) -> Self {
        self.to = member;
        self
    }

    pub fn start(&self) -> &Member {
        &self.from
    }

    pub fn end(&self) -> &Member {
        &self.to
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}
