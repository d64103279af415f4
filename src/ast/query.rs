use std::fmt;

use crate::ast::{Expression, Tuple, write_bracketed, write_joined};

/// Complete MDX query.
///
/// ```text
/// WITH MEMBER [Measures].[Double] AS [Measures].[Sales] * 2
/// SELECT { [Measures].[Double] } ON COLUMNS
/// FROM [Cube]
/// WHERE { [Date].[Year].&[2014] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    declarations: Vec<Declaration>,
    axes: Vec<Axis>,
    source: QuerySource,
    where_tuples: Vec<Tuple>,
}

/// What a query selects from: named cubes or a sub-query, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    Cubes(Vec<Cube>),
    Inner(Box<Query>),
}

impl Default for QuerySource {
    fn default() -> Self {
        QuerySource::Cubes(Vec::new())
    }
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    /// Adds a `WITH` declaration.
    pub fn with(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Adds an axis.
    pub fn on(mut self, axis: Axis) -> Self {
        self.axes.push(axis);
        self
    }

    /// Adds a cube. Replaces a sub-query source if one was set.
    pub fn from(mut self, cube: Cube) -> Self {
        if let QuerySource::Cubes(cubes) = &mut self.source {
            cubes.push(cube);
        } else {
            self.source = QuerySource::Cubes(vec![cube]);
        }
        self
    }

    /// Selects from a sub-query. Replaces any cubes added so far.
    pub fn from_query(mut self, inner: Query) -> Self {
        self.source = QuerySource::Inner(Box::new(inner));
        self
    }

    /// Adds a `WHERE` tuple.
    ///
    /// The tuples always render inside one extra `{ ( ... ) }` layer. The
    /// parser strips exactly that layer, so `WHERE { ( { [B] } ) }` parses
    /// back to the single tuple `{ [B] }` rather than gaining another level.
    pub fn and_where(mut self, tuple: Tuple) -> Self {
        self.where_tuples.push(tuple);
        self
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn source(&self) -> &QuerySource {
        &self.source
    }

    /// Cubes selected from; empty when the source is a sub-query.
    pub fn cubes(&self) -> &[Cube] {
        match &self.source {
            QuerySource::Cubes(cubes) => cubes,
            QuerySource::Inner(_) => &[],
        }
    }

    pub fn inner_query(&self) -> Option<&Query> {
        match &self.source {
            QuerySource::Inner(inner) => Some(inner),
            QuerySource::Cubes(_) => None,
        }
    }

    pub fn where_tuples(&self) -> &[Tuple] {
        &self.where_tuples
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.declarations.is_empty() {
            f.write_str("WITH ")?;
            write_joined(f, &self.declarations, " ")?;
            f.write_str(" ")?;
        }

        f.write_str("SELECT ")?;
        write_joined(f, &self.axes, ", ")?;
        f.write_str(" FROM ")?;
        match &self.source {
            QuerySource::Cubes(cubes) => write_joined(f, cubes, ", ")?,
            QuerySource::Inner(inner) => write!(f, "( {inner} )")?,
        }

        if !self.where_tuples.is_empty() {
            f.write_str(" WHERE { ( ")?;
            write_joined(f, &self.where_tuples, ", ")?;
            f.write_str(" ) }")?;
        }
        Ok(())
    }
}

/// One `SELECT` axis.
///
/// ```text
/// NON EMPTY { [Date].[Year].Children } DIMENSION PROPERTIES MEMBER_CAPTION ON ROWS
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Axis {
    title: String,
    slicer: Tuple,
    non_empty: bool,
    properties: Vec<String>,
}

impl Axis {
    pub fn new(title: impl Into<String>) -> Self {
        Axis::default().titled(title)
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_slicer(mut self, slicer: Tuple) -> Self {
        self.slicer = slicer;
        self
    }

    pub fn as_non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn as_empty(mut self) -> Self {
        self.non_empty = false;
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.properties.push(property.into());
        self
    }

    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties.extend(properties.into_iter().map(Into::into));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slicer(&self) -> &Tuple {
        &self.slicer
    }

    pub fn is_non_empty(&self) -> bool {
        self.non_empty
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.non_empty {
            f.write_str("NON EMPTY ")?;
        }
        write!(f, "{}", self.slicer)?;
        if !self.properties.is_empty() {
            write!(f, " DIMENSION PROPERTIES {}", self.properties.join(", "))?;
        }
        write!(f, " ON {}", self.title)
    }
}

/// A cube name, possibly dotted: `[Database].[Cube]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cube {
    titles: Vec<String>,
}

impl Cube {
    pub fn new(title: impl Into<String>) -> Self {
        Cube::default().titled(title)
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.titles.push(title.into());
        self
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bracketed(f, &self.titles)
    }
}

/// The value bound by a `WITH` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationBody {
    /// `SET [..] AS { ... }`
    Tuple(Tuple),
    /// `MEMBER [..] AS expression`
    Expression(Expression),
}

/// A calculated member or named set.
///
/// The keyword is not stored: a declaration bound to a tuple is a `SET`,
/// one bound to an expression is a `MEMBER`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Declaration {
    titles: Vec<String>,
    body: Option<DeclarationBody>,
}

impl Declaration {
    pub fn new(title: impl Into<String>) -> Self {
        Declaration::default().titled(title)
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.titles.push(title.into());
        self
    }

    pub fn as_expression(mut self, expression: Expression) -> Self {
        self.body = Some(DeclarationBody::Expression(expression));
        self
    }

    pub fn as_tuple(mut self, tuple: Tuple) -> Self {
        self.body = Some(DeclarationBody::Tuple(tuple));
        self
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn body(&self) -> Option<&DeclarationBody> {
        self.body.as_ref()
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(DeclarationBody::Expression(expression)) => {
                f.write_str("MEMBER ")?;
                write_bracketed(f, &self.titles)?;
                write!(f, " AS {expression}")
            }
            Some(DeclarationBody::Tuple(tuple)) => {
                f.write_str("SET ")?;
                write_bracketed(f, &self.titles)?;
                write!(f, " AS {tuple}")
            }
            None => {
                f.write_str("SET ")?;
                write_bracketed(f, &self.titles)?;
                f.write_str(" AS ")
            }
        }
    }
}
