use std::fmt;

use crate::ast::{Member, Range, Set, Tuple, write_joined};

/// A named function call.
///
/// The name may be dotted; every parameter is a full expression.
///
/// # Examples
/// ```text
/// CROSSJOIN({ [A].[B] }, { [C].[D] })
/// Format.Value(1)
/// NOW()
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Function {
    titles: Vec<String>,
    parameters: Vec<Expression>,
}

impl Function {
    pub fn new(title: impl Into<String>) -> Self {
        Function::default().titled(title)
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.titles.push(title.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Expression) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = Expression>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn parameters(&self) -> &[Expression] {
        &self.parameters
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.titles.join("."))?;
        f.write_str("(")?;
        write_joined(f, &self.parameters, ", ")?;
        f.write_str(")")
    }
}

/// A raw literal: number, date, logical, ordering or bare word.
///
/// The text is kept exactly as written, including values formed from two
/// adjacent tokens (`1 abc` becomes `1abc`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constant {
    value: String,
}

impl Constant {
    pub fn new(value: impl Into<String>) -> Self {
        Constant {
            value: value.into(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Anything that can appear between operators in an [`Expression`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Function(Function),
    Tuple(Tuple),
    Set(Set),
    Range(Range),
    Member(Member),
    Constant(Constant),
    Expression(Expression),
}

macro_rules! operand_from {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for Operand {
                fn from(value: $variant) -> Self {
                    Operand::$variant(value)
                }
            }
        )+
    };
}

operand_from!(Function, Tuple, Set, Range, Member, Constant, Expression);

/// Operands joined by infix operators.
///
/// A well-formed expression has exactly one operator fewer than operands.
/// Construction does not enforce this so expressions can be built up one
/// piece at a time; the parser only ever produces well-formed ones.
///
/// # Examples
/// ```text
/// [Measures].[Sales] * 1.5
/// NOT [Measures].[Flag] = TRUE
/// -(1 + 2)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expression {
    operands: Vec<Operand>,
    operators: Vec<String>,
    negative: bool,
    negated: bool,
}

impl Expression {
    pub fn new() -> Self {
        Expression::default()
    }

    /// An expression made of one operand.
    pub fn single(operand: impl Into<Operand>) -> Self {
        Expression::new().with_operand(operand)
    }

    pub fn with_operand(mut self, operand: impl Into<Operand>) -> Self {
        self.operands.push(operand.into());
        self
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operators.push(operator.into());
        self
    }

    /// Appends an operator followed by its right-hand operand.
    pub fn with_operation(self, operator: impl Into<String>, operand: impl Into<Operand>) -> Self {
        self.with_operator(operator).with_operand(operand)
    }

    /// Marks the expression as arithmetically negated: `-(...)`.
    pub fn as_negative(mut self) -> Self {
        self.negative = true;
        self
    }

    /// Marks the expression as logically negated: `NOT ...`.
    pub fn as_negated(mut self) -> Self {
        self.negated = true;
        self
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    pub fn operators(&self) -> &[String] {
        &self.operators
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_well_formed(&self) -> bool {
        !self.operands.is_empty() && self.operators.len() + 1 == self.operands.len()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-(")?;
        }
        if self.negated {
            f.write_str("NOT ")?;
        }

        let last = self.operands.len().saturating_sub(1);
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                let Some(operator) = self.operators.get(i - 1) else {
                    break;
                };
                write!(f, " {operator} ")?;
            }
            write_operand(f, operand, i == last)?;
        }

        if self.negative {
            f.write_str(")")?;
        }
        Ok(())
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Operand, is_last: bool) -> fmt::Result {
    match operand {
        Operand::Function(func) => write!(f, "{func}"),
        Operand::Tuple(tuple) => write!(f, "{tuple}"),
        Operand::Set(set) => write!(f, "{set}"),
        Operand::Range(range) => write!(f, "{range}"),
        Operand::Member(member) => write!(f, "{member}"),
        Operand::Constant(constant) => write!(f, "{constant}"),
        // `-(...)` carries its own brackets, and a trailing NOT swallows the
        // rest of the expression anyway.
        Operand::Expression(inner) if inner.negative || (inner.negated && is_last) => {
            write!(f, "{inner}")
        }
        Operand::Expression(inner) => write!(f, "({inner})"),
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_operand(f, self, true)
    }
}
