use log::{debug, trace};
use thiserror::Error;

use crate::{
    ast::{
        Axis, Constant, Cube, Declaration, Expression, Function, Member, NavigationFunction,
        Operand, Query, Range, Set, SetChild, Token, TokenKind, Tuple, TupleChild,
    },
    cursor::{BacktrackingCursor, CursorError},
    lexer::{LexError, tokenize},
};

/// Tokens allowed as a member key or navigation function argument.
const VALUE_KINDS: &[TokenKind] = &[
    TokenKind::Logical,
    TokenKind::Date,
    TokenKind::Number,
    TokenKind::Identifier,
    TokenKind::MathOperator,
];

/// Tokens allowed as a constant operand.
const CONSTANT_KINDS: &[TokenKind] = &[
    TokenKind::Logical,
    TokenKind::Date,
    TokenKind::Number,
    TokenKind::Identifier,
    TokenKind::Ordering,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Cannot parse the expression. There are no such rules. {}.", list_tokens(.remaining))]
    NoMatchingRule { remaining: Vec<Token> },

    #[error("There are tokens left in expression. {}.", list_tokens(.remaining))]
    TokensLeft { remaining: Vec<Token> },

    #[error("Expression nesting exceeds the limit of {limit} rules")]
    NestingTooDeep { limit: usize },

    #[error(transparent)]
    Cursor(#[from] CursorError),
}

fn list_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of grammar rules active at once.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { max_depth: 256 }
    }
}

/// Backtracking recursive-descent MDX parser.
///
/// Every `try_parse_*` rule either consumes the tokens it recognized and
/// returns `Ok(Some(node))`, or leaves the cursor exactly where it was and
/// returns `Ok(None)`. `Err` is reserved for conditions that abort the whole
/// parse.
pub struct Parser {
    tokens: BacktrackingCursor<std::vec::IntoIter<Token>>,
    token_count: usize,
    options: ParseOptions,
    depth: usize,
}

impl Parser {
    /// Tokenizes the trimmed source up front.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Parser::with_options(source, ParseOptions::default())
    }

    pub fn with_options(source: &str, options: ParseOptions) -> Result<Self, ParseError> {
        let tokens = tokenize(source.trim())?;
        let mut parser = Parser::from_tokens(tokens);
        parser.options = options;
        Ok(parser)
    }

    /// Parses an existing token stream. An `End` token is appended when the
    /// stream does not already finish with one.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_end) {
            tokens.push(Token::end());
        }
        Parser {
            token_count: tokens.len(),
            tokens: BacktrackingCursor::new(tokens),
            options: ParseOptions::default(),
            depth: 0,
        }
    }

    /// Parses a complete query. Every token must be consumed.
    pub fn parse_query(&mut self) -> Result<Query, ParseError> {
        debug!("parsing query from {} tokens", self.token_count);

        let Some(query) = self.try_parse_query()? else {
            let remaining = self.remaining_tokens();
            debug!("no rule matches, {} tokens unparsed", remaining.len());
            return Err(ParseError::NoMatchingRule { remaining });
        };

        if !self.eat(TokenKind::End)? {
            let remaining = self.remaining_tokens();
            debug!("query parsed with {} tokens left", remaining.len());
            return Err(ParseError::TokensLeft { remaining });
        }

        Ok(query)
    }

    fn remaining_tokens(&mut self) -> Vec<Token> {
        let mut remaining = Vec::new();
        while self.tokens.move_next() {
            if let Some(token) = self.tokens.current().filter(|t| !t.is_end()) {
                remaining.push(token.clone());
            }
        }
        remaining
    }

    /// Runs one grammar rule with save/commit/rollback around it.
    fn attempt<T>(
        &mut self,
        rule: &'static str,
        body: impl FnOnce(&mut Self) -> Result<Option<T>, ParseError>,
    ) -> Result<Option<T>, ParseError> {
        if self.depth >= self.options.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }

        self.depth += 1;
        self.tokens.save_position();
        let result = body(self);
        self.depth -= 1;

        match &result {
            Ok(Some(_)) => {
                self.tokens.remove_last_saved_state();
                trace!("{rule}: matched, now at token {}", self.tokens.position());
            }
            _ => {
                self.tokens.restore_last_saved_position();
                trace!("{rule}: rolled back to token {}", self.tokens.position());
            }
        }
        result
    }

    /// Consumes the next token if `accept` likes it and returns its text.
    fn eat_if(&mut self, accept: impl Fn(&Token) -> bool) -> Result<Option<String>, ParseError> {
        if !self.tokens.move_next() {
            return Ok(None);
        }
        let matched = self
            .tokens
            .current()
            .filter(|token| accept(token))
            .map(|token| token.text.clone());
        if matched.is_none() {
            self.tokens.move_previous()?;
        }
        Ok(matched)
    }

    fn eat_any(&mut self, kinds: &[TokenKind]) -> Result<Option<String>, ParseError> {
        self.eat_if(|token| kinds.contains(&token.kind))
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        Ok(self.eat_any(&[kind])?.is_some())
    }

    /// A token of one of `kinds`, with an immediately following identifier
    /// glued on.
    fn scalar(&mut self, kinds: &[TokenKind]) -> Result<Option<String>, ParseError> {
        let Some(mut value) = self.eat_any(kinds)? else {
            return Ok(None);
        };
        if let Some(suffix) = self.eat_any(&[TokenKind::Identifier])? {
            value.push_str(&suffix);
        }
        Ok(Some(value))
    }

    /// `[name]`
    fn bracketed_name(&mut self) -> Result<Option<String>, ParseError> {
        if !self.eat(TokenKind::LeftSquareBracket)? {
            return Ok(None);
        }
        let Some(name) = self.eat_any(&[TokenKind::Identifier])? else {
            return Ok(None);
        };
        if !self.eat(TokenKind::RightSquareBracket)? {
            return Ok(None);
        }
        Ok(Some(name))
    }

    /// `[a].[b].[c]`
    fn bracketed_path(&mut self) -> Result<Option<Vec<String>>, ParseError> {
        let mut parts = Vec::new();
        loop {
            let Some(part) = self.bracketed_name()? else {
                return Ok(None);
            };
            parts.push(part);
            if !self.eat(TokenKind::Dot)? {
                return Ok(Some(parts));
            }
        }
    }

    /// One or more `item`s separated by commas.
    fn comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<Option<T>, ParseError>,
    ) -> Result<Option<Vec<T>>, ParseError> {
        let mut items = Vec::new();
        loop {
            let Some(next) = item(self)? else {
                return Ok(None);
            };
            items.push(next);
            if !self.eat(TokenKind::Comma)? {
                return Ok(Some(items));
            }
        }
    }

    pub fn try_parse_query(&mut self) -> Result<Option<Query>, ParseError> {
        self.attempt("query", |p| {
            let mut query = Query::new();

            if p.eat(TokenKind::With)? {
                let Some(first) = p.try_parse_declaration()? else {
                    return Ok(None);
                };
                query = query.with(first);
                while let Some(declaration) = p.try_parse_declaration()? {
                    query = query.with(declaration);
                }
            }

            if !p.eat(TokenKind::Select)? {
                return Ok(None);
            }
            let Some(axes) = p.comma_separated(Parser::try_parse_axis)? else {
                return Ok(None);
            };
            query = axes.into_iter().fold(query, Query::on);

            if !p.eat(TokenKind::From)? {
                return Ok(None);
            }
            if p.eat(TokenKind::LeftRoundBracket)? {
                let Some(inner) = p.try_parse_query()? else {
                    return Ok(None);
                };
                if !p.eat(TokenKind::RightRoundBracket)? {
                    return Ok(None);
                }
                query = query.from_query(inner);
            } else {
                let Some(cubes) = p.comma_separated(Parser::try_parse_cube)? else {
                    return Ok(None);
                };
                query = cubes.into_iter().fold(query, Query::from);
            }

            if p.eat(TokenKind::Where)? {
                let Some(slicer) = p.parse_slicer()? else {
                    return Ok(None);
                };
                query = into_where_tuples(slicer)
                    .into_iter()
                    .fold(query, Query::and_where);
            }

            Ok(Some(query))
        })
    }

    pub fn try_parse_declaration(&mut self) -> Result<Option<Declaration>, ParseError> {
        self.attempt("declaration", |p| {
            if p.eat_any(&[TokenKind::Member, TokenKind::Set])?.is_none() {
                return Ok(None);
            }
            let Some(titles) = p.bracketed_path()? else {
                return Ok(None);
            };
            if !p.eat(TokenKind::As)? {
                return Ok(None);
            }

            let declaration = titles
                .into_iter()
                .fold(Declaration::default(), Declaration::titled);
            if let Some(tuple) = p.try_parse_tuple()? {
                return Ok(Some(declaration.as_tuple(tuple)));
            }
            Ok(p
                .try_parse_expression()?
                .map(|expression| declaration.as_expression(expression)))
        })
    }

    pub fn try_parse_axis(&mut self) -> Result<Option<Axis>, ParseError> {
        self.attempt("axis", |p| {
            let mut axis = Axis::default();

            if p.eat(TokenKind::Non)? {
                if !p.eat(TokenKind::Empty)? {
                    return Ok(None);
                }
                axis = axis.as_non_empty();
            }

            let Some(slicer) = p.parse_slicer()? else {
                return Ok(None);
            };
            axis = axis.with_slicer(slicer);

            let has_properties = if p.eat(TokenKind::Dimension)? {
                if !p.eat(TokenKind::Properties)? {
                    return Ok(None);
                }
                true
            } else {
                p.eat(TokenKind::Properties)?
            };
            if has_properties {
                let Some(properties) =
                    p.comma_separated(|p| p.eat_any(&[TokenKind::DimensionProperty]))?
                else {
                    return Ok(None);
                };
                axis = axis.with_properties(properties);
            }

            if !p.eat(TokenKind::On)? {
                return Ok(None);
            }
            let Some(title) = p.eat_any(&[TokenKind::AxisName, TokenKind::Number])? else {
                return Ok(None);
            };
            Ok(Some(axis.titled(title)))
        })
    }

    pub fn try_parse_cube(&mut self) -> Result<Option<Cube>, ParseError> {
        self.attempt("cube", |p| {
            Ok(p
                .bracketed_path()?
                .map(|titles| titles.into_iter().fold(Cube::default(), Cube::titled)))
        })
    }

    pub fn try_parse_tuple(&mut self) -> Result<Option<Tuple>, ParseError> {
        self.attempt("tuple", |p| {
            if !p.eat(TokenKind::LeftCurlyBracket)? {
                return Ok(None);
            }
            let mut tuple = Tuple::new();
            if p.eat(TokenKind::RightCurlyBracket)? {
                return Ok(Some(tuple));
            }

            loop {
                if let Some(range) = p.try_parse_range()? {
                    tuple = tuple.with(range);
                } else if let Some(member) = p.try_parse_member()? {
                    tuple = tuple.with(member);
                } else if let Some(inner) = p.try_parse_tuple()? {
                    tuple = tuple.merge(inner);
                } else if let Some(set) = p.try_parse_set()? {
                    tuple = tuple.with(set);
                } else if let Some(function) = p.try_parse_function()? {
                    tuple = tuple.with(function);
                } else {
                    return Ok(None);
                }

                if !p.eat(TokenKind::Comma)? {
                    break;
                }
            }

            if !p.eat(TokenKind::RightCurlyBracket)? {
                return Ok(None);
            }
            Ok(Some(tuple))
        })
    }

    pub fn try_parse_set(&mut self) -> Result<Option<Set>, ParseError> {
        self.attempt("set", |p| {
            if !p.eat(TokenKind::LeftRoundBracket)? {
                return Ok(None);
            }
            let mut set = Set::new();
            if p.eat(TokenKind::RightRoundBracket)? {
                return Ok(Some(set));
            }

            loop {
                if let Some(range) = p.try_parse_range()? {
                    set = set.with(range);
                } else if let Some(member) = p.try_parse_member()? {
                    set = set.with(member);
                } else if let Some(tuple) = p.try_parse_tuple()? {
                    set = set.with(tuple);
                } else if let Some(inner) = p.try_parse_set()? {
                    set = set.merge(inner);
                } else if let Some(function) = p.try_parse_function()? {
                    set = set.with(function);
                } else {
                    return Ok(None);
                }

                if !p.eat(TokenKind::Comma)? {
                    break;
                }
            }

            if !p.eat(TokenKind::RightRoundBracket)? {
                return Ok(None);
            }
            Ok(Some(set))
        })
    }

    pub fn try_parse_range(&mut self) -> Result<Option<Range>, ParseError> {
        self.attempt("range", |p| {
            let Some(from) = p.try_parse_member()? else {
                return Ok(None);
            };
            if !p.eat(TokenKind::Colon)? {
                return Ok(None);
            }
            Ok(p.try_parse_member()?.map(|to| Range::new(from, to)))
        })
    }

    pub fn try_parse_member(&mut self) -> Result<Option<Member>, ParseError> {
        self.attempt("member", |p| {
            let Some(first) = p.bracketed_name()? else {
                return Ok(None);
            };
            let mut member = Member::new(first);

            while p.eat(TokenKind::Dot)? {
                if let Some(function) = p.try_parse_navigation_function()? {
                    member = member.with_function(function);
                    continue;
                }
                let Some(title) = p.bracketed_name()? else {
                    return Ok(None);
                };
                member = member.titled(title);
            }

            if !p.eat(TokenKind::ValueSeparator)? {
                return Ok(Some(member));
            }
            if !p.eat(TokenKind::LeftSquareBracket)? {
                return Ok(None);
            }
            let Some(value) = p.scalar(VALUE_KINDS)? else {
                return Ok(None);
            };
            if !p.eat(TokenKind::RightSquareBracket)? {
                return Ok(None);
            }
            member = member.with_value(value);

            while p.eat(TokenKind::Dot)? {
                let Some(function) = p.try_parse_navigation_function()? else {
                    return Ok(None);
                };
                member = member.with_function(function);
            }

            Ok(Some(member))
        })
    }

    pub fn try_parse_navigation_function(
        &mut self,
    ) -> Result<Option<NavigationFunction>, ParseError> {
        self.attempt("navigation_function", |p| {
            let Some(title) =
                p.eat_any(&[TokenKind::Identifier, TokenKind::DimensionProperty])?
            else {
                return Ok(None);
            };
            let function = NavigationFunction::new(title);

            if !p.eat(TokenKind::LeftRoundBracket)? {
                return Ok(Some(function));
            }
            let Some(parameters) = p.comma_separated(|p| p.scalar(VALUE_KINDS))? else {
                return Ok(None);
            };
            if !p.eat(TokenKind::RightRoundBracket)? {
                return Ok(None);
            }
            Ok(Some(function.with_parameters(parameters)))
        })
    }

    pub fn try_parse_function(&mut self) -> Result<Option<Function>, ParseError> {
        self.attempt("function", |p| {
            let mut function = Function::default();
            loop {
                let Some(title) = p.eat_any(&[TokenKind::Identifier])? else {
                    return Ok(None);
                };
                function = function.titled(title);
                if !p.eat(TokenKind::Dot)? {
                    break;
                }
            }

            if !p.eat(TokenKind::LeftRoundBracket)? {
                return Ok(None);
            }
            if p.eat(TokenKind::RightRoundBracket)? {
                return Ok(Some(function));
            }
            let Some(parameters) = p.comma_separated(Parser::try_parse_expression)? else {
                return Ok(None);
            };
            if !p.eat(TokenKind::RightRoundBracket)? {
                return Ok(None);
            }
            Ok(Some(function.with_parameters(parameters)))
        })
    }

    pub fn try_parse_expression(&mut self) -> Result<Option<Expression>, ParseError> {
        self.attempt("expression", |p| {
            let mut expression = Expression::new();
            loop {
                let Some(operand) = p.parse_operand()? else {
                    return Ok(None);
                };
                expression = expression.with_operand(operand);

                let Some(operator) =
                    p.eat_any(&[TokenKind::MathOperator, TokenKind::LogicOperator])?
                else {
                    break;
                };
                expression = expression.with_operator(operator);
            }
            Ok(Some(expression))
        })
    }

    pub fn try_parse_constant(&mut self) -> Result<Option<Constant>, ParseError> {
        self.attempt("constant", |p| Ok(p.scalar(CONSTANT_KINDS)?.map(Constant::new)))
    }

    /// An axis or `WHERE` argument, always returned as a tuple.
    fn parse_slicer(&mut self) -> Result<Option<Tuple>, ParseError> {
        if let Some(range) = self.try_parse_range()? {
            return Ok(Some(Tuple::new().with(range)));
        }
        if let Some(member) = self.try_parse_member()? {
            return Ok(Some(Tuple::new().with(member)));
        }
        if let Some(set) = self.try_parse_set()? {
            return Ok(Some(Tuple::new().with(set)));
        }
        if let Some(tuple) = self.try_parse_tuple()? {
            return Ok(Some(tuple));
        }
        Ok(self
            .try_parse_function()?
            .map(|function| Tuple::new().with(function)))
    }

    /// Only called inside the `expression` rule, which rolls back any
    /// tokens consumed here when `None` is returned.
    fn parse_operand(&mut self) -> Result<Option<Operand>, ParseError> {
        if let Some(function) = self.try_parse_function()? {
            return Ok(Some(function.into()));
        }
        if let Some(tuple) = self.try_parse_tuple()? {
            return Ok(Some(tuple.into()));
        }
        if let Some(set) = self.try_parse_set()? {
            return Ok(Some(set.into()));
        }
        if let Some(range) = self.try_parse_range()? {
            return Ok(Some(range.into()));
        }
        if let Some(member) = self.try_parse_member()? {
            return Ok(Some(member.into()));
        }
        if let Some(constant) = self.try_parse_constant()? {
            return Ok(Some(constant.into()));
        }

        if self.eat(TokenKind::Not)? {
            return Ok(self
                .try_parse_expression()?
                .map(|inner| inner.as_negated().into()));
        }

        let negative = self
            .eat_if(|token| token.kind == TokenKind::MathOperator && token.text == "-")?
            .is_some();
        if !self.eat(TokenKind::LeftRoundBracket)? {
            return Ok(None);
        }
        let Some(inner) = self.try_parse_expression()? else {
            return Ok(None);
        };
        if !self.eat(TokenKind::RightRoundBracket)? {
            return Ok(None);
        }
        let inner = if negative { inner.as_negative() } else { inner };
        Ok(Some(inner.into()))
    }
}

/// Undoes the `{ ( ... ) }` layer the serializer puts around `WHERE` tuples.
///
/// A slicer whose only child is a set of tuples yields those tuples; any
/// other slicer is a single `WHERE` tuple.
fn into_where_tuples(slicer: Tuple) -> Vec<Tuple> {
    let wrapped = matches!(slicer.children(), [TupleChild::Set(set)] if set.is_nested());
    if !wrapped {
        return vec![slicer];
    }
    slicer
        .into_children()
        .into_iter()
        .flat_map(|child| match child {
            TupleChild::Set(set) => set.into_children(),
            _ => Vec::new(),
        })
        .filter_map(|child| match child {
            SetChild::Tuple(tuple) => Some(tuple),
            _ => None,
        })
        .collect()
}
