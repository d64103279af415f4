use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::ast::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// No rule matches at `position` (a byte offset into the source).
    #[error("Unrecognized symbol '{character}' at position {position}")]
    UnrecognizedSymbol { character: char, position: usize },
}

/// Where a rule may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    Everywhere,
    /// Only directly after a `[` token, and then ahead of every other rule
    /// unless a [`Rule::bracket_literal`] match is longer.
    AfterOpenBracket,
}

/// One lexical rule: a pattern and the token kind it produces.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: TokenKind,
    pattern: Regex,
    ignorable: bool,
    scope: RuleScope,
    bracket_literal: bool,
}

impl Rule {
    /// Compiles `pattern` anchored at the current offset, case-insensitive.
    pub fn new(kind: TokenKind, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Rule {
            kind,
            pattern: Regex::new(&format!("^(?i:{pattern})"))?,
            ignorable: false,
            scope: RuleScope::Everywhere,
            bracket_literal: false,
        })
    }

    /// Matched text is consumed but no token is produced.
    pub fn ignorable(mut self) -> Self {
        self.ignorable = true;
        self
    }

    pub fn after_open_bracket(mut self) -> Self {
        self.scope = RuleScope::AfterOpenBracket;
        self
    }

    /// Directly after `[`, this rule beats the bracket-scoped rules when its
    /// match is longer and runs up to the closing `]` (`[1.5]`, `["a.b"]`).
    pub fn bracket_literal(mut self) -> Self {
        self.bracket_literal = true;
        self
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn is_ignorable(&self) -> bool {
        self.ignorable
    }

    pub fn scope(&self) -> RuleScope {
        self.scope
    }

    pub fn is_bracket_literal(&self) -> bool {
        self.bracket_literal
    }

    fn match_len(&self, input: &str) -> Option<usize> {
        self.pattern
            .find(input)
            .map(|m| m.end())
            .filter(|&len| len > 0)
    }
}

/// Ordered rule list. The first matching rule wins, so specific rules must
/// come before generic ones.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleTable { rules }
    }

    /// The MDX rule table, compiled once and shared.
    pub fn standard() -> &'static RuleTable {
        &STANDARD_RULES
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn find(&self, input: &str, after_open_bracket: bool) -> Option<(&Rule, usize)> {
        if after_open_bracket
            && let Some(scoped) = self.first_match(input, |rule| {
                rule.scope == RuleScope::AfterOpenBracket
            })
        {
            let literal = self
                .rules
                .iter()
                .filter(|rule| rule.bracket_literal)
                .find_map(|rule| {
                    rule.match_len(input)
                        .filter(|&len| len > scoped.1 && input[len..].starts_with(']'))
                        .map(|len| (rule, len))
                });
            return Some(literal.unwrap_or(scoped));
        }
        self.first_match(input, |rule| rule.scope == RuleScope::Everywhere)
    }

    fn first_match(
        &self,
        input: &str,
        pick: impl Fn(&Rule) -> bool,
    ) -> Option<(&Rule, usize)> {
        self.rules
            .iter()
            .filter(|rule| pick(rule))
            .find_map(|rule| rule.match_len(input).map(|len| (rule, len)))
    }
}

const DIMENSION_PROPERTIES: &[&str] = &[
    "CATALOG_NAME",
    "CHILDREN_CARDINALITY",
    "CUSTOM_ROLLUP_PROPERTIES",
    "CUSTOM_ROLLUP",
    "DESCRIPTION",
    "DIMENSION_UNIQUE_NAME",
    "HIERARCHY_UNIQUE_NAME",
    "IS_DATAMEMBER",
    "IS_PLACEHOLDERMEMBER",
    "KEY0",
    "LCID",
    "LEVEL_NUMBER",
    "LEVEL_UNIQUE_NAME",
    "MEMBER_CAPTION",
    "MEMBER_KEY",
    "MEMBER_NAME",
    "MEMBER_TYPE",
    "MEMBER_UNIQUE_NAME",
    "MEMBER_VALUE",
    "PARENT_COUNT",
    "PARENT_LEVEL",
    "PARENT_UNIQUE_NAME",
    "SKIPPED_LEVELS",
    "UNARY_OPERATOR",
    "UNIQUE_NAME",
];

static STANDARD_RULES: Lazy<RuleTable> = Lazy::new(|| {
    use TokenKind::*;

    let rule = |kind: TokenKind, pattern: &str| {
        Rule::new(kind, pattern).expect("standard lexer patterns are valid")
    };
    let keyword = |kind: TokenKind, word: &str| rule(kind, &format!(r"(?:{word})\b"));
    let dimension_properties = format!(r"(?:{})\b", DIMENSION_PROPERTIES.join("|"));

    RuleTable::new(vec![
        rule(EndOfLine, r"[\r\n\t]+").ignorable(),
        rule(Identifier, r#"[a-zA-Z0-9 _/\\\-:'"]*[a-zA-Z0-9_/\\\-:'"]"#).after_open_bracket(),
        // Keywords
        keyword(Properties, "PROPERTIES"),
        rule(DimensionProperty, &dimension_properties),
        keyword(Dimension, "DIMENSION"),
        rule(AxisName, r"(?:COLUMNS|ROWS|PAGES|CHAPTERS|SECTIONS)\b|AXIS\([0-9]+\)"),
        keyword(Select, "SELECT"),
        keyword(Non, "NON"),
        keyword(Empty, "EMPTY"),
        keyword(On, "ON"),
        keyword(From, "FROM"),
        keyword(Where, "WHERE"),
        keyword(With, "WITH"),
        keyword(Member, "MEMBER"),
        keyword(Set, "SET"),
        keyword(Ordering, "B?ASC|B?DESC"),
        keyword(As, "AS"),
        // Punctuation
        rule(LeftCurlyBracket, r"\{"),
        rule(RightCurlyBracket, r"\}"),
        rule(LeftRoundBracket, r"\("),
        rule(RightRoundBracket, r"\)"),
        rule(LeftSquareBracket, r"\["),
        rule(RightSquareBracket, r"\]"),
        rule(Comma, ","),
        rule(Colon, ":"),
        rule(ValueSeparator, r"\.&"),
        rule(Dot, r"\."),
        // Literals
        rule(Date, r"[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}").bracket_literal(),
        rule(Number, r"[0-9]+(?:\.[0-9]+)?").bracket_literal(),
        rule(Logical, r"(?:TRUE|FALSE)\b"),
        // Operators
        keyword(Not, "NOT"),
        rule(LogicOperator, r"(?:AND|OR|XOR)\b"),
        rule(MathOperator, r"\+|-|\*|/|<=|>=|<>|<|=|>"),
        // Identifiers
        rule(Identifier, r#""[^"]*"|'[^']*'"#).bracket_literal(),
        rule(Identifier, r"[a-zA-Z_][a-zA-Z0-9_]*"),
    ])
});

/// Splits MDX text into tokens.
///
/// A literal space between tokens is skipped. Line breaks and tabs match an
/// ignorable rule. Once the input is used up, [`Lexer::next_token`] keeps
/// returning the `End` sentinel; as an iterator the lexer yields `End` once
/// and stops, and it also stops after the first error.
pub struct Lexer<'a> {
    source: &'a str,
    rules: &'a RuleTable,
    offset: usize,
    after_open_bracket: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer::with_rules(source, RuleTable::standard())
    }

    pub fn with_rules(source: &'a str, rules: &'a RuleTable) -> Self {
        Lexer {
            source,
            rules,
            offset: 0,
            after_open_bracket: false,
            finished: false,
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            let rest = &self.source[self.offset..];
            if rest.is_empty() {
                return Ok(Token::end());
            }
            if rest.starts_with(' ') {
                self.offset += 1;
                continue;
            }

            let Some((rule, len)) = self.rules.find(rest, self.after_open_bracket) else {
                let character = rest.chars().next().unwrap_or_default();
                return Err(LexError::UnrecognizedSymbol {
                    character,
                    position: self.offset,
                });
            };

            let start = self.offset;
            self.offset += len;
            if rule.ignorable {
                continue;
            }

            let token = Token::new(rule.kind, &rest[..len]);
            self.after_open_bracket = token.kind == TokenKind::LeftSquareBracket;
            trace!("lexed {token} at {start}");
            return Ok(token);
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if !token.is_end() => {}
            _ => self.finished = true,
        }
        Some(result)
    }
}

/// Tokenizes the whole source, ending with the `End` sentinel.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}
