//! Documentation content for the mdx CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Queries,
    Axes,
    Members,
    Sets,
    Functions,
    Expressions,
    Lexing,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "queries" | "query" | "select" => Some(Self::Queries),
            "axes" | "axis" => Some(Self::Axes),
            "members" | "member" => Some(Self::Members),
            "sets" | "set" | "tuples" | "tuple" => Some(Self::Sets),
            "functions" | "function" => Some(Self::Functions),
            "expressions" | "expression" | "with" => Some(Self::Expressions),
            "lexing" | "lexer" | "tokens" => Some(Self::Lexing),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"MDX DOCUMENTATION

mdx parses MDX (Multidimensional Expressions) queries and prints them back in
canonical form. Parsing is all-or-nothing: a query either parses completely or
is rejected with the tokens that could not be consumed.

DOCUMENTATION CATEGORIES

  queries           WITH, SELECT, FROM, sub-queries and WHERE
  axes              Axis slicers, NON EMPTY, DIMENSION PROPERTIES, ON
  members           Bracketed members, keys (.&[..]) and navigation functions
  sets              Tuples { }, sets ( ), ranges and how they nest
  functions         Function calls and their parameters
  expressions       Operators, constants, NOT and negation
  lexing            Tokens, keywords, literals and case rules

QUICK REFERENCE

  [Dim].[Level]             Member
  [Dim].[Key].&[1]          Member with a key value
  [Dim].[Level].Children    Navigation function
  [A]:[B]                   Range
  { a, b }                  Tuple
  ( a, b )                  Set
  NAME(p1, p2)              Function

Run 'mdx doc <category>' for detailed documentation.
Run 'mdx check "<query>"' to parse a query.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_str(name) {
        Some(DocCategory::Queries) => Ok(QUERIES_DOC),
        Some(DocCategory::Axes) => Ok(AXES_DOC),
        Some(DocCategory::Members) => Ok(MEMBERS_DOC),
        Some(DocCategory::Sets) => Ok(SETS_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        Some(DocCategory::Expressions) => Ok(EXPRESSIONS_DOC),
        Some(DocCategory::Lexing) => Ok(LEXING_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const QUERIES_DOC: &str = r#"QUERIES - Overall Query Shape

GRAMMAR
  [WITH declaration+]
  SELECT axis [, axis]*
  FROM cube [, cube]* | FROM ( query )
  [WHERE slicer]

CUBES
  FROM [Cube]
  FROM [Database].[Cube], [Other]
    One or more bracketed names joined by dots.

SUB-QUERIES
  FROM ( SELECT { [Measures].[Sales] } ON COLUMNS FROM [Cube] )
    A query in round brackets replaces the cube list.

WHERE
  WHERE [Date].[Year].&[2014]
    The slicer may be a member, range, set, tuple or function call.

    Canonical form wraps the WHERE tuples in one extra layer:
      Query:  ... WHERE [Date].[Year].&[2014]
      Output: ... WHERE { ( { [Date].[Year].&[2014] } ) }

    Printing and parsing the canonical form again gives the same text.

WITH DECLARATIONS
  WITH MEMBER [Measures].[Double] AS [Measures].[Sales] * 2
  WITH SET [Top] AS { [Product].[Category].Children }

    A declaration bound to a tuple prints as SET; one bound to an expression
    prints as MEMBER, regardless of the keyword written.
"#;

const AXES_DOC: &str = r#"AXES - SELECT Axes

GRAMMAR
  [NON EMPTY] slicer [[DIMENSION] PROPERTIES prop [, prop]*] ON name

NAMES
  COLUMNS, ROWS, PAGES, CHAPTERS, SECTIONS, AXIS(n), or a plain number.

SLICERS
  { [Measures].[Sales] } ON COLUMNS
  [Date].[Year].Children ON ROWS
    A slicer that is not a tuple is wrapped in one:
      Query:  [Date].[Year].Children ON ROWS
      Output: { [Date].[Year].Children } ON ROWS

PROPERTIES
  { [Product].[Name].Members } DIMENSION PROPERTIES MEMBER_CAPTION, KEY0 ON ROWS
    Intrinsic properties only. The canonical form always spells out
    DIMENSION PROPERTIES.

    Constraints:
      - NON must be followed by EMPTY
      - DIMENSION must be followed by PROPERTIES
"#;

const MEMBERS_DOC: &str = r#"MEMBERS - Member References

GRAMMAR
  [name] ( .[name] | .function )* [ .&[value] ( .function )* ]

EXAMPLES
  [Measures].[Sales]
  [Date].[Calendar].[Year].&[2014]
  [Date].[Calendar].&[2014].Children
  [Product].[Category].CurrentMember.MEMBER_CAPTION
  [Date].[Calendar].&[2014].Lag(1)

BRACKETED NAMES
  Inside [ ] a name may contain letters, digits, spaces and _ / \ - : ' "
    [Dim Hierarchy].[Dim Key]

NAVIGATION FUNCTIONS
  .Children   .Parent   .Members   .Lag(1)   .MEMBER_CAPTION
    Parameters are literal values, not full expressions.

    Canonical form lists all names first, then the key, then functions.
"#;

const SETS_DOC: &str = r#"SETS - Tuples, Sets and Ranges

TUPLES
  { a, b, c }
    Curly brackets. Empty tuple prints as {  }.

SETS
  ( a, b, c )
    Round brackets. Empty set prints as (  ).

RANGES
  [Date].[Year].&[2010]:[Date].[Year].&[2014]

CHILDREN
  Members, ranges and function calls may appear in both. A tuple may also
  hold sets and a set may also hold tuples.

NESTING
  A container holds either plain items or containers of the other kind,
  never both. Adding the first nested container folds the plain items
  collected so far into a new one:

      { [A], [B], ( [C] ) }   prints as   { ( [A], [B] ), ( [C] ) }

  A tuple written directly inside a tuple (or a set inside a set) is merged:

      { { [A] }, [B] }        prints as   { [A], [B] }
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS - Function Calls

GRAMMAR
  name [.name]* ( [expression [, expression]*] )

EXAMPLES
  CROSSJOIN({ [A].[B] }, { [C].[D] })
  TOPCOUNT([Product].[Name].Members, 10, [Measures].[Sales])
  Format.Value(1)
  NOW()

    Every parameter is a full expression, so members, sets, tuples,
    arithmetic and nested calls are all allowed.

    Constraints:
      - The name must be a plain identifier, not a keyword
      - Brackets are required even with no parameters
"#;

const EXPRESSIONS_DOC: &str = r#"EXPRESSIONS - Operands and Operators

GRAMMAR
  operand (operator operand)*

OPERANDS
  Function call, tuple, set, range, member, constant,
  NOT expression, -( expression ), ( expression )

CONSTANTS
  42   1.5   TRUE   2014-01-31T00:00:00   "text"   DESC

OPERATORS
  +  -  *  /  <  <=  =  <>  >=  >      arithmetic and comparison
  AND  OR  XOR                         logical

    Operators have no precedence; expressions keep the written order.

NEGATION
  NOT [Measures].[Flag] = 1
    NOT applies to the rest of the expression.

  -( [Measures].[Sales] + 1 )
    Arithmetic negation needs round brackets.

BRACKETS
  ([Measures].[A] + 1) * 2
    A nested expression always prints in round brackets.
"#;

const LEXING_DOC: &str = r#"LEXING - Tokens

KEYWORDS
  SELECT FROM WHERE ON NON EMPTY WITH MEMBER SET AS DIMENSION PROPERTIES
  NOT AND OR XOR TRUE FALSE ASC DESC BASC BDESC
    Case-insensitive, matched as whole words: Members and NonEmpty stay
    identifiers.

AXIS NAMES
  COLUMNS ROWS PAGES CHAPTERS SECTIONS AXIS(n)

LITERALS
  Numbers       123   1.5
  Dates         2014-01-31T00:00:00
  Strings       "text"   'text'
  Identifiers   letters, digits and _, not starting with a digit

WHITESPACE
  Spaces, tabs and line breaks separate tokens and are otherwise ignored.

ERRORS
  Any other character stops lexing:
    Query:  [$]
    Error:  Unrecognized symbol '$' at position 1

    Positions are byte offsets into the trimmed query.

Run 'mdx tokens "<query>"' to see how a query is split.
"#;
