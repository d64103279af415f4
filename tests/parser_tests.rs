// tests/parser_tests.rs

use fluent_mdx::ast::{DeclarationBody, Operand, Token, TokenKind, TupleChild};
use fluent_mdx::lexer::LexError;
use fluent_mdx::parser::{ParseError, ParseOptions, Parser};
use fluent_mdx::{parse_query, parse_query_with};

fn parser(source: &str) -> Parser {
    Parser::new(source).unwrap()
}

fn at_end(parser: &mut Parser) -> bool {
    parser.parse_query().is_err_and(|e| match e {
        ParseError::NoMatchingRule { remaining } => remaining.is_empty(),
        _ => false,
    })
}

// ============================================================================
// Members
// ============================================================================

#[test]
fn test_member() {
    let member = parser("[Aaa].[Bbb].[Ccc]").try_parse_member().unwrap().unwrap();
    assert_eq!(member.titles(), ["Aaa", "Bbb", "Ccc"]);
    assert!(!member.is_value_member());
    assert_eq!(member.to_string(), "[Aaa].[Bbb].[Ccc]");
}

#[test]
fn test_value_member() {
    let member = parser("[Aaa].[Bbb].[Ccc].&[1]")
        .try_parse_member()
        .unwrap()
        .unwrap();
    assert_eq!(member.value(), Some("1"));
    assert_eq!(member.to_string(), "[Aaa].[Bbb].[Ccc].&[1]");
}

#[test]
fn test_value_member_key_kinds() {
    let test_cases = vec![
        ("[Aaa].&[1.5]", "1.5"),
        ("[Aaa].&[-1]", "-1"),
        ("[Aaa].&[TRUE]", "TRUE"),
        ("[Aaa].&[2014-01-31T00:00:00]", "2014-01-31T00:00:00"),
        ("[Aaa].&[\"a.b\"]", "\"a.b\""),
        ("[Aaa].&[+x]", "+x"),
    ];

    for (input, value) in test_cases {
        let member = parser(input).try_parse_member().unwrap();
        let member = member.unwrap_or_else(|| panic!("Failed for input: {}", input));
        assert_eq!(member.value(), Some(value), "Failed for input: {}", input);
        assert_eq!(member.to_string(), input, "Failed for input: {}", input);
    }
}

#[test]
fn test_decimal_key_in_where() {
    let query =
        parse_query("SELECT { [A] } ON COLUMNS FROM [Cube] WHERE [Dim].[Key].&[1.5]").unwrap();
    assert_eq!(
        query.to_string(),
        "SELECT { [A] } ON COLUMNS FROM [Cube] WHERE { ( { [Dim].[Key].&[1.5] } ) }"
    );
}

#[test]
fn test_member_with_navigation_functions() {
    let member = parser("[Aaa].[Bbb].[Ccc].FUNCTION(1, 2).FUNCTION")
        .try_parse_member()
        .unwrap()
        .unwrap();
    assert_eq!(member.functions().len(), 2);
    assert_eq!(member.functions()[0].parameters(), ["1", "2"]);
    assert_eq!(member.to_string(), "[Aaa].[Bbb].[Ccc].FUNCTION(1, 2).FUNCTION");
}

#[test]
fn test_value_member_with_navigation_functions() {
    let member = parser("[Date].[Calendar].&[2014].Children.Lag(1)")
        .try_parse_member()
        .unwrap()
        .unwrap();
    assert_eq!(member.to_string(), "[Date].[Calendar].&[2014].Children.Lag(1)");
}

#[test]
fn test_dimension_property_as_navigation_function() {
    let member = parser("[Product].[Category].CurrentMember.MEMBER_CAPTION")
        .try_parse_member()
        .unwrap()
        .unwrap();
    assert_eq!(member.functions()[1].title(), "MEMBER_CAPTION");
}

#[test]
fn test_member_rejects_dangling_dot() {
    let mut p = parser("[Aaa].");
    assert_eq!(p.try_parse_member().unwrap(), None);
}

#[test]
fn test_member_rejects_value_without_brackets() {
    let mut p = parser("[Aaa].&1");
    assert_eq!(p.try_parse_member().unwrap(), None);
}

#[test]
fn test_function_after_value_must_be_navigation_function() {
    let mut p = parser("[Aaa].&[1].[Bbb]");
    assert_eq!(p.try_parse_member().unwrap(), None);
}

// ============================================================================
// Ranges and Backtracking
// ============================================================================

#[test]
fn test_range() {
    let range = parser("[A].&[1]:[A].&[4]").try_parse_range().unwrap().unwrap();
    assert_eq!(range.start().value(), Some("1"));
    assert_eq!(range.end().value(), Some("4"));
    assert_eq!(range.to_string(), "[A].&[1]:[A].&[4]");
}

#[test]
fn test_failed_rule_restores_position() {
    let mut p = parser("[A].[B]");
    assert_eq!(p.try_parse_range().unwrap(), None);
    let member = p.try_parse_member().unwrap().unwrap();
    assert_eq!(member.to_string(), "[A].[B]");
}

#[test]
fn test_failed_rule_after_partial_match_restores_position() {
    let mut p = parser("[A]:");
    assert_eq!(p.try_parse_range().unwrap(), None);
    assert!(p.try_parse_member().unwrap().is_some());
}

// ============================================================================
// Tuples and Sets
// ============================================================================

#[test]
fn test_empty_tuple_and_set() {
    assert_eq!(parser("{}").try_parse_tuple().unwrap().unwrap().to_string(), "{  }");
    assert_eq!(parser("()").try_parse_set().unwrap().unwrap().to_string(), "(  )");
}

#[test]
fn test_tuple_children() {
    let tuple = parser("{ [A]:[B], [C], NOW() }")
        .try_parse_tuple()
        .unwrap()
        .unwrap();
    assert!(matches!(tuple.children()[0], TupleChild::Range(_)));
    assert!(matches!(tuple.children()[1], TupleChild::Member(_)));
    assert!(matches!(tuple.children()[2], TupleChild::Function(_)));
    assert_eq!(tuple.to_string(), "{ [A]:[B], [C], NOW() }");
}

#[test]
fn test_tuple_in_tuple_is_merged() {
    let tuple = parser("{ { [A] }, [B] }").try_parse_tuple().unwrap().unwrap();
    assert_eq!(tuple.to_string(), "{ [A], [B] }");
}

#[test]
fn test_set_in_set_is_merged() {
    let set = parser("( ( [A] ), [B] )").try_parse_set().unwrap().unwrap();
    assert_eq!(set.to_string(), "( [A], [B] )");
}

#[test]
fn test_set_in_tuple_folds_earlier_children() {
    let tuple = parser("{ [A], [B], ( [C] ), [D] }")
        .try_parse_tuple()
        .unwrap()
        .unwrap();
    assert!(tuple.is_nested());
    assert_eq!(tuple.to_string(), "{ ( [A], [B] ), ( [C], [D] ) }");
}

#[test]
fn test_tuple_in_set_folds_earlier_children() {
    let set = parser("( [A], { [B] } )").try_parse_set().unwrap().unwrap();
    assert_eq!(set.to_string(), "( { [A] }, { [B] } )");
}

#[test]
fn test_unclosed_tuple_fails() {
    assert_eq!(parser("{ [A], [B]").try_parse_tuple().unwrap(), None);
    assert_eq!(parser("{ [A], }").try_parse_tuple().unwrap(), None);
}

// ============================================================================
// Functions and Expressions
// ============================================================================

#[test]
fn test_function() {
    let function = parser("FUNCTION(1, 2)").try_parse_function().unwrap().unwrap();
    assert_eq!(function.titles(), ["FUNCTION"]);
    assert_eq!(function.parameters().len(), 2);
    assert_eq!(function.to_string(), "FUNCTION(1, 2)");
}

#[test]
fn test_function_without_parameters() {
    let function = parser("NOW()").try_parse_function().unwrap().unwrap();
    assert!(function.parameters().is_empty());
    assert_eq!(function.to_string(), "NOW()");
}

#[test]
fn test_dotted_function_name() {
    let function = parser("Format.Value(1)").try_parse_function().unwrap().unwrap();
    assert_eq!(function.to_string(), "Format.Value(1)");
}

#[test]
fn test_function_with_empty_set_parameter() {
    let function = parser("MYFUNCTION(())").try_parse_function().unwrap().unwrap();
    assert_eq!(function.to_string(), "MYFUNCTION((  ))");
}

#[test]
fn test_function_with_container_parameters() {
    let function = parser("CROSSJOIN({ [A].Children }, { [B].Children })")
        .try_parse_function()
        .unwrap()
        .unwrap();
    assert_eq!(
        function.to_string(),
        "CROSSJOIN({ [A].Children }, { [B].Children })"
    );
}

#[test]
fn test_identifier_without_brackets_is_not_function() {
    assert_eq!(parser("FUNCTION").try_parse_function().unwrap(), None);
}

#[test]
fn test_expression_keeps_operator_order() {
    let expression = parser("1 + 2 * 3").try_parse_expression().unwrap().unwrap();
    assert_eq!(expression.operands().len(), 3);
    assert_eq!(expression.operators(), ["+", "*"]);
    assert!(expression.is_well_formed());
    assert_eq!(expression.to_string(), "1 + 2 * 3");
}

#[test]
fn test_bracketed_expression() {
    let expression = parser("(1 + 2) * 3").try_parse_expression().unwrap().unwrap();
    let Operand::Expression(inner) = &expression.operands()[0] else {
        panic!("expected nested expression");
    };
    assert!(inner.is_well_formed());
    assert!(expression.is_well_formed());
    assert_eq!(expression.to_string(), "(1 + 2) * 3");
}

#[test]
fn test_not_expression() {
    let expression = parser("NOT [Measures].[Flag] = 1 AND [B] = 2")
        .try_parse_expression()
        .unwrap()
        .unwrap();
    let Operand::Expression(inner) = &expression.operands()[0] else {
        panic!("expected nested expression");
    };
    assert!(inner.is_negated());
    assert_eq!(inner.operands().len(), 3);
    assert!(inner.is_well_formed());
    assert!(expression.is_well_formed());
    assert_eq!(expression.to_string(), "NOT [Measures].[Flag] = 1 AND [B] = 2");
}

#[test]
fn test_negative_expression() {
    let expression = parser("1 + -(2 * 3)").try_parse_expression().unwrap().unwrap();
    let Operand::Expression(inner) = &expression.operands()[1] else {
        panic!("expected nested expression");
    };
    assert!(inner.is_negative());
    assert!(inner.is_well_formed());
    assert!(expression.is_well_formed());
    assert_eq!(expression.to_string(), "1 + -(2 * 3)");
}

#[test]
fn test_minus_without_brackets_is_not_operand() {
    assert_eq!(parser("- 2").try_parse_expression().unwrap(), None);
}

#[test]
fn test_dangling_operator_fails() {
    assert_eq!(parser("1 +").try_parse_expression().unwrap(), None);
}

#[test]
fn test_constant_concatenates_adjacent_identifier() {
    let constant = parser("1 abc").try_parse_constant().unwrap().unwrap();
    assert_eq!(constant.value(), "1abc");
}

#[test]
fn test_constant_kinds() {
    for source in ["TRUE", "2014-01-31T00:00:00", "1.5", "abc", "\"quoted text\"", "DESC"] {
        let constant = parser(source).try_parse_constant().unwrap().unwrap();
        assert_eq!(constant.value(), source, "Failed for input: {}", source);
    }
}

// ============================================================================
// Axes, Cubes and Declarations
// ============================================================================

#[test]
fn test_axis() {
    let axis = parser("NON EMPTY { [Aaa].[Bbb].[Ccc].FUNCTION(1, 2).FUNCTION, [Aaa] } ON COLUMNS")
        .try_parse_axis()
        .unwrap()
        .unwrap();
    assert!(axis.is_non_empty());
    assert_eq!(axis.title(), "COLUMNS");
    assert_eq!(
        axis.to_string(),
        "NON EMPTY { [Aaa].[Bbb].[Ccc].FUNCTION(1, 2).FUNCTION, [Aaa] } ON COLUMNS"
    );
}

#[test]
fn test_axis_wraps_bare_slicer() {
    let axis = parser("[A].Children ON ROWS").try_parse_axis().unwrap().unwrap();
    assert_eq!(axis.to_string(), "{ [A].Children } ON ROWS");
}

#[test]
fn test_axis_properties() {
    let axis = parser("{ [A] } DIMENSION PROPERTIES MEMBER_CAPTION, KEY0 ON ROWS")
        .try_parse_axis()
        .unwrap()
        .unwrap();
    assert_eq!(axis.properties(), ["MEMBER_CAPTION", "KEY0"]);
    assert_eq!(
        axis.to_string(),
        "{ [A] } DIMENSION PROPERTIES MEMBER_CAPTION, KEY0 ON ROWS"
    );
}

#[test]
fn test_axis_properties_without_dimension_keyword() {
    let axis = parser("{ [A] } PROPERTIES KEY0 ON 1")
        .try_parse_axis()
        .unwrap()
        .unwrap();
    assert_eq!(axis.to_string(), "{ [A] } DIMENSION PROPERTIES KEY0 ON 1");
}

#[test]
fn test_axis_rejects_non_without_empty() {
    assert_eq!(parser("NON { [A] } ON COLUMNS").try_parse_axis().unwrap(), None);
}

#[test]
fn test_axis_rejects_dimension_without_properties() {
    assert_eq!(
        parser("{ [A] } DIMENSION KEY0 ON ROWS").try_parse_axis().unwrap(),
        None
    );
}

#[test]
fn test_axis_numbered_name() {
    let axis = parser("{ [A] } ON AXIS(2)").try_parse_axis().unwrap().unwrap();
    assert_eq!(axis.title(), "AXIS(2)");
}

#[test]
fn test_cube() {
    let cube = parser("[Aaa].[Bbb].[Ccc]").try_parse_cube().unwrap().unwrap();
    assert_eq!(cube.to_string(), "[Aaa].[Bbb].[Ccc]");
}

#[test]
fn test_member_declaration() {
    let declaration = parser("MEMBER [Measures].[Double] AS [Measures].[Sales] * 2")
        .try_parse_declaration()
        .unwrap()
        .unwrap();
    assert!(matches!(
        declaration.body(),
        Some(DeclarationBody::Expression(_))
    ));
    assert_eq!(
        declaration.to_string(),
        "MEMBER [Measures].[Double] AS [Measures].[Sales] * 2"
    );
}

#[test]
fn test_set_declaration() {
    let declaration = parser("SET [Top] AS { [A], [B] }")
        .try_parse_declaration()
        .unwrap()
        .unwrap();
    assert!(matches!(declaration.body(), Some(DeclarationBody::Tuple(_))));
    assert_eq!(declaration.to_string(), "SET [Top] AS { [A], [B] }");
}

#[test]
fn test_declaration_keyword_follows_body() {
    let declaration = parser("SET [S] AS 1").try_parse_declaration().unwrap().unwrap();
    assert_eq!(declaration.to_string(), "MEMBER [S] AS 1");
}

// ============================================================================
// Top-level Errors
// ============================================================================

#[test]
fn test_no_matching_rule() {
    let err = parse_query("SELECT").unwrap_err();
    assert_eq!(
        err,
        ParseError::NoMatchingRule {
            remaining: vec![Token::new(TokenKind::Select, "SELECT")]
        }
    );
    assert_eq!(
        err.to_string(),
        "Cannot parse the expression. There are no such rules. Select[SELECT]."
    );
}

#[test]
fn test_tokens_left() {
    let err = parse_query("SELECT { [A] } ON COLUMNS FROM [Cube] extra").unwrap_err();
    assert_eq!(
        err,
        ParseError::TokensLeft {
            remaining: vec![Token::new(TokenKind::Identifier, "extra")]
        }
    );
    assert_eq!(
        err.to_string(),
        "There are tokens left in expression. Identifier[extra]."
    );
}

#[test]
fn test_lex_error_is_reported_before_parsing() {
    let err = parse_query("SELECT [$] ON COLUMNS FROM [Cube]").unwrap_err();
    assert_eq!(
        err,
        ParseError::Lex(LexError::UnrecognizedSymbol {
            character: '$',
            position: 8
        })
    );
}

#[test]
fn test_empty_query() {
    let err = parse_query("   ").unwrap_err();
    assert_eq!(err, ParseError::NoMatchingRule { remaining: vec![] });
}

#[test]
fn test_nesting_limit() {
    let err = parse_query_with(
        "SELECT { [A] } ON COLUMNS FROM [Cube]",
        ParseOptions { max_depth: 3 },
    )
    .unwrap_err();
    assert_eq!(err, ParseError::NestingTooDeep { limit: 3 });
}

#[test]
fn test_deep_nesting_hits_default_limit() {
    let depth = 300;
    let source = format!(
        "SELECT {}[A]{} ON COLUMNS FROM [Cube]",
        "{ ".repeat(depth),
        " }".repeat(depth)
    );
    let err = parse_query(&source).unwrap_err();
    assert_eq!(err, ParseError::NestingTooDeep { limit: 256 });
}

#[test]
fn test_moderate_nesting_is_flattened() {
    let depth = 20;
    let source = format!(
        "SELECT {}[A]{} ON COLUMNS FROM [Cube]",
        "{ ".repeat(depth),
        " }".repeat(depth)
    );
    let query = parse_query(&source).unwrap();
    assert_eq!(query.to_string(), "SELECT { [A] } ON COLUMNS FROM [Cube]");
}

// ============================================================================
// Token Input
// ============================================================================

#[test]
fn test_from_tokens_appends_end() {
    let tokens = vec![
        Token::new(TokenKind::LeftSquareBracket, "["),
        Token::new(TokenKind::Identifier, "A"),
        Token::new(TokenKind::RightSquareBracket, "]"),
    ];
    let mut p = Parser::from_tokens(tokens);
    assert_eq!(p.try_parse_member().unwrap().unwrap().to_string(), "[A]");
    assert!(at_end(&mut p));
}
