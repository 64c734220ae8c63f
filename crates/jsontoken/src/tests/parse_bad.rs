use alloc::{format, vec, vec::Vec};

use rstest::rstest;

use super::{assert_fails, name, number, repeat, run, string};
use crate::{
    Status, SyntaxErrorKind, Token,
    Token::{ArrayEnd, ArrayStart, Boolean, DocumentEnd, ObjectStart},
    Tokenizer, TokenizerOptions, path,
};

const STRICT: TokenizerOptions = TokenizerOptions::strict();
const LENIENT: TokenizerOptions = TokenizerOptions::lenient();

#[rstest]
#[case::empty("", vec![], "Empty JSON at line 1 column 1 path $")]
#[case::whitespace_only(" \n ", vec![], "Empty JSON at line 2 column 2 path $")]
#[case::unquoted_string("a", vec![], "Invalid bare token at line 1 column 2 path $")]
#[case::unquoted_in_array("[a]", vec![ArrayStart], "Invalid value at line 1 column 3 path $[0]")]
#[case::single_quoted("'a'", vec![], "Invalid value at line 1 column 1 path $")]
#[case::single_quoted_in_array("['a']", vec![ArrayStart], "Invalid value at line 1 column 2 path $")]
#[case::nan("[NaN]", vec![ArrayStart], "Invalid value at line 1 column 5 path $[0]")]
#[case::infinity("[Infinity]", vec![ArrayStart], "Invalid value at line 1 column 10 path $[0]")]
#[case::negative_infinity("[-Infinity]", vec![ArrayStart], "Invalid value at line 1 column 11 path $[0]")]
#[case::octal("[03]", vec![ArrayStart], "Invalid value at line 1 column 4 path $[0]")]
#[case::lone_minus("[-]", vec![ArrayStart], "Invalid value at line 1 column 3 path $[0]")]
#[case::dangling_decimal("[1.]", vec![ArrayStart], "Invalid value at line 1 column 4 path $[0]")]
#[case::dangling_exponent("[1e+]", vec![ArrayStart], "Invalid value at line 1 column 5 path $[0]")]
#[case::invalid_escape(r#"["\u000g"]"#, vec![ArrayStart], "Invalid unicode escape sequence at line 1 column 8 path $[0]")]
#[case::truncated_unicode(r#"["\u000"#, vec![ArrayStart], "Expected string data or close quote at line 1 column 8 path $[0]")]
#[case::truncated_escape("[\"\\", vec![ArrayStart], "Expected string data or close quote at line 1 column 4 path $[0]")]
#[case::unterminated_string("\"a", vec![], "Expected string data or close quote at line 1 column 3 path $")]
#[case::equals_separator(r#"{"a"="b"}"#, vec![ObjectStart, name("a")], "Expected object separator at line 1 column 5 path $")]
#[case::arrow_separator(r#"{"a"=>"b"}"#, vec![ObjectStart, name("a")], "Expected object separator at line 1 column 5 path $")]
#[case::unquoted_name(r#"{a:"b"}"#, vec![ObjectStart], "Expected name at line 1 column 2 path $")]
#[case::single_quoted_name(r#"{'a':"b"}"#, vec![ObjectStart], "Expected name at line 1 column 2 path $")]
#[case::semicolon_in_object(
    r#"{"a":true;"b":true}"#,
    vec![ObjectStart, name("a"), Boolean(true)],
    "Expected list separator at line 1 column 10 path $.a"
)]
#[case::semicolon_in_array("[true;true]", vec![ArrayStart, Boolean(true)], "Expected list separator at line 1 column 6 path $[0]")]
#[case::double_comma("[true,,true]", vec![ArrayStart, Boolean(true)], "Expected value at line 1 column 7 path $[1]")]
#[case::trailing_comma("[true,]", vec![ArrayStart, Boolean(true)], "Expected value at line 1 column 7 path $[1]")]
#[case::leading_comma("[,true]", vec![ArrayStart], "Expected value at line 1 column 2 path $")]
#[case::comma_only("[,]", vec![ArrayStart], "Expected value at line 1 column 2 path $")]
#[case::array_closed_by_brace("[}", vec![ArrayStart], "Expected value at line 1 column 2 path $")]
#[case::object_closed_by_bracket("{]", vec![ObjectStart], "Expected name at line 1 column 2 path $")]
#[case::missing_value(r#"{"a":}"#, vec![ObjectStart, name("a")], "Expected value at line 1 column 6 path $")]
#[case::trailing_comma_in_object(
    r#"{"a":"b",}"#,
    vec![ObjectStart, name("a"), string("b")],
    "Expected name at line 1 column 10 path $.a"
)]
#[case::premature_end_of_object(
    r#"{"a":true,"#,
    vec![ObjectStart, name("a"), Boolean(true)],
    "Expected any value at line 1 column 11 path $.a"
)]
#[case::missing_name_separator(r#"{"a""#, vec![ObjectStart, name("a")], "Expected name-value separator at line 1 column 5 path $")]
#[case::unclosed_array("[1", vec![ArrayStart, number("1")], "Expected separator or end of array at line 1 column 3 path $[0]")]
#[case::unclosed_object("{", vec![ObjectStart], "Expected any value or end of object at line 1 column 2 path $")]
#[case::line_comment("[// comment\n true]", vec![ArrayStart], "Invalid value at line 1 column 4 path $[0]")]
#[case::hash_comment("[# comment\n true]", vec![ArrayStart], "Invalid value at line 1 column 3 path $[0]")]
#[case::block_comment("[/* comment */ true]", vec![ArrayStart], "Invalid value at line 1 column 4 path $[0]")]
#[case::multiple_documents("[][]", vec![ArrayStart, ArrayEnd, DocumentEnd], "Unexpected data after document completed at line 1 column 3 path $")]
#[case::non_execute_prefix(")]}'\n []", vec![], "Invalid value at line 1 column 2 path $")]
#[case::non_execute_prefix_spaced("\r\n \t)]}'\n []", vec![], "Invalid value at line 2 column 4 path $")]
#[case::bom_second(" \u{feff}[]", vec![], "Invalid value at line 1 column 3 path $")]
#[case::bom_in_array("[\u{feff}]", vec![ArrayStart], "Invalid value at line 1 column 3 path $[0]")]
#[case::bare_backslash("[\\", vec![ArrayStart], "Invalid value at line 1 column 2 path $")]
fn strict_rejects(#[case] input: &str, #[case] before: Vec<Token>, #[case] message: &str) {
    assert_fails(input, STRICT, &before, message);
}

#[rstest]
#[case::after_separator("[\n\n\n\n\n\"a\",}]", "Expected value at line 6 column 5 path $[1]")]
#[case::eol_comments("\n// foo\n\n//bar\r\n[\"a\",}", "Expected value at line 5 column 6 path $[1]")]
#[case::hash_comments("\n# foo\n\n#bar\r\n[\"a\",}", "Expected value at line 5 column 6 path $[1]")]
#[case::block_comment("\n\n/* foo\n*\n*\r\nbar */[\"a\",}", "Expected value at line 6 column 12 path $[1]")]
#[case::quoted_string("[\"foo\nbar\r\nbaz\n\",\n  }", "Expected value at line 5 column 3 path $[1]")]
#[case::unquoted_string("[\n\nabcd\n\n,}", "Expected value at line 5 column 2 path $[1]")]
#[case::escaped_newline("[\n\n\"\\\n\n\",}", "Expected value at line 5 column 3 path $[1]")]
#[case::after_bom("\u{feff}[\"a\",}]", "Expected value at line 1 column 6 path $[1]")]
#[case::nested_path("[1,{\"a\":[2,3,}", "Expected value at line 1 column 14 path $[1].a[2]")]
fn errors_point_at_the_offending_character(#[case] input: &str, #[case] message: &str) {
    let (_, result) = run(input, LENIENT);
    let err = result.expect_err("input should be rejected");
    assert_eq!(alloc::string::ToString::to_string(&err), message);
}

#[test]
fn position_survives_long_whitespace_runs() {
    let input = format!("[\n\n{}\n\n\n\"a\",}}]", repeat(' ', 8192));
    let (_, result) = run(&input, LENIENT);
    let err = result.expect_err("input should be rejected");
    assert_eq!(err.kind, SyntaxErrorKind::ExpectedValue);
    assert_eq!((err.line, err.column), (6, 5));
    assert_eq!(err.path, path![1]);
}

#[test]
fn error_is_final() {
    let mut tokenizer = Tokenizer::new(STRICT);
    let err = tokenizer.feed_str("[true,,").unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::ExpectedValue);
    assert_eq!(tokenizer.status(), Status::Failed);

    for c in "true]".chars() {
        assert_eq!(tokenizer.feed(c), Ok(()));
    }
    assert_eq!(tokenizer.finish(), Ok(()));
    assert_eq!(tokenizer.status(), Status::Failed);

    let tokens: Vec<_> = tokenizer.drain_events().map(|e| e.token).collect();
    assert_eq!(tokens, [ArrayStart, Boolean(true)]);
}

#[test]
fn events_before_the_error_are_kept() {
    let (events, result) = run(r#"{"a":[1,2,}"#, STRICT);
    assert!(result.is_err());
    let paths: Vec<_> = events.iter().map(|e| e.path.clone()).collect();
    assert_eq!(paths, [path![], path![], path!["a"], path!["a", 0], path!["a", 1]]);
}
