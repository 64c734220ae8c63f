mod parse_bad;

use alloc::{string::String, vec::Vec};

use crate::{SyntaxError, Token, TokenEvent, Tokenizer, TokenizerOptions};

/// Feeds all of `input` and finishes, returning whatever was emitted along
/// with the outcome.
pub(crate) fn run(input: &str, options: TokenizerOptions) -> (Vec<TokenEvent>, Result<(), SyntaxError>) {
    let mut tokenizer = Tokenizer::new(options);
    let result = tokenizer.feed_str(input).and_then(|()| tokenizer.finish());
    (tokenizer.drain_events().collect(), result)
}

pub(crate) fn tokens_of(events: &[TokenEvent]) -> Vec<Token> {
    events.iter().map(|e| e.token.clone()).collect()
}

/// Asserts `input` tokenizes to exactly `expected` and completes.
#[track_caller]
pub(crate) fn assert_tokens(input: &str, options: TokenizerOptions, expected: &[Token]) {
    let (events, result) = run(input, options);
    assert_eq!(result, Ok(()), "input {input:?}");
    assert_eq!(tokens_of(&events), expected, "input {input:?}");
}

/// Asserts `input` emits exactly `before` and then fails with `message`.
#[track_caller]
pub(crate) fn assert_fails(input: &str, options: TokenizerOptions, before: &[Token], message: &str) {
    let (events, result) = run(input, options);
    assert_eq!(tokens_of(&events), before, "input {input:?}");
    let err = result.expect_err("input should be rejected");
    assert_eq!(alloc::string::ToString::to_string(&err), message, "input {input:?}");
}

pub(crate) fn name(s: &str) -> Token {
    Token::Name(s.into())
}

pub(crate) fn string(s: &str) -> Token {
    Token::String(s.into())
}

pub(crate) fn number(s: &str) -> Token {
    Token::Number(s.into())
}

pub(crate) fn repeat(c: char, n: usize) -> String {
    core::iter::repeat_n(c, n).collect()
}
