use regex::Regex;
use std::fmt;

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum Token<'a> {
    OpenRoundBracket,
    CloseRoundBracket,
    Quote,
    PlainChars(&'a str),
}

#[derive(Debug)]
pub enum TokenizerError {
    NoMoreTokens,
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tokenizer failed: {}",
            match self {
                TokenizerError::NoMoreTokens => "input ended before a token was found",
            }
        )
    }
}

fn create_token(captured: &str) -> Token {
    match captured {
        "(" => Token::OpenRoundBracket,
        ")" => Token::CloseRoundBracket,
        "'" => Token::Quote,
        _ => Token::PlainChars(captured),
    }
}

/// Skips leading whitespace and splits off the next token, returning it with
/// the rest of the input.
pub fn next_token(input: &str) -> Result<(Token, &str), TokenizerError> {
    lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(
            r#"(?x)                          # ignore whitespace in this pattern & allow comments
                ^\s*                         # leading whitespace, ignored
                (                            # token capture group
                    [()']                    # single special characters
                    |[^\s()]+                # a run of plain characters
                )
            "#
        )
        .unwrap();
    }
    let caps = TOKEN_RE
        .captures(input)
        .ok_or(TokenizerError::NoMoreTokens)?;
    let token = caps.get(1).ok_or(TokenizerError::NoMoreTokens)?;
    Ok((create_token(token.as_str()), &input[token.end()..]))
}

pub(crate) fn only_whitespace_left(input: &str) -> bool {
    input.trim_start().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(mut input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Ok((token, rest)) = next_token(input) {
            tokens.push(token);
            input = rest;
        }
        tokens
    }

    #[test]
    fn splits_on_brackets_and_whitespace() {
        use Token::*;
        assert_eq!(
            tokenize("  (foo 12\t(bar))"),
            vec![
                OpenRoundBracket,
                PlainChars("foo"),
                PlainChars("12"),
                OpenRoundBracket,
                PlainChars("bar"),
                CloseRoundBracket,
                CloseRoundBracket,
            ]
        );
    }

    #[test]
    fn quote_is_its_own_token_only_at_token_start() {
        use Token::*;
        assert_eq!(
            tokenize("'a b'c"),
            vec![Quote, PlainChars("a"), PlainChars("b'c")]
        );
    }

    #[test]
    fn returns_remaining_input() {
        let (token, rest) = next_token("  abc def").unwrap();
        assert_eq!(token, Token::PlainChars("abc"));
        assert_eq!(rest, " def");
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(next_token("").is_err());
        assert!(next_token(" \n\t ").is_err());
    }
}
