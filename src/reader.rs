use crate::symbols::SymbolTable;
use crate::tokens::{next_token, Token, TokenizerError};
use crate::types::{Atom, Int, Pair};
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub enum Error {
    TokenizerError(TokenizerError),
    UnclosedList,
    UnexpectedCloseBracket,
    DotWithoutHead,
    DotNotFollowedByClose,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TokenizerError(e) => write!(f, "{}", e),
            Error::UnclosedList => write!(f, "input ended inside a list"),
            Error::UnexpectedCloseBracket => write!(f, "unexpected ')'"),
            Error::DotWithoutHead => write!(f, "'.' must follow at least one list element"),
            Error::DotNotFollowedByClose => {
                write!(f, "exactly one expression must follow '.' before ')'")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reads one expression from the front of `input`, returning it together with
/// the unconsumed remainder.
pub fn read_expr<'a>(input: &'a str, symbols: &SymbolTable) -> Result<(Atom, &'a str)> {
    let mut reader = Reader {
        rest: input,
        symbols,
    };
    let expr = reader.read_expr()?;
    Ok((expr, reader.rest))
}

struct Reader<'a, 's> {
    rest: &'a str,
    symbols: &'s SymbolTable,
}

impl<'a, 's> Reader<'a, 's> {
    fn next(&mut self) -> std::result::Result<Token<'a>, TokenizerError> {
        let (token, rest) = next_token(self.rest)?;
        self.rest = rest;
        Ok(token)
    }

    fn peek(&self) -> std::result::Result<Token<'a>, TokenizerError> {
        next_token(self.rest).map(|(token, _)| token)
    }

    fn read_expr(&mut self) -> Result<Atom> {
        match self.next().map_err(Error::TokenizerError)? {
            Token::OpenRoundBracket => self.read_list(),
            Token::CloseRoundBracket => Err(Error::UnexpectedCloseBracket),
            Token::Quote => {
                let quoted = self.read_expr()?;
                let quote = Atom::Symbol(self.symbols.intern("QUOTE"));
                Ok(Atom::wrap_list(vec![quote, quoted]))
            }
            Token::PlainChars(chars) => Ok(self.read_atom(chars)),
        }
    }

    // Builds the list front to back by overwriting the tail of the last cell.
    fn read_list(&mut self) -> Result<Atom> {
        let mut head = Atom::Nil;
        let mut last: Option<Rc<Pair>> = None;
        loop {
            match self.peek().map_err(|_| Error::UnclosedList)? {
                Token::CloseRoundBracket => {
                    self.next().map_err(Error::TokenizerError)?;
                    return Ok(head);
                }
                Token::PlainChars(".") => {
                    self.next().map_err(Error::TokenizerError)?;
                    let last = last.as_ref().ok_or(Error::DotWithoutHead)?;
                    let tail = self.read_expr().map_err(|e| match e {
                        Error::TokenizerError(_) => Error::UnclosedList,
                        e => e,
                    })?;
                    last.set_cdr(tail);
                    return match self.next() {
                        Ok(Token::CloseRoundBracket) => Ok(head),
                        Ok(_) => Err(Error::DotNotFollowedByClose),
                        Err(_) => Err(Error::UnclosedList),
                    };
                }
                _ => {
                    let element = self.read_expr()?;
                    let cell = Pair::new(element, Atom::Nil);
                    match &last {
                        None => head = Atom::Pair(cell.clone()),
                        Some(previous) => previous.set_cdr(Atom::Pair(cell.clone())),
                    }
                    last = Some(cell);
                }
            }
        }
    }

    fn read_atom(&self, chars: &str) -> Atom {
        if let Ok(value) = chars.parse::<Int>() {
            return Atom::Integer(value);
        }
        let name = chars.to_ascii_uppercase();
        match name.as_str() {
            "NIL" => Atom::Nil,
            _ => Atom::Symbol(self.symbols.intern(&name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::pr_str;

    fn read(input: &str) -> Result<Atom> {
        let symbols = SymbolTable::new();
        read_expr(input, &symbols).map(|(expr, _)| expr)
    }

    fn round_trip(input: &str) -> String {
        pr_str(&read(input).unwrap())
    }

    #[test]
    fn reads_integers() {
        assert_eq!(round_trip("42"), "42");
        assert_eq!(round_trip("-17"), "-17");
        assert_eq!(round_trip("+8"), "8");
    }

    #[test]
    fn partial_integer_is_a_symbol() {
        match read("12abc").unwrap() {
            Atom::Symbol(s) => assert_eq!(&*s, "12ABC"),
            other => panic!("expected a symbol, got {:?}", other),
        }
        match read("-").unwrap() {
            Atom::Symbol(s) => assert_eq!(&*s, "-"),
            other => panic!("expected a symbol, got {:?}", other),
        }
    }

    #[test]
    fn symbols_are_upcased_and_nil_is_recognised() {
        assert_eq!(round_trip("foo"), "FOO");
        assert!(read("nil").unwrap().is_nil());
        assert!(read("Nil").unwrap().is_nil());
    }

    #[test]
    fn same_symbol_in_any_case_is_identical() {
        let symbols = SymbolTable::new();
        let (a, _) = read_expr("foo", &symbols).unwrap();
        let (b, _) = read_expr("FoO", &symbols).unwrap();
        assert!(a.is(&b));
    }

    #[test]
    fn reads_lists() {
        assert_eq!(round_trip("(1 2 3)"), "(1 2 3)");
        assert_eq!(round_trip("( a (b c) () )"), "(A (B C) NIL)");
    }

    #[test]
    fn reads_dotted_pairs() {
        match read("(1 . 2)").unwrap() {
            Atom::Pair(cell) => {
                assert!(matches!(cell.car(), Atom::Integer(1)));
                assert!(matches!(cell.cdr(), Atom::Integer(2)));
            }
            other => panic!("expected a pair, got {:?}", other),
        }
        assert_eq!(round_trip("(1 2 . 3)"), "(1 2 . 3)");
        assert_eq!(round_trip("(1 . (2 3))"), "(1 2 3)");
    }

    #[test]
    fn dotted_tail_ends_the_chain() {
        let first = match read("(1 2 . 3)").unwrap() {
            Atom::Pair(cell) => cell,
            other => panic!("expected a pair, got {:?}", other),
        };
        assert!(matches!(first.car(), Atom::Integer(1)));
        let second = match first.cdr() {
            Atom::Pair(cell) => cell,
            other => panic!("expected a pair, got {:?}", other),
        };
        assert!(matches!(second.car(), Atom::Integer(2)));
        assert!(matches!(second.cdr(), Atom::Integer(3)));
        assert!(read("(1 2 . 3)").unwrap().to_vec().is_none());
    }

    #[test]
    fn quote_expands_to_quote_form() {
        assert_eq!(round_trip("'x"), "(QUOTE X)");
        assert_eq!(round_trip("'(1 'b)"), "(QUOTE (1 (QUOTE B)))");
    }

    #[test]
    fn leaves_remaining_input() {
        let symbols = SymbolTable::new();
        let (expr, rest) = read_expr("(a b) c", &symbols).unwrap();
        assert_eq!(pr_str(&expr), "(A B)");
        assert_eq!(rest, " c");
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(read("(1 2"), Err(Error::UnclosedList)));
        assert!(matches!(read(")"), Err(Error::UnexpectedCloseBracket)));
        assert!(matches!(read("(. 1)"), Err(Error::DotWithoutHead)));
        assert!(matches!(read("(1 . 2 3)"), Err(Error::DotNotFollowedByClose)));
        assert!(matches!(read("(1 .)"), Err(Error::UnexpectedCloseBracket)));
        assert!(matches!(read("(1 . 2"), Err(Error::UnclosedList)));
        assert!(matches!(read(""), Err(Error::TokenizerError(_))));
        assert!(matches!(read("'"), Err(Error::TokenizerError(_))));
    }
}
