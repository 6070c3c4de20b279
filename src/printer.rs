use crate::types::Atom;
use std::fmt;

pub fn pr_str(atom: &Atom) -> String {
    atom.to_string()
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Nil => write!(f, "NIL"),
            Atom::Integer(value) => write!(f, "{}", value),
            Atom::Symbol(name) => write!(f, "{}", name),
            Atom::Builtin(builtin) => write!(f, "#<BUILTIN:{}>", builtin.name),
            Atom::Closure(_) => write!(f, "#<CLOSURE>"),
            Atom::Macro(_) => write!(f, "#<MACRO>"),
            Atom::Pair(cell) => {
                write!(f, "({}", cell.car())?;
                let mut rest = cell.cdr();
                loop {
                    match rest {
                        Atom::Nil => break,
                        Atom::Pair(next) => {
                            write!(f, " {}", next.car())?;
                            rest = next.cdr();
                        }
                        tail => {
                            write!(f, " . {}", tail)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolTable;
    use crate::types::cons;

    #[test]
    fn prints_scalars() {
        let symbols = SymbolTable::new();
        assert_eq!(pr_str(&Atom::Nil), "NIL");
        assert_eq!(pr_str(&Atom::Integer(-42)), "-42");
        assert_eq!(pr_str(&Atom::Symbol(symbols.intern("FOO"))), "FOO");
    }

    #[test]
    fn prints_proper_and_improper_lists() {
        let symbols = SymbolTable::new();
        let xy = cons(
            Atom::Symbol(symbols.intern("X")),
            Atom::Symbol(symbols.intern("Y")),
        );
        assert_eq!(pr_str(&xy), "(X . Y)");

        let list = Atom::wrap_list(vec![Atom::Integer(1), Atom::Integer(2), Atom::Integer(3)]);
        assert_eq!(pr_str(&list), "(1 2 3)");

        let dotted = Atom::wrap_dotted(vec![Atom::Integer(1), Atom::Integer(2)], Atom::Integer(3));
        assert_eq!(pr_str(&dotted), "(1 2 . 3)");

        let nested = Atom::wrap_list(vec![list, Atom::Nil]);
        assert_eq!(pr_str(&nested), "((1 2 3) NIL)");
    }
}
