use crate::environment::{self, Environment};
use crate::evaluator;
use crate::reader;
use crate::symbols::SymbolTable;
use crate::tokens::only_whitespace_left;
use crate::types::{Atom, Symbol};
use std::fmt;
use std::rc::Rc;

const PRELUDE: &str = include_str!("prelude.lisp");

pub type Result<T = Atom> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

/// The kind of failure, independent of whether it came from the reader or
/// the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Unbound,
    Args,
    Type,
    DivideByZero,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use evaluator::Error::*;
        match self {
            Error::Read(_) => ErrorKind::Syntax,
            Error::Eval(BadSyntax(_)) => ErrorKind::Syntax,
            Error::Eval(UnknownSymbol(_)) => ErrorKind::Unbound,
            Error::Eval(BadArgCount(_)) => ErrorKind::Args,
            Error::Eval(TypeMismatch(_)) => ErrorKind::Type,
            Error::Eval(DivideByZero) => ErrorKind::DivideByZero,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "read error: {}", e),
            Error::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<reader::Error> for Error {
    fn from(e: reader::Error) -> Self {
        Self::Read(e)
    }
}

impl From<evaluator::Error> for Error {
    fn from(e: evaluator::Error) -> Self {
        Self::Eval(e)
    }
}

/// Owns the symbol table and the global environment. Everything read or
/// evaluated through one interpreter shares its symbols and definitions;
/// separate interpreters share nothing.
pub struct Interpreter {
    symbols: SymbolTable,
    global: Rc<Environment>,
    t: Symbol,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter with the builtin procedures and `T`, but no prelude.
    pub fn new() -> Self {
        let symbols = SymbolTable::new();
        let global = environment::core_env(&symbols);
        let t = symbols.intern("T");
        Self { symbols, global, t }
    }

    /// An interpreter whose global environment also holds the prelude
    /// definitions (`LIST`, `NOT`, `MAP`, ...).
    pub fn with_prelude() -> Result<Self> {
        let interpreter = Self::new();
        interpreter.load_prelude()?;
        Ok(interpreter)
    }

    pub fn load_prelude(&self) -> Result<()> {
        log::info!("loading prelude");
        self.rep(PRELUDE).map(|_| ())
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn global(&self) -> &Rc<Environment> {
        &self.global
    }

    pub fn intern(&self, name: &str) -> Symbol {
        self.symbols.intern(name)
    }

    pub(crate) fn truth(&self, value: bool) -> Atom {
        match value {
            true => Atom::Symbol(self.t.clone()),
            false => Atom::Nil,
        }
    }

    pub fn read<'a>(&self, text: &'a str) -> Result<(Atom, &'a str)> {
        Ok(reader::read_expr(text, &self.symbols)?)
    }

    pub fn eval(&self, expr: &Atom) -> Result {
        self.eval_in(expr, &self.global)
    }

    pub fn eval_in(&self, expr: &Atom, env: &Rc<Environment>) -> Result {
        Ok(evaluator::EVAL(expr, env, self)?)
    }

    /// Reads and evaluates every expression in `text` in order, returning
    /// the value of the last one. The first error stops the rest.
    pub fn rep(&self, text: &str) -> Result {
        let (expr, mut rest) = self.read(text)?;
        let mut value = self.eval(&expr)?;
        while !only_whitespace_left(rest) {
            let (expr, next) = self.read(rest)?;
            value = self.eval(&expr)?;
            rest = next;
        }
        Ok(value)
    }
}
