use crate::environment::Environment;
use crate::evaluator;
use crate::interpreter::Interpreter;
use derive_more::Deref;
use itertools::Itertools;
use std::cell::RefCell;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Int = i64;

/// An interned symbol name. Two symbols compare equal only if they were
/// produced by the same interning step, so equality is a pointer comparison.
#[derive(Deref, Clone)]
#[deref(forward)]
pub struct Symbol(Rc<str>);

impl Symbol {
    // Only the symbol table should mint new symbols.
    pub(crate) fn new(name: &str) -> Self {
        Self(Rc::from(name))
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", &*self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cons cell. Both slots can be replaced after construction.
#[derive(Debug)]
pub struct Pair {
    car: RefCell<Atom>,
    cdr: RefCell<Atom>,
}

impl Pair {
    pub fn new(car: Atom, cdr: Atom) -> Rc<Self> {
        Rc::new(Self {
            car: RefCell::new(car),
            cdr: RefCell::new(cdr),
        })
    }

    pub fn car(&self) -> Atom {
        self.car.borrow().clone()
    }

    pub fn cdr(&self) -> Atom {
        self.cdr.borrow().clone()
    }

    pub fn set_car(&self, value: Atom) {
        self.car.replace(value);
    }

    pub fn set_cdr(&self, value: Atom) {
        self.cdr.replace(value);
    }
}

impl Drop for Pair {
    // Unlinks the cdr chain one cell at a time so freeing a long list does not
    // recurse once per element. Stops at the first cell someone else still owns.
    fn drop(&mut self) {
        let mut next = self.cdr.replace(Atom::Nil);
        while let Atom::Pair(cell) = next {
            match Rc::try_unwrap(cell) {
                Ok(pair) => next = pair.cdr.replace(Atom::Nil),
                Err(_) => break,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: &'static str,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "When evaluating {} expected {} arguments, but received {} arguments",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name,
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

pub type BuiltinFnPtr = fn(&Interpreter, &[Atom]) -> evaluator::Result;

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: BuiltinFnPtr,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "builtin #<{}>", self.name)
    }
}

/// Parameter spec of a closure: `(A B)`, `(A B . REST)` or a bare `ARGS`.
#[derive(Clone, Debug)]
pub struct ClosureParameters {
    pub positional: Vec<Symbol>,
    pub others: Option<Symbol>,
}

impl ClosureParameters {
    pub fn from_atom(spec: &Atom) -> Result<Self, TypeMismatch> {
        let mut positional = Vec::new();
        let mut cursor = spec.clone();
        loop {
            match cursor {
                Atom::Nil => {
                    return Ok(Self {
                        positional,
                        others: None,
                    })
                }
                Atom::Symbol(rest) => {
                    return Ok(Self {
                        positional,
                        others: Some(rest),
                    })
                }
                Atom::Pair(cell) => {
                    match cell.car() {
                        Atom::Symbol(s) => positional.push(s),
                        _ => return Err(TypeMismatch::ParameterNotASymbol),
                    }
                    cursor = cell.cdr();
                }
                _ => return Err(TypeMismatch::ParameterNotASymbol),
            }
        }
    }

    pub fn arity(&self) -> Arity {
        match self.others {
            None => Arity::exactly(self.positional.len()),
            Some(_) => Arity::at_least(self.positional.len()),
        }
    }
}

impl fmt::Display for ClosureParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.positional.iter().join(" "))?;
        if let Some(rest) = &self.others {
            write!(f, " . {}", rest)?;
        }
        write!(f, ")")
    }
}

/// The payload shared by `Atom::Closure` and `Atom::Macro`.
#[derive(Clone)]
pub struct Closure {
    pub parameters: ClosureParameters,
    pub body: Vec<Atom>,
    pub parent: Rc<Environment>,
}

impl fmt::Debug for Closure {
    // Not derived because we want to skip the parent: the parent may well contain this Closure!
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Closure{{parameters: {:?}, body: {:?}}}",
            self.parameters, self.body
        )
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(LAMBDA {} {})", self.parameters, self.body.iter().join(" "))
    }
}

#[derive(Debug, Clone)]
pub enum Atom {
    Nil,
    Pair(Rc<Pair>),
    Symbol(Symbol),
    Integer(Int),
    Builtin(&'static Builtin),
    Closure(Rc<Closure>),
    Macro(Rc<Closure>),
}

#[derive(Debug)]
pub enum TypeMismatch {
    NotAnInt,
    NotAPair,
    NotASymbol,
    NotAList,
    NotCallable,
    ParameterNotASymbol,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeMismatch::NotAnInt => "expected an integer",
            TypeMismatch::NotAPair => "expected a pair or NIL",
            TypeMismatch::NotASymbol => "expected a symbol",
            TypeMismatch::NotAList => "expected a proper list",
            TypeMismatch::NotCallable => "value cannot be applied",
            TypeMismatch::ParameterNotASymbol => "parameter is not a symbol",
        })
    }
}

pub fn cons(car: Atom, cdr: Atom) -> Atom {
    Atom::Pair(Pair::new(car, cdr))
}

pub(crate) fn truthy(atom: &Atom) -> bool {
    !atom.is_nil()
}

impl Atom {
    pub(crate) fn wrap_list(elements: Vec<Atom>) -> Self {
        Self::wrap_dotted(elements, Atom::Nil)
    }

    pub(crate) fn wrap_dotted(elements: Vec<Atom>, tail: Atom) -> Self {
        elements
            .into_iter()
            .rev()
            .fold(tail, |rest, element| cons(element, rest))
    }

    /// Collects the elements of a proper list, or `None` if the chain ends in
    /// anything other than NIL.
    pub fn to_vec(&self) -> Option<Vec<Atom>> {
        let mut elements = Vec::new();
        let mut cursor = self.clone();
        loop {
            match cursor {
                Atom::Nil => return Some(elements),
                Atom::Pair(cell) => {
                    elements.push(cell.car());
                    cursor = cell.cdr();
                }
                _ => return None,
            }
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Atom::Nil)
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Atom::Pair(_))
    }

    pub(crate) fn as_int(&self) -> Result<Int, TypeMismatch> {
        match self {
            Atom::Integer(x) => Ok(*x),
            _ => Err(TypeMismatch::NotAnInt),
        }
    }

    pub(crate) fn as_symbol(&self) -> Result<&Symbol, TypeMismatch> {
        match self {
            Atom::Symbol(s) => Ok(s),
            _ => Err(TypeMismatch::NotASymbol),
        }
    }

    /// Identity comparison: integers by value, everything else by reference.
    pub fn is(&self, other: &Atom) -> bool {
        use Atom::*;
        match (self, other) {
            (Nil, Nil) => true,
            (Integer(x), Integer(y)) => x == y,
            (Symbol(x), Symbol(y)) => x == y,
            (Pair(x), Pair(y)) => Rc::ptr_eq(x, y),
            (Builtin(x), Builtin(y)) => std::ptr::eq(*x, *y),
            (Closure(x), Closure(y)) | (Macro(x), Macro(y)) => Rc::ptr_eq(x, y),
            _ => false,
        }
    }
}
