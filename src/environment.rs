use crate::core;
use crate::symbols::SymbolTable;
use crate::types::{Atom, Symbol};
use itertools::Itertools;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
pub struct UnknownSymbol(pub Symbol);

/// One frame of bindings, chained to the frame it was created in.
pub struct Environment {
    parent: Option<Rc<Environment>>,
    // Oldest binding first; lookups scan from the back.
    bindings: RefCell<Vec<(Symbol, Atom)>>,
}

impl Environment {
    pub fn root() -> Rc<Self> {
        Rc::new(Self {
            parent: None,
            bindings: RefCell::new(Vec::new()),
        })
    }

    pub fn spawn_from(parent: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Self {
            parent: Some(parent.clone()),
            bindings: RefCell::new(Vec::new()),
        })
    }

    /// Binds `key` in this frame only. An existing local binding is updated in
    /// place; a binding in an enclosing frame is shadowed, never modified.
    pub fn set(&self, key: Symbol, value: Atom) {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.iter().rposition(|(name, _)| *name == key) {
            Some(index) => bindings[index].1 = value,
            None => bindings.push((key, value)),
        }
    }

    pub fn get_local(&self, key: &Symbol) -> Option<Atom> {
        self.bindings
            .borrow()
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    }

    pub fn get(&self, key: &Symbol) -> Option<Atom> {
        let mut frame = self;
        loop {
            if let Some(value) = frame.get_local(key) {
                return Some(value);
            }
            frame = frame.parent.as_deref()?;
        }
    }

    pub fn fetch(&self, key: &Symbol) -> Result<Atom, UnknownSymbol> {
        self.get(key).ok_or_else(|| UnknownSymbol(key.clone()))
    }
}

impl fmt::Display for Environment {
    // Names only: printing values could recurse back into this frame.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.bindings.borrow();
        write!(f, "{{{}}}", bindings.iter().rev().map(|(name, _)| name).join(" "))?;
        if let Some(parent) = &self.parent {
            write!(f, " -> {}", parent)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment{}", self)
    }
}

/// Creates the global frame holding the builtin procedures and `T`.
pub fn core_env(symbols: &SymbolTable) -> Rc<Environment> {
    let env = Environment::root();
    for &func in core::CORE.iter() {
        env.set(symbols.intern(func.name), Atom::Builtin(func));
    }
    let t = symbols.intern("T");
    env.set(t.clone(), Atom::Symbol(t));
    env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_falls_back_to_parent() {
        let symbols = SymbolTable::new();
        let x = symbols.intern("X");
        let global = Environment::root();
        global.set(x.clone(), Atom::Integer(1));
        let child = Environment::spawn_from(&global);
        assert_eq!(child.fetch(&x).unwrap().as_int().unwrap(), 1);
        assert!(child.get_local(&x).is_none());
    }

    #[test]
    fn missing_symbol_is_unknown() {
        let symbols = SymbolTable::new();
        let env = Environment::spawn_from(&Environment::root());
        let missing = symbols.intern("MISSING");
        match env.fetch(&missing) {
            Err(UnknownSymbol(s)) => assert_eq!(s, missing),
            Ok(value) => panic!("unexpectedly bound to {}", value),
        }
    }

    #[test]
    fn set_updates_local_binding_in_place() {
        let symbols = SymbolTable::new();
        let x = symbols.intern("X");
        let env = Environment::root();
        env.set(x.clone(), Atom::Integer(1));
        env.set(x.clone(), Atom::Integer(2));
        assert_eq!(env.fetch(&x).unwrap().as_int().unwrap(), 2);
        assert_eq!(env.bindings.borrow().len(), 1);
    }

    #[test]
    fn set_in_child_shadows_parent() {
        let symbols = SymbolTable::new();
        let x = symbols.intern("X");
        let global = Environment::root();
        global.set(x.clone(), Atom::Integer(1));
        let child = Environment::spawn_from(&global);
        child.set(x.clone(), Atom::Integer(2));
        assert_eq!(child.fetch(&x).unwrap().as_int().unwrap(), 2);
        assert_eq!(global.fetch(&x).unwrap().as_int().unwrap(), 1);
    }

    #[test]
    fn core_env_binds_builtins_and_t() {
        let symbols = SymbolTable::new();
        let env = core_env(&symbols);
        assert!(matches!(env.fetch(&symbols.intern("CAR")), Ok(Atom::Builtin(_))));
        let t = symbols.intern("T");
        match env.fetch(&t) {
            Ok(Atom::Symbol(s)) => assert_eq!(s, t),
            other => panic!("T bound to {:?}", other),
        }
    }
}
