use crate::types::Symbol;
use std::cell::RefCell;

/// Every symbol the interpreter has ever seen. Entries are never removed.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: RefCell<Vec<Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing symbol spelled `name`, or records a new one.
    /// The text is taken as given; case folding is the reader's job.
    pub fn intern(&self, name: &str) -> Symbol {
        let mut symbols = self.symbols.borrow_mut();
        if let Some(existing) = symbols.iter().find(|s| &***s == name) {
            return existing.clone();
        }
        let symbol = Symbol::new(name);
        log::trace!("interned {}", symbol);
        symbols.push(symbol.clone());
        symbol
    }

    pub fn len(&self) -> usize {
        self.symbols.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.borrow().is_empty()
    }
}
