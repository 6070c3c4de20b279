pub mod cmdline;
pub mod environment;
pub mod evaluator;
pub mod interpreter;
pub mod printer;
pub mod reader;
pub mod special_forms;
pub mod symbols;
pub mod tokens;
pub mod types;

#[macro_use]
extern crate lazy_static;

mod core;

pub use interpreter::{ErrorKind, Interpreter};
pub use types::Atom;
