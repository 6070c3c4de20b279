use crate::environment::Environment;
use crate::evaluator::{BadSyntax, Error, Result, EVAL};
use crate::interpreter::Interpreter;
use crate::types::{truthy, Arity, Atom, Closure, ClosureParameters, TypeMismatch};
use std::rc::Rc;

pub fn apply_quote(args: &[Atom]) -> Result {
    Arity::exactly(1).validate_for(args.len(), "QUOTE")?;
    Ok(args[0].clone())
}

fn make_closure(parameters: &Atom, body: &[Atom], env: &Rc<Environment>) -> Result<Closure> {
    Ok(Closure {
        parameters: ClosureParameters::from_atom(parameters)?,
        body: body.to_vec(),
        parent: env.clone(),
    })
}

/// `(DEFINE NAME VALUE)` or `(DEFINE (NAME . PARAMETERS) BODY...)`.
/// Always binds in `env` itself and returns the name.
pub fn apply_define(args: &[Atom], env: &Rc<Environment>, interpreter: &Interpreter) -> Result {
    Arity::at_least(2).validate_for(args.len(), "DEFINE")?;
    let (name, value) = match &args[0] {
        Atom::Pair(signature) => {
            let closure = make_closure(&signature.cdr(), &args[1..], env)?;
            let name = signature.car().as_symbol()?.clone();
            (name, Atom::Closure(Rc::new(closure)))
        }
        Atom::Symbol(name) => {
            Arity::exactly(2).validate_for(args.len(), "DEFINE")?;
            (name.clone(), EVAL(&args[1], env, interpreter)?)
        }
        _ => return Err(Error::TypeMismatch(TypeMismatch::NotASymbol)),
    };
    env.set(name.clone(), value);
    Ok(Atom::Symbol(name))
}

pub fn apply_lambda(args: &[Atom], env: &Rc<Environment>) -> Result {
    Arity::at_least(2).validate_for(args.len(), "LAMBDA")?;
    let closure = make_closure(&args[0], &args[1..], env)?;
    Ok(Atom::Closure(Rc::new(closure)))
}

pub fn apply_if(args: &[Atom], env: &Rc<Environment>, interpreter: &Interpreter) -> Result {
    Arity::exactly(3).validate_for(args.len(), "IF")?;
    let condition = EVAL(&args[0], env, interpreter)?;
    if truthy(&condition) {
        EVAL(&args[1], env, interpreter)
    } else {
        EVAL(&args[2], env, interpreter)
    }
}

/// `(DEFMACRO (NAME . PARAMETERS) BODY...)`.
pub fn apply_defmacro(args: &[Atom], env: &Rc<Environment>) -> Result {
    Arity::at_least(2).validate_for(args.len(), "DEFMACRO")?;
    let signature = match &args[0] {
        Atom::Pair(signature) => signature,
        _ => return Err(Error::BadSyntax(BadSyntax::MacroSignatureNotAList)),
    };
    let name = signature.car().as_symbol()?.clone();
    let expander = make_closure(&signature.cdr(), &args[1..], env)?;
    env.set(name.clone(), Atom::Macro(Rc::new(expander)));
    Ok(Atom::Symbol(name))
}
