use crate::environment::{Environment, UnknownSymbol};
use crate::interpreter::Interpreter;
use crate::special_forms;
use crate::types::{Atom, BadArgCount, Builtin, Closure, TypeMismatch};
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Atom> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    BadSyntax(BadSyntax),
    UnknownSymbol(UnknownSymbol),
    BadArgCount(BadArgCount),
    TypeMismatch(TypeMismatch),
    DivideByZero,
}

#[derive(Debug)]
pub enum BadSyntax {
    ImproperForm,
    MacroSignatureNotAList,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadSyntax(BadSyntax::ImproperForm) => {
                write!(f, "bad syntax: cannot evaluate an improper list")
            }
            Error::BadSyntax(BadSyntax::MacroSignatureNotAList) => {
                write!(f, "bad syntax: DEFMACRO expects (NAME . PARAMETERS)")
            }
            Error::UnknownSymbol(UnknownSymbol(s)) => write!(f, "'{}' not found", s),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::TypeMismatch(e) => write!(f, "type mismatch: {}", e),
            Error::DivideByZero => write!(f, "cannot divide by zero!"),
        }
    }
}

impl From<TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Self::TypeMismatch(t)
    }
}

impl From<BadArgCount> for Error {
    fn from(e: BadArgCount) -> Self {
        Self::BadArgCount(e)
    }
}

#[allow(non_snake_case)]
pub fn EVAL(ast: &Atom, env: &Rc<Environment>, interpreter: &Interpreter) -> Result {
    log::trace!("eval {}", ast);
    match ast {
        Atom::Symbol(s) => env.fetch(s).map_err(Error::UnknownSymbol),
        Atom::Pair(_) => evaluate_form(ast, env, interpreter),
        _ => Ok(ast.clone()),
    }
}

fn evaluate_form(ast: &Atom, env: &Rc<Environment>, interpreter: &Interpreter) -> Result {
    let argv = ast
        .to_vec()
        .ok_or(Error::BadSyntax(BadSyntax::ImproperForm))?;
    let (head, args) = match argv.split_first() {
        Some(split) => split,
        None => return Ok(Atom::Nil),
    };
    if let Atom::Symbol(name) = head {
        match &**name {
            "QUOTE" => return special_forms::apply_quote(args),
            "DEFINE" => {
                let result = special_forms::apply_define(args, env, interpreter);
                if let Ok(name) = &result {
                    log::debug!("define {}", name);
                }
                return result;
            }
            "LAMBDA" => return special_forms::apply_lambda(args, env),
            "IF" => return special_forms::apply_if(args, env, interpreter),
            "DEFMACRO" => {
                let result = special_forms::apply_defmacro(args, env);
                if let Ok(name) = &result {
                    log::debug!("define macro {}", name);
                }
                return result;
            }
            // Any other initial symbol will be interpreted as a function call
            // and handled below
            _ => (),
        }
    }

    let callable = EVAL(head, env, interpreter)?;
    if let Atom::Macro(expander) = &callable {
        let expansion = apply_closure(expander, args, interpreter)?;
        log::trace!("macro expansion produced {}", expansion);
        return EVAL(&expansion, env, interpreter);
    }
    let evaluated = evaluate_sequence_elementwise(args, env, interpreter)?;
    apply(&callable, &evaluated, interpreter)
}

pub fn evaluate_sequence_elementwise(
    seq: &[Atom],
    env: &Rc<Environment>,
    interpreter: &Interpreter,
) -> Result<Vec<Atom>> {
    seq.iter().map(|obj| EVAL(obj, env, interpreter)).collect()
}

/// Applies a procedure to arguments that have already been evaluated.
pub fn apply(callable: &Atom, args: &[Atom], interpreter: &Interpreter) -> Result {
    match callable {
        Atom::Builtin(f) => call_builtin(f, args, interpreter),
        Atom::Closure(f) => apply_closure(f, args, interpreter),
        _ => Err(Error::TypeMismatch(TypeMismatch::NotCallable)),
    }
}

pub(crate) fn pretty_print_args(args: &[Atom]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

pub fn call_builtin(func: &Builtin, args: &[Atom], interpreter: &Interpreter) -> Result {
    func.arity.validate_for(args.len(), func.name)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(interpreter, args);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

/// Runs the body of `func` in a fresh frame whose parent is the frame the
/// closure was created in. Macros come through here too, with their
/// arguments unevaluated.
fn apply_closure(func: &Closure, args: &[Atom], interpreter: &Interpreter) -> Result {
    log::trace!("Call {} with {}", func, pretty_print_args(args));
    let env = make_closure_env(func, args)?;
    let mut result = Atom::Nil;
    for form in &func.body {
        result = EVAL(form, &env, interpreter)?;
    }
    Ok(result)
}

fn make_closure_env(func: &Closure, args: &[Atom]) -> Result<Rc<Environment>> {
    func.parameters
        .arity()
        .validate_for(args.len(), "closure")?;
    let env = Environment::spawn_from(&func.parent);

    let (positional, rest) = args.split_at(func.parameters.positional.len());
    for (key, value) in func.parameters.positional.iter().zip(positional) {
        env.set(key.clone(), value.clone());
    }
    if let Some(rest_key) = &func.parameters.others {
        env.set(rest_key.clone(), Atom::wrap_list(rest.to_vec()));
    }
    Ok(env)
}
