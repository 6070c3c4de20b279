use crate::evaluator;
use crate::interpreter::Interpreter;
use crate::types::{cons, Arity, Atom, Builtin, Int, TypeMismatch};

fn grab_ints(args: &[Atom]) -> evaluator::Result<Vec<Int>> {
    let type_check: Result<Vec<_>, _> = args.iter().map(|o| o.as_int()).collect();
    type_check.map_err(evaluator::Error::TypeMismatch)
}

// Arity has already been checked by the caller, so `args` has exactly two
// entries here.
fn grab_two_ints(args: &[Atom]) -> evaluator::Result<(Int, Int)> {
    match grab_ints(args)?.as_slice() {
        &[x, y] => Ok((x, y)),
        _ => Err(evaluator::Error::TypeMismatch(TypeMismatch::NotAnInt)),
    }
}

const CAR: Builtin = Builtin {
    name: "CAR",
    fn_ptr: car_,
    arity: Arity::exactly(1),
};

fn car_(_: &Interpreter, args: &[Atom]) -> evaluator::Result {
    match &args[0] {
        Atom::Nil => Ok(Atom::Nil),
        Atom::Pair(cell) => Ok(cell.car()),
        _ => Err(evaluator::Error::TypeMismatch(TypeMismatch::NotAPair)),
    }
}

const CDR: Builtin = Builtin {
    name: "CDR",
    fn_ptr: cdr_,
    arity: Arity::exactly(1),
};

fn cdr_(_: &Interpreter, args: &[Atom]) -> evaluator::Result {
    match &args[0] {
        Atom::Nil => Ok(Atom::Nil),
        Atom::Pair(cell) => Ok(cell.cdr()),
        _ => Err(evaluator::Error::TypeMismatch(TypeMismatch::NotAPair)),
    }
}

const CONS: Builtin = Builtin {
    name: "CONS",
    fn_ptr: cons_,
    arity: Arity::exactly(2),
};

fn cons_(_: &Interpreter, args: &[Atom]) -> evaluator::Result {
    Ok(cons(args[0].clone(), args[1].clone()))
}

const SUM: Builtin = Builtin {
    name: "+",
    fn_ptr: sum_,
    arity: Arity::exactly(2),
};

fn sum_(_: &Interpreter, args: &[Atom]) -> evaluator::Result {
    let (x, y) = grab_two_ints(args)?;
    Ok(Atom::Integer(x.wrapping_add(y)))
}

const SUB: Builtin = Builtin {
    name: "-",
    fn_ptr: sub_,
    arity: Arity::exactly(2),
};

fn sub_(_: &Interpreter, args: &[Atom]) -> evaluator::Result {
    let (x, y) = grab_two_ints(args)?;
    Ok(Atom::Integer(x.wrapping_sub(y)))
}

const MUL: Builtin = Builtin {
    name: "*",
    fn_ptr: mul_,
    arity: Arity::exactly(2),
};

fn mul_(_: &Interpreter, args: &[Atom]) -> evaluator::Result {
    let (x, y) = grab_two_ints(args)?;
    Ok(Atom::Integer(x.wrapping_mul(y)))
}

const DIV: Builtin = Builtin {
    name: "/",
    fn_ptr: div_,
    arity: Arity::exactly(2),
};

fn div_(_: &Interpreter, args: &[Atom]) -> evaluator::Result {
    match grab_two_ints(args)? {
        (_, 0) => Err(evaluator::Error::DivideByZero),
        (x, y) => Ok(Atom::Integer(x.wrapping_div(y))),
    }
}

fn comparison_(
    interpreter: &Interpreter,
    args: &[Atom],
    comp: fn(&Int, &Int) -> bool,
) -> evaluator::Result {
    let (x, y) = grab_two_ints(args)?;
    Ok(interpreter.truth(comp(&x, &y)))
}

macro_rules! comparison_primitive {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            const $NAME: Builtin = Builtin {
                name: stringify!($SYMBOL),
                fn_ptr: |interpreter: &Interpreter, args: &[Atom]| {
                    comparison_(interpreter, args, Int:: [<$NAME:lower>])
                },
                arity: Arity::exactly(2),
            };
        }
    };
}

comparison_primitive!(=, EQ);
comparison_primitive!(<, LT);

const IDENTICAL: Builtin = Builtin {
    name: "EQ?",
    fn_ptr: identical_,
    arity: Arity::exactly(2),
};

fn identical_(interpreter: &Interpreter, args: &[Atom]) -> evaluator::Result {
    Ok(interpreter.truth(args[0].is(&args[1])))
}

const PAIR_TEST: Builtin = Builtin {
    name: "PAIR?",
    fn_ptr: pair_test_,
    arity: Arity::exactly(1),
};

fn pair_test_(interpreter: &Interpreter, args: &[Atom]) -> evaluator::Result {
    Ok(interpreter.truth(args[0].is_pair()))
}

const APPLY: Builtin = Builtin {
    name: "APPLY",
    fn_ptr: apply_,
    arity: Arity::exactly(2),
};

fn apply_(interpreter: &Interpreter, args: &[Atom]) -> evaluator::Result {
    let arguments = args[1]
        .to_vec()
        .ok_or(evaluator::Error::TypeMismatch(TypeMismatch::NotAList))?;
    evaluator::apply(&args[0], &arguments, interpreter)
}

pub static CORE: &[&Builtin] = &[
    // Working with pairs
    &CAR,
    &CDR,
    &CONS,
    // Arithmetic
    &SUM,
    &SUB,
    &MUL,
    &DIV,
    // Comparisons
    &EQ,
    &LT,
    // Testing
    &IDENTICAL,
    &PAIR_TEST,
    // Other
    &APPLY,
];
