use tiny_lisp::Interpreter;

fn eval(interpreter: &Interpreter, text: &str) -> String {
    match interpreter.rep(text) {
        Ok(value) => value.to_string(),
        Err(e) => panic!("evaluating {} failed: {}", text, e),
    }
}

fn interpreter() -> Interpreter {
    match Interpreter::with_prelude() {
        Ok(interpreter) => interpreter,
        Err(e) => panic!("prelude failed to load: {}", e),
    }
}

#[test]
fn list_is_variadic() {
    let interpreter = interpreter();
    assert_eq!(eval(&interpreter, "(list)"), "NIL");
    assert_eq!(eval(&interpreter, "(list 1 (+ 1 1) 'c)"), "(1 2 C)");
}

#[test]
fn macro_built_with_list_reexpands_per_call() {
    let interpreter = interpreter();
    eval(&interpreter, "(defmacro (m x) (list 'quote x))");
    assert_eq!(eval(&interpreter, "(m a)"), "A");
    assert_eq!(eval(&interpreter, "(m b)"), "B");
    eval(&interpreter, "(define (g y) (m y))");
    assert_eq!(eval(&interpreter, "(g 1)"), "Y");
}

#[test]
fn logic_and_comparisons() {
    let interpreter = interpreter();
    assert_eq!(eval(&interpreter, "(not nil)"), "T");
    assert_eq!(eval(&interpreter, "(not 1)"), "NIL");
    assert_eq!(eval(&interpreter, "(> 3 2)"), "T");
    assert_eq!(eval(&interpreter, "(<= 2 2)"), "T");
    assert_eq!(eval(&interpreter, "(>= 1 2)"), "NIL");
    assert_eq!(eval(&interpreter, "(abs -7)"), "7");
}

#[test]
fn list_functions() {
    let interpreter = interpreter();
    assert_eq!(eval(&interpreter, "(foldl + 0 (list 1 2 3 4))"), "10");
    assert_eq!(eval(&interpreter, "(reverse (list 1 2 3))"), "(3 2 1)");
    assert_eq!(eval(&interpreter, "(append (list 1 2) (list 3))"), "(1 2 3)");
    assert_eq!(
        eval(&interpreter, "(map (lambda (x) (* x x)) (list 1 2 3))"),
        "(1 4 9)"
    );
}
