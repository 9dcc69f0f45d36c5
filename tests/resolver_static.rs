use weft::{ErrorCode, Interpreter, RuntimeError};

fn run_err(src: &str) -> RuntimeError {
    let mut interp = Interpreter::new();
    interp.run(src).expect_err("program should fail")
}

#[test]
fn static_errors_carry_the_static_code() {
    let err = run_err("return 1;");
    assert_eq!(err.code, Some(ErrorCode::Static));
}

#[test]
fn super_in_a_trait_is_rejected() {
    let err = run_err("trait T { m() { super.m(); } }");
    assert!(err.message.contains("Can't use 'super' in a trait."));
}

#[test]
fn super_outside_a_class_is_rejected() {
    let err = run_err("super.m();");
    assert!(err.message.contains("Can't use 'super' outside of a class."));
}

#[test]
fn super_without_a_superclass_is_rejected() {
    let err = run_err("class C { m() { super.m(); } }");
    assert!(
        err.message
            .contains("Can't use 'super' in a class with no superclass.")
    );
}

#[test]
fn a_class_cannot_inherit_from_itself() {
    let err = run_err("class A < A {}");
    assert!(err.message.contains("A class can't inherit from itself."));
}

#[test]
fn this_outside_a_class_is_rejected() {
    let err = run_err("print this;");
    assert!(err.message.contains("Can't use 'this' outside of a class."));
}

#[test]
fn top_level_return_is_rejected() {
    let err = run_err("return 1;");
    assert!(err.message.contains("Can't return from top-level code."));
}

#[test]
fn returning_a_value_from_init_is_rejected() {
    let err = run_err("class C { init() { return 1; } }");
    assert!(
        err.message
            .contains("Can't return a value from an initializer.")
    );
}

#[test]
fn bare_return_from_init_is_allowed() {
    let mut interp = Interpreter::new();
    interp
        .run("class C { init() { return; } }")
        .expect("bare return in init is legal");
}

#[test]
fn reading_a_local_in_its_own_initializer_is_rejected() {
    let err = run_err("{ var a = a; }");
    assert!(
        err.message
            .contains("Can't read local variable 'a' in its own initializer.")
    );
}

#[test]
fn duplicate_local_declaration_is_rejected() {
    let err = run_err("{ var a = 1; var a = 2; }");
    assert!(
        err.message
            .contains("Already a variable named 'a' in this scope.")
    );
}

#[test]
fn all_static_errors_are_reported_together() {
    let err = run_err("print this;\nreturn 1;");
    assert!(err.message.contains("[line 1]"), "got: {}", err.message);
    assert!(err.message.contains("[line 2]"), "got: {}", err.message);
    assert!(err.message.contains("Can't use 'this' outside of a class."));
    assert!(err.message.contains("Can't return from top-level code."));
}

#[test]
fn nothing_executes_when_a_static_error_exists() {
    let mut interp = Interpreter::new();
    let err = interp
        .run("print \"never\";\nreturn 1;")
        .expect_err("should fail statically");
    assert_eq!(err.code, Some(ErrorCode::Static));
    assert_eq!(interp.output(), "");
}

#[test]
fn error_message_includes_the_line() {
    let err = run_err("var ok = 1;\nprint this;");
    assert!(err.message.contains("[line 2]"), "got: {}", err.message);
}
