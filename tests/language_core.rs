use weft::Interpreter;

fn run_ok(src: &str) -> String {
    let mut interp = Interpreter::new();
    interp.run(src).expect("program should run")
}

fn run_err(src: &str) -> String {
    let mut interp = Interpreter::new();
    interp.run(src).expect_err("program should fail").message
}

#[test]
fn arithmetic_and_precedence() {
    assert_eq!(run_ok("print 1 + 2 * 3;"), "7\n");
    assert_eq!(run_ok("print (1 + 2) * 3;"), "9\n");
    assert_eq!(run_ok("print 10 - 4 / 2;"), "8\n");
    assert_eq!(run_ok("print -3 + 5;"), "2\n");
}

#[test]
fn number_display_drops_whole_fraction() {
    assert_eq!(run_ok("print 10 / 4;"), "2.5\n");
    assert_eq!(run_ok("print 4 / 2;"), "2\n");
}

#[test]
fn string_concatenation() {
    assert_eq!(run_ok(r#"print "foo" + "bar";"#), "foobar\n");
}

#[test]
fn comparison_and_equality() {
    assert_eq!(run_ok("print 1 < 2;"), "true\n");
    assert_eq!(run_ok("print 2 <= 1;"), "false\n");
    assert_eq!(run_ok(r#"print "a" == "a";"#), "true\n");
    assert_eq!(run_ok(r#"print 1 == "1";"#), "false\n");
    assert_eq!(run_ok("print nil == nil;"), "true\n");
    assert_eq!(run_ok("print 1 != 2;"), "true\n");
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(run_ok(r#"print nil or "ok";"#), "ok\n");
    assert_eq!(run_ok("print false and 1;"), "false\n");
    assert_eq!(run_ok("print true and 1;"), "1\n");
}

#[test]
fn truthiness() {
    assert_eq!(run_ok("print !nil;"), "true\n");
    assert_eq!(run_ok("print !0;"), "false\n");
    assert_eq!(run_ok(r#"print !"";"#), "false\n");
}

#[test]
fn var_without_initializer_is_nil() {
    assert_eq!(run_ok("var x; print x;"), "nil\n");
}

#[test]
fn block_scoping_and_shadowing() {
    let src = r#"
        var a = "outer";
        {
            var a = "inner";
            print a;
        }
        print a;
    "#;
    assert_eq!(run_ok(src), "inner\nouter\n");
}

#[test]
fn if_else_chain() {
    let src = r#"
        var n = 2;
        if n == 1 {
            print "one";
        } else if n == 2 {
            print "two";
        } else {
            print "many";
        }
    "#;
    assert_eq!(run_ok(src), "two\n");
}

#[test]
fn while_loop() {
    let src = r#"
        var i = 0;
        while i < 3 {
            print i;
            i = i + 1;
        }
    "#;
    assert_eq!(run_ok(src), "0\n1\n2\n");
}

#[test]
fn functions_and_return() {
    let src = r#"
        fun add(a, b) {
            return a + b;
        }
        print add(1, 2);
    "#;
    assert_eq!(run_ok(src), "3\n");
}

#[test]
fn function_without_return_yields_nil() {
    assert_eq!(run_ok("fun noop() {} print noop();"), "nil\n");
}

#[test]
fn recursion() {
    let src = r#"
        fun fib(n) {
            if n < 2 {
                return n;
            }
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
    "#;
    assert_eq!(run_ok(src), "55\n");
}

#[test]
fn closures_capture_mutable_state() {
    let src = r#"
        fun make_counter() {
            var i = 0;
            fun inc() {
                i = i + 1;
                print i;
            }
            return inc;
        }
        var count = make_counter();
        count();
        count();
    "#;
    assert_eq!(run_ok(src), "1\n2\n");
}

#[test]
fn assignment_is_an_expression() {
    assert_eq!(run_ok("var a = 1; var b = a = 5; print a; print b;"), "5\n5\n");
}

#[test]
fn native_clock_returns_a_number() {
    assert_eq!(run_ok("print clock() > 0;"), "true\n");
}

#[test]
fn undefined_variable_error() {
    assert_eq!(run_err("print ghost;"), "Undefined variable 'ghost'.");
}

#[test]
fn plus_type_error() {
    let msg = run_err(r#"print 1 + "one";"#);
    assert!(msg.contains("Operands of '+' must be two numbers or two strings"));
    assert!(msg.contains("number and string"));
}

#[test]
fn comparison_type_error() {
    let msg = run_err(r#"print 1 < "two";"#);
    assert!(msg.contains("Operands must be numbers"));
}

#[test]
fn arity_mismatch_error() {
    let msg = run_err("fun two(a, b) {} two(1);");
    assert_eq!(msg, "Expected 2 arguments but got 1.");
}

#[test]
fn calling_a_non_callable_errors() {
    let msg = run_err(r#""text"();"#);
    assert!(msg.contains("Can only call functions and classes"));
}

#[test]
fn parse_error_has_location() {
    let mut interp = Interpreter::new();
    let err = interp.run("var x = ;").expect_err("should fail");
    assert!(err.code.is_some_and(|c| c.is_parse()));
    assert_eq!(err.line, Some(1));
}
