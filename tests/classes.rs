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
fn init_receives_arguments_and_sets_fields() {
    let src = r#"
        class Point {
            init(x, y) {
                this.x = x;
                this.y = y;
            }
        }
        var p = Point(3, 4);
        print p.x;
        print p.y;
    "#;
    assert_eq!(run_ok(src), "3\n4\n");
}

#[test]
fn class_without_init_takes_no_arguments() {
    let msg = run_err("class C {} C(1);");
    assert_eq!(msg, "Expected 0 arguments but got 1.");
}

#[test]
fn instance_and_class_display() {
    let src = r#"
        class Widget {}
        print Widget;
        print Widget();
    "#;
    assert_eq!(run_ok(src), "Widget\nWidget instance\n");
}

#[test]
fn methods_read_and_write_fields() {
    let src = r#"
        class Counter {
            init() { this.n = 0; }
            bump() { this.n = this.n + 1; }
        }
        var c = Counter();
        c.bump();
        c.bump();
        print c.n;
    "#;
    assert_eq!(run_ok(src), "2\n");
}

#[test]
fn field_shadows_method_of_same_name() {
    let src = r#"
        class C {
            init() { this.m = "field"; }
            m() { return "method"; }
        }
        print C().m;
    "#;
    assert_eq!(run_ok(src), "field\n");
}

#[test]
fn calling_init_again_returns_the_receiver() {
    let src = r#"
        class C {
            init(n) { this.n = n; }
        }
        var c = C(1);
        print c.init(2) == c;
        print c.n;
    "#;
    assert_eq!(run_ok(src), "true\n2\n");
}

#[test]
fn bare_return_in_init_still_yields_the_instance() {
    let src = r#"
        class Guarded {
            init(n) {
                if n < 0 {
                    return;
                }
                this.n = n;
            }
        }
        print Guarded(-1);
        print Guarded(5).n;
    "#;
    assert_eq!(run_ok(src), "Guarded instance\n5\n");
}

#[test]
fn methods_are_inherited() {
    let src = r#"
        class Animal {
            speak() { print "..."; }
        }
        class Cat < Animal {}
        Cat().speak();
    "#;
    assert_eq!(run_ok(src), "...\n");
}

#[test]
fn subclass_method_overrides_superclass_method() {
    let src = r#"
        class A { m() { print "A"; } }
        class B < A { m() { print "B"; } }
        B().m();
    "#;
    assert_eq!(run_ok(src), "B\n");
}

#[test]
fn trait_method_wins_over_superclass_method() {
    // The flattened table is searched before the superclass chain, so a
    // composed trait method shadows an inherited one.
    let src = r#"
        class Base { m() { print "base"; } }
        trait T { m() { print "trait"; } }
        class C < Base with T {}
        C().m();
    "#;
    assert_eq!(run_ok(src), "trait\n");
}

#[test]
fn super_calls_the_overridden_method() {
    let src = r#"
        class A {
            m() { print "A.m"; }
        }
        class B < A {
            m() {
                super.m();
                print "B.m";
            }
        }
        B().m();
    "#;
    assert_eq!(run_ok(src), "A.m\nB.m\n");
}

#[test]
fn super_resolves_against_the_declaring_class() {
    // Lookup starts at the superclass of the class that lexically declared
    // the method, not at the receiver's class.
    let src = r#"
        class A { method() { print "A"; } }
        class B < A {
            method() { print "B"; }
            test() { super.method(); }
        }
        class C < B {}
        C().test();
    "#;
    assert_eq!(run_ok(src), "A\n");
}

#[test]
fn init_is_inherited_through_the_chain() {
    let src = r#"
        class A {
            init() { this.x = 1; }
        }
        class B < A {}
        print B().x;
    "#;
    assert_eq!(run_ok(src), "1\n");
}

#[test]
fn undefined_method_on_superclass_errors() {
    let src = r#"
        class A {}
        class B < A {
            m() { super.ghost(); }
        }
        B().m();
    "#;
    let msg = run_err(src);
    assert_eq!(msg, "Undefined method 'ghost' on superclass of B.");
}

#[test]
fn undefined_property_errors() {
    let msg = run_err("class C {} C().missing;");
    assert_eq!(msg, "Undefined property 'missing' on C instance.");
}

#[test]
fn property_access_on_non_instance_errors() {
    let msg = run_err("class C {} C.m;");
    assert_eq!(msg, "Only instances have properties, got class.");
}

#[test]
fn field_assignment_on_non_instance_errors() {
    let msg = run_err("var x = 1; x.f = 2;");
    assert_eq!(msg, "Only instances have fields, got number.");
}

#[test]
fn superclass_must_be_a_class() {
    let msg = run_err("var B = 7; class C < B {}");
    assert!(msg.contains("Superclass must be a class"), "got: {}", msg);
}

#[test]
fn bound_methods_are_first_class() {
    let src = r#"
        class Greeter {
            init(name) { this.name = name; }
            greet() { print "hi " + this.name; }
        }
        var g = Greeter("bob").greet;
        g();
    "#;
    assert_eq!(run_ok(src), "hi bob\n");
}
