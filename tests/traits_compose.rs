use weft::Interpreter;

fn run_ok(src: &str) -> String {
    let mut interp = Interpreter::new();
    interp.run(src).expect("program should run")
}

#[test]
fn composed_methods_are_all_callable() {
    let src = r#"
        trait T1 { a() { print "a"; } }
        trait T2 { b() { print "b"; } }
        class C with T1, T2 {}
        var c = C();
        c.a();
        c.b();
    "#;
    assert_eq!(run_ok(src), "a\nb\n");
}

#[test]
fn trait_methods_mix_with_own_methods() {
    let src = r#"
        trait Greet { hello() { print "hello " + this.name; } }
        class Person with Greet {
            init(name) { this.name = name; }
        }
        Person("ada").hello();
    "#;
    assert_eq!(run_ok(src), "hello ada\n");
}

#[test]
fn transitive_composition_flattens() {
    // A trait composed from other traits carries all of their methods into
    // any class that includes it.
    let src = r#"
        trait B1 { b1() { print "b1"; } }
        trait B2 { b2() { print "b2"; } }
        trait B with B1, B2 { b() { print "b"; } }
        class C with B {}
        var c = C();
        c.b1();
        c.b2();
        c.b();
    "#;
    assert_eq!(run_ok(src), "b1\nb2\nb\n");
}

#[test]
fn trait_method_dispatches_on_this() {
    // A trait method calls sibling methods through the receiver without
    // knowing which composed source provides them.
    let src = r#"
        trait Loud { shout() { print this.word() + "!"; } }
        class Dog with Loud {
            word() { return "woof"; }
        }
        Dog().shout();
    "#;
    assert_eq!(run_ok(src), "woof!\n");
}

#[test]
fn worked_example_end_to_end() {
    let src = r#"
        trait A { a() { print "A.a"; } }
        trait B1 { b1() { print "B1.b1"; } }
        trait B2 { b2() { print "B2.b2"; } }
        trait B with B1, B2 {
            b() {
                this.b1();
                this.b2();
            }
        }
        class C with A, B {}
        var c = C();
        c.a();
        c.b();
    "#;
    assert_eq!(run_ok(src), "A.a\nB1.b1\nB2.b2\n");
}

#[test]
fn trait_reference_can_be_a_variable() {
    // With-clause references are evaluated as ordinary expressions, so a
    // variable holding a trait value works.
    let src = r#"
        trait Greet { hello() { print "hi"; } }
        var G = Greet;
        class C with G {}
        C().hello();
    "#;
    assert_eq!(run_ok(src), "hi\n");
}

#[test]
fn trait_init_acts_as_constructor_when_composed() {
    // A trait-supplied `init` participates in construction through the
    // class's flattened table.
    let src = r#"
        trait Boot { init() { this.ready = true; } }
        class Server with Boot {}
        print Server().ready;
    "#;
    assert_eq!(run_ok(src), "true\n");
}

#[test]
fn composition_does_not_mutate_the_source_trait() {
    // Two classes including the same trait each get their own table; the
    // trait keeps working for later inclusions.
    let src = r#"
        trait T { m() { print "t"; } }
        class A with T { extra() { print "a"; } }
        class B with T {}
        A().m();
        B().m();
        A().extra();
    "#;
    assert_eq!(run_ok(src), "t\nt\na\n");
}

#[test]
fn trait_value_prints_with_its_name() {
    let src = r#"
        trait T {}
        print T;
    "#;
    assert_eq!(run_ok(src), "<trait T>\n");
}
