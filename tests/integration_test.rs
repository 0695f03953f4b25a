// ABOUTME: Black-box tests driving the interpreter pipeline through its public API

use rlox::ast::IdGen;
use rlox::error::Diagnostics;
use rlox::eval::Interpreter;
use rlox::{run_source, RunOutcome};
use std::rc::Rc;

fn fresh() -> (IdGen, Interpreter) {
    (IdGen::new(), Interpreter::new(Rc::new(Diagnostics::new())))
}

#[test]
fn arithmetic_operator_precedence() {
    let (ids, mut interpreter) = fresh();
    let outcome = run_source("print 1 + 2 * 3 - 4 / 2;", &ids, &mut interpreter);
    assert!(matches!(outcome, RunOutcome::Ok));
}

#[test]
fn string_concatenation_with_stringified_numbers() {
    let (ids, mut interpreter) = fresh();
    let outcome = run_source(r#"print "total: " + "5";"#, &ids, &mut interpreter);
    assert!(matches!(outcome, RunOutcome::Ok));
}

#[test]
fn lexical_closure_counter_survives_repeated_calls() {
    let (ids, mut interpreter) = fresh();
    let outcome = run_source(
        "fun makeCounter() { \
            var i = 0; \
            fun count() { i = i + 1; return i; } \
            return count; \
         } \
         var counter = makeCounter(); \
         print counter(); \
         print counter(); \
         print counter();",
        &ids,
        &mut interpreter,
    );
    assert!(matches!(outcome, RunOutcome::Ok));
}

#[test]
fn for_loop_desugars_into_a_while_with_increment() {
    let (ids, mut interpreter) = fresh();
    let outcome = run_source("for (var i = 0; i < 3; i = i + 1) print i;", &ids, &mut interpreter);
    assert!(matches!(outcome, RunOutcome::Ok));
}

#[test]
fn reading_a_variable_in_its_own_initializer_is_a_static_error() {
    let (ids, mut interpreter) = fresh();
    let outcome = run_source("{ var a = a; }", &ids, &mut interpreter);
    assert!(matches!(outcome, RunOutcome::StaticError));
}

#[test]
fn adding_a_number_to_a_string_is_a_runtime_type_error() {
    let (ids, mut interpreter) = fresh();
    let outcome = run_source(r#"print 1 + "two";"#, &ids, &mut interpreter);
    assert!(matches!(outcome, RunOutcome::RuntimeError));
}

#[test]
fn inner_scope_shadowing_does_not_leak_to_the_outer_scope() {
    let (ids, mut interpreter) = fresh();
    let outcome = run_source(
        "var a = \"outer\"; { var a = \"inner\"; print a; } print a;",
        &ids,
        &mut interpreter,
    );
    assert!(matches!(outcome, RunOutcome::Ok));
}

#[test]
fn break_exits_only_the_innermost_loop() {
    let (ids, mut interpreter) = fresh();
    let outcome = run_source(
        "var seen = 0; \
         for (var i = 0; i < 5; i = i + 1) { \
             if (i == 2) break; \
             seen = seen + 1; \
         } \
         print seen;",
        &ids,
        &mut interpreter,
    );
    assert!(matches!(outcome, RunOutcome::Ok));
}

#[test]
fn break_outside_any_loop_is_rejected_statically() {
    let (ids, mut interpreter) = fresh();
    let outcome = run_source("break;", &ids, &mut interpreter);
    assert!(matches!(outcome, RunOutcome::StaticError));
}

#[test]
fn repl_style_calls_accumulate_state_across_lines() {
    let (ids, mut interpreter) = fresh();
    assert!(matches!(
        run_source("var total = 0;", &ids, &mut interpreter),
        RunOutcome::Ok
    ));
    assert!(matches!(
        run_source("total = total + 1;", &ids, &mut interpreter),
        RunOutcome::Ok
    ));
    assert!(matches!(
        run_source("print total;", &ids, &mut interpreter),
        RunOutcome::Ok
    ));
}
