// ABOUTME: Library module exposing the interpreter pipeline for the CLI and integration tests

pub mod ast;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod highlighter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod token;
pub mod value;

use ast::IdGen;
use eval::Interpreter;

/// Outcome of a single `run_source` call, mirroring the exit-code decision the CLI makes.
pub enum RunOutcome {
    Ok,
    StaticError,
    RuntimeError,
}

/// Scans, parses, resolves and interprets one chunk of source against an existing interpreter,
/// sharing a process-wide `IdGen`, the interpreter's accumulated global state, and its
/// `Diagnostics` sink — `interpreter.diagnostics()` is reset at the top of each call (so a
/// previous REPL line's errors don't leak into this one) and then reused across scan, parse,
/// resolve, and interpret, since `interpret` reports runtime faults onto that same instance.
pub fn run_source(source: &str, ids: &IdGen, interpreter: &mut Interpreter) -> RunOutcome {
    let diagnostics = interpreter.diagnostics().clone();
    diagnostics.reset();

    let tokens = scanner::Scanner::new(source, &diagnostics).scan_tokens();
    let statements = parser::parse(&tokens, &diagnostics, ids);
    if diagnostics.had_error() {
        return RunOutcome::StaticError;
    }

    let locals = resolver::resolve(&statements, &diagnostics);
    if diagnostics.had_error() {
        return RunOutcome::StaticError;
    }

    interpreter.load_resolution(locals);
    interpreter.interpret(&statements);
    if diagnostics.had_runtime_error() {
        return RunOutcome::RuntimeError;
    }

    RunOutcome::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostics;
    use std::rc::Rc;

    fn fresh_interpreter() -> (IdGen, Interpreter) {
        let ids = IdGen::new();
        let interpreter = Interpreter::new(Rc::new(Diagnostics::new()));
        (ids, interpreter)
    }

    #[test]
    fn arithmetic_precedence_example() {
        let (ids, mut interpreter) = fresh_interpreter();
        let outcome = run_source("print 1 + 2 * 3 - 4 / 2;", &ids, &mut interpreter);
        assert!(matches!(outcome, RunOutcome::Ok));
    }

    #[test]
    fn string_concatenation_and_stringify_example() {
        let (ids, mut interpreter) = fresh_interpreter();
        let outcome = run_source(r#"print "count: " + 3;"#, &ids, &mut interpreter);
        // `+` only accepts two numbers or two strings, so mixing yields a runtime error.
        assert!(matches!(outcome, RunOutcome::RuntimeError));
    }

    #[test]
    fn lexical_closure_counter_increments_across_calls() {
        let (ids, mut interpreter) = fresh_interpreter();
        let outcome = run_source(
            "fun makeCounter() { var i = 0; fun count() { i = i + 1; return i; } return count; } \
             var counter = makeCounter(); print counter(); print counter(); print counter();",
            &ids,
            &mut interpreter,
        );
        assert!(matches!(outcome, RunOutcome::Ok));
    }

    #[test]
    fn for_loop_desugaring_prints_zero_one_two() {
        let (ids, mut interpreter) = fresh_interpreter();
        let outcome = run_source(
            "for (var i = 0; i < 3; i = i + 1) { print i; }",
            &ids,
            &mut interpreter,
        );
        assert!(matches!(outcome, RunOutcome::Ok));
    }

    #[test]
    fn self_referencing_initializer_is_a_static_error() {
        let (ids, mut interpreter) = fresh_interpreter();
        let outcome = run_source("{ var a = a; }", &ids, &mut interpreter);
        assert!(matches!(outcome, RunOutcome::StaticError));
    }

    #[test]
    fn adding_number_and_string_is_a_runtime_error() {
        let (ids, mut interpreter) = fresh_interpreter();
        let outcome = run_source(r#"print 1 + "a";"#, &ids, &mut interpreter);
        assert!(matches!(outcome, RunOutcome::RuntimeError));
    }

    #[test]
    fn scope_shadowing_does_not_leak_outward() {
        let (ids, mut interpreter) = fresh_interpreter();
        let outcome = run_source("var a = 1; { var a = 2; } print a;", &ids, &mut interpreter);
        assert!(matches!(outcome, RunOutcome::Ok));
    }

    #[test]
    fn break_exits_the_enclosing_loop() {
        let (ids, mut interpreter) = fresh_interpreter();
        let outcome = run_source(
            "var i = 0; while (true) { if (i == 2) break; i = i + 1; } print i;",
            &ids,
            &mut interpreter,
        );
        assert!(matches!(outcome, RunOutcome::Ok));
    }

    #[test]
    fn repl_style_two_calls_share_the_same_id_gen_and_globals() {
        let (ids, mut interpreter) = fresh_interpreter();
        assert!(matches!(
            run_source("var x = 1;", &ids, &mut interpreter),
            RunOutcome::Ok
        ));
        assert!(matches!(
            run_source("print x;", &ids, &mut interpreter),
            RunOutcome::Ok
        ));
    }
}
