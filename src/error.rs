// ABOUTME: Runtime error type and the static-diagnostics sink for scan/parse/resolve failures

use crate::token::{Token, TokenKind};
use std::cell::Cell;
use thiserror::Error;

/// A runtime fault raised during evaluation. Carries the offending token's line so `Display`
/// can render the exact `MESSAGE\n[line N]` wire format the CLI writes to stderr.
#[derive(Error, Debug, Clone)]
#[error("{message}\n[line {line}]")]
pub struct RuntimeError {
    pub message: String,
    pub line: usize,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        RuntimeError {
            message: message.into(),
            line: token.line,
        }
    }

    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        RuntimeError {
            message: message.into(),
            line,
        }
    }
}

/// Owns the "had error" / "had runtime error" state that the source material tracked as
/// process-wide globals, and renders static diagnostics in the spec's exact text format. One
/// instance per run (the CLI creates one per script execution, and resets it between REPL lines).
#[derive(Debug, Default)]
pub struct Diagnostics {
    had_error: Cell<bool>,
    had_runtime_error: Cell<bool>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error.get()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error.get()
    }

    pub fn reset(&self) {
        self.had_error.set(false);
        self.had_runtime_error.set(false);
    }

    pub fn set_runtime_error(&self) {
        self.had_runtime_error.set(true);
    }

    /// Reports a scan-time error with no associated token (e.g. "Unexpected character.").
    pub fn error(&self, line: usize, message: &str) {
        self.report(line, "", message);
    }

    /// Reports a parse/resolve-time error anchored to a specific token.
    pub fn error_token(&self, token: &Token, message: &str) {
        if token.kind == TokenKind::Eof {
            self.report(token.line, " at end", message);
        } else {
            self.report(token.line, &format!(" at '{}'", token.lexeme), message);
        }
    }

    fn report(&self, line: usize, location: &str, message: &str) {
        eprintln!("[line {}] Error{}: {}", line, location, message);
        self.had_error.set(true);
    }
}
