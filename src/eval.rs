// ABOUTME: Tree-walking evaluator executing a resolved program against an environment chain

use crate::ast::{Expr, NodeId, Stmt};
use crate::env::Environment;
use crate::error::{Diagnostics, RuntimeError};
use crate::token::{Token, TokenKind};
use crate::value::{Callable, LoxFunction, NativeFunction, Value};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// The outcome of executing a statement: ordinary fallthrough, an in-flight `break`, or an
/// in-flight `return` carrying its value. Neither variant is an error; they are control-flow
/// unwinds threaded explicitly through `Result::Ok` rather than raised as `RuntimeError`s.
enum Signal {
    Normal,
    Break,
    Return(Value),
}

pub struct Interpreter {
    globals: Rc<Environment>,
    environment: Rc<Environment>,
    locals: HashMap<NodeId, usize>,
    diagnostics: Rc<Diagnostics>,
}

impl Interpreter {
    pub fn new(diagnostics: Rc<Diagnostics>) -> Self {
        let globals = Environment::new();
        define_natives(&globals);
        Interpreter {
            globals: globals.clone(),
            environment: globals,
            locals: HashMap::new(),
            diagnostics,
        }
    }

    /// Merges newly resolved node ids into the running side-table. REPL lines resolve
    /// independently of one another, so this is additive rather than a replace.
    pub fn load_resolution(&mut self, locals: HashMap<NodeId, usize>) {
        self.locals.extend(locals);
    }

    /// The `Diagnostics` sink this interpreter reports runtime faults onto. Callers driving the
    /// scan/parse/resolve stages ahead of `interpret` must reuse this same instance so both
    /// error channels agree on "had error"/"had runtime error".
    pub fn diagnostics(&self) -> &Rc<Diagnostics> {
        &self.diagnostics
    }

    pub fn interpret(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            if let Err(err) = self.execute(stmt) {
                self.diagnostics.set_runtime_error();
                eprintln!("{}", err);
                return;
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Signal, RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Signal::Normal)
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                println!("{}", value.stringify());
                Ok(Signal::Normal)
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(name.lexeme.clone(), value);
                Ok(Signal::Normal)
            }
            Stmt::Block(body) => {
                let previous = Rc::clone(&self.environment);
                self.environment = Environment::with_parent(previous.clone());
                let result = self.execute_block(body);
                self.environment = previous;
                result
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Signal::Normal)
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body)? {
                        Signal::Normal => {}
                        Signal::Break => break,
                        ret @ Signal::Return(_) => return Ok(ret),
                    }
                }
                Ok(Signal::Normal)
            }
            Stmt::Break(_) => Ok(Signal::Break),
            Stmt::Function(decl) => {
                let function = Value::Callable(Rc::new(Callable::Function(LoxFunction {
                    declaration: Rc::clone(decl),
                    closure: Rc::clone(&self.environment),
                })));
                self.environment.define(decl.name.lexeme.clone(), function);
                Ok(Signal::Normal)
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Ok(Signal::Return(value))
            }
        }
    }

    /// Runs every statement in `body` under the current (already-swapped-in) environment,
    /// guaranteeing the caller's environment is restored by `execute`'s `Block` arm even if a
    /// statement here returns early or propagates a runtime error.
    fn execute_block(&mut self, body: &[Stmt]) -> Result<Signal, RuntimeError> {
        for stmt in body {
            match self.execute(stmt)? {
                Signal::Normal => {}
                signal => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::Variable { id, name } => self.look_up_variable(*id, name),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(distance) => self.environment.assign_at(*distance, &name.lexeme, value.clone()),
                    None => self.globals.assign(name, value.clone())?,
                }
                Ok(value)
            }
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match operator.kind {
                    TokenKind::Minus => Ok(Value::Number(-expect_unary_number(operator, &right)?)),
                    TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
                    _ => unreachable!("parser only produces Minus/Bang as unary operators"),
                }
            }
            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                match operator.kind {
                    TokenKind::Or if left.is_truthy() => Ok(left),
                    TokenKind::And if !left.is_truthy() => Ok(left),
                    _ => self.evaluate(right),
                }
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(operator, left, right),
            Expr::Call {
                callee,
                paren,
                arguments,
            } => self.evaluate_call(callee, paren, arguments),
        }
    }

    fn look_up_variable(&self, id: NodeId, name: &Token) -> Result<Value, RuntimeError> {
        match self.locals.get(&id) {
            Some(distance) => Ok(self.environment.get_at(*distance, &name.lexeme)),
            None => self.globals.get(name),
        }
    }

    fn evaluate_binary(
        &mut self,
        operator: &Token,
        left: &Expr,
        right: &Expr,
    ) -> Result<Value, RuntimeError> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match operator.kind {
            TokenKind::Minus => Ok(Value::Number(
                expect_number(operator, &left)? - expect_number(operator, &right)?,
            )),
            TokenKind::Slash => Ok(Value::Number(
                expect_number(operator, &left)? / expect_number(operator, &right)?,
            )),
            TokenKind::Star => Ok(Value::Number(
                expect_number(operator, &left)? * expect_number(operator, &right)?,
            )),
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                _ => Err(RuntimeError::new(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            },
            TokenKind::Greater => Ok(Value::Bool(
                expect_number(operator, &left)? > expect_number(operator, &right)?,
            )),
            TokenKind::GreaterEqual => Ok(Value::Bool(
                expect_number(operator, &left)? >= expect_number(operator, &right)?,
            )),
            TokenKind::Less => Ok(Value::Bool(
                expect_number(operator, &left)? < expect_number(operator, &right)?,
            )),
            TokenKind::LessEqual => Ok(Value::Bool(
                expect_number(operator, &left)? <= expect_number(operator, &right)?,
            )),
            TokenKind::BangEqual => Ok(Value::Bool(!left.is_equal(&right))),
            TokenKind::EqualEqual => Ok(Value::Bool(left.is_equal(&right))),
            _ => unreachable!("parser only produces arithmetic/comparison/equality operators here"),
        }
    }

    fn evaluate_call(
        &mut self,
        callee: &Expr,
        paren: &Token,
        arguments: &[Expr],
    ) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(callee)?;

        let mut args = Vec::with_capacity(arguments.len());
        for arg in arguments {
            args.push(self.evaluate(arg)?);
        }

        let callable = match &callee {
            Value::Callable(callable) => callable,
            _ => return Err(RuntimeError::new(paren, "Can only call functions and classes.")),
        };

        if args.len() != callable.arity() {
            return Err(RuntimeError::new(
                paren,
                format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    args.len()
                ),
            ));
        }

        match callable.as_ref() {
            Callable::Native(native) => (native.func)(&args),
            Callable::Function(function) => self.call_function(function, args),
        }
    }

    fn call_function(&mut self, function: &LoxFunction, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let call_env = Environment::with_parent(Rc::clone(&function.closure));
        for (param, arg) in function.declaration.params.iter().zip(args) {
            call_env.define(param.lexeme.clone(), arg);
        }

        let previous = std::mem::replace(&mut self.environment, call_env);
        let result = self.execute_block(&function.declaration.body);
        self.environment = previous;

        match result? {
            Signal::Return(value) => Ok(value),
            Signal::Normal | Signal::Break => Ok(Value::Nil),
        }
    }
}

/// Used by binary arithmetic/comparison operators, which report the plural form since both
/// operands are checked.
fn expect_number(operator: &Token, value: &Value) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::new(operator, "Operands must be numbers.")),
    }
}

/// Used by unary `-`, which has exactly one operand to complain about.
fn expect_unary_number(operator: &Token, value: &Value) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::new(operator, "Operand must be a number.")),
    }
}

fn define_natives(globals: &Rc<Environment>) {
    globals.define(
        "clock".to_string(),
        Value::Callable(Rc::new(Callable::Native(NativeFunction {
            name: "clock",
            arity: 0,
            func: |_args| {
                let seconds = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .expect("system clock is after the Unix epoch")
                    .as_secs_f64();
                Ok(Value::Number(seconds.floor()))
            },
        }))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::IdGen;
    use crate::parser::parse;
    use crate::resolver::resolve;
    use crate::scanner::Scanner;

    fn run(source: &str) -> Rc<Diagnostics> {
        let diagnostics = Rc::new(Diagnostics::new());
        let tokens = Scanner::new(source, &diagnostics).scan_tokens();
        let ids = IdGen::new();
        let statements = parse(&tokens, &diagnostics, &ids);
        let locals = resolve(&statements, &diagnostics);
        let mut interpreter = Interpreter::new(diagnostics.clone());
        interpreter.load_resolution(locals);
        interpreter.interpret(&statements);
        diagnostics
    }

    #[test]
    fn arithmetic_respects_precedence() {
        let diagnostics = run("print 1 + 2 * 3;");
        assert!(!diagnostics.had_runtime_error());
    }

    #[test]
    fn string_concatenation_with_plus() {
        let diagnostics = run(r#"print "a" + "b";"#);
        assert!(!diagnostics.had_runtime_error());
    }

    #[test]
    fn adding_number_and_string_is_a_runtime_error() {
        let diagnostics = run(r#"print 1 + "a";"#);
        assert!(diagnostics.had_runtime_error());
    }

    #[test]
    fn undefined_variable_is_a_runtime_error() {
        let diagnostics = run("print nope;");
        assert!(diagnostics.had_runtime_error());
    }

    #[test]
    fn while_with_break_terminates() {
        let diagnostics = run("var i = 0; while (true) { i = i + 1; if (i == 3) break; } print i;");
        assert!(!diagnostics.had_runtime_error());
    }

    #[test]
    fn closures_capture_environment_by_reference() {
        let diagnostics = run(
            "fun makeCounter() { var i = 0; fun count() { i = i + 1; return i; } return count; } \
             var counter = makeCounter(); print counter(); print counter();",
        );
        assert!(!diagnostics.had_runtime_error());
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        let diagnostics = run("var x = 1; x();");
        assert!(diagnostics.had_runtime_error());
    }

    #[test]
    fn wrong_arity_is_a_runtime_error() {
        let diagnostics = run("fun f(a, b) { return a + b; } f(1);");
        assert!(diagnostics.had_runtime_error());
    }

    #[test]
    fn block_scoping_restores_outer_environment() {
        let diagnostics = run("var x = 1; { var x = 2; } print x;");
        assert!(!diagnostics.had_runtime_error());
    }
}
