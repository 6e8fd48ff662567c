//! A calculator, a billing routine that depends on it, and a hand-written
//! test double showing the wrapper side of `method-stub`.

use method_stub::{args, MethodTable, MockEngine, Mocked, Subject};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,
}

/// What the billing code needs from a calculator.
pub trait Arithmetic {
    fn add(&self, a: i64, b: i64) -> i64;
    fn divide(&self, a: i64, b: i64) -> Result<i64, CalcError>;
    fn clear(&self);
}

#[derive(Default)]
pub struct Calculator {
    tape: Mutex<Vec<i64>>,
}

impl Calculator {
    pub fn add(&self, a: i64, b: i64) -> i64 {
        let sum = a + b;
        self.push(sum);
        sum
    }

    pub fn divide(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        if b == 0 {
            return Err(CalcError::DivisionByZero);
        }
        let quotient = a / b;
        self.push(quotient);
        Ok(quotient)
    }

    pub fn clear(&self) {
        self.tape.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn tape(&self) -> Vec<i64> {
        self.tape.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn push(&self, value: i64) {
        self.tape
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(value);
    }
}

impl Arithmetic for Calculator {
    fn add(&self, a: i64, b: i64) -> i64 {
        Calculator::add(self, a, b)
    }

    fn divide(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        Calculator::divide(self, a, b)
    }

    fn clear(&self) {
        Calculator::clear(self)
    }
}

impl Subject for Calculator {
    fn methods(table: &mut MethodTable<Self>) {
        table
            .method("add", Calculator::add)
            .method("divide", Calculator::divide)
            .method("clear", Calculator::clear)
            .method("tape", Calculator::tape);
    }
}

/// Test double for [`Calculator`]: one passthrough per method.
pub struct CalculatorDouble {
    engine: MockEngine<Calculator>,
}

impl CalculatorDouble {
    pub fn new() -> Self {
        Self::wrapping(Calculator::default())
    }

    pub fn wrapping(calculator: Calculator) -> Self {
        Self {
            engine: MockEngine::for_wrapper::<CalculatorDouble>(calculator),
        }
    }

    pub fn tape(&self) -> Vec<i64> {
        self.passthrough("tape", args![])
    }

    fn passthrough<R: 'static>(&self, method: &str, args: Vec<method_stub::Value>) -> R {
        match self.call_as(method, args) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }
}

impl Default for CalculatorDouble {
    fn default() -> Self {
        Self::new()
    }
}

impl Mocked for CalculatorDouble {
    type Subject = Calculator;

    fn engine(&self) -> &MockEngine<Calculator> {
        &self.engine
    }
}

impl Arithmetic for CalculatorDouble {
    fn add(&self, a: i64, b: i64) -> i64 {
        self.passthrough("add", args![a, b])
    }

    fn divide(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.passthrough("divide", args![a, b])
    }

    fn clear(&self) {
        self.passthrough("clear", args![])
    }
}

/// Split `total` across `parts` after adding a fee, clearing the tape first.
pub fn split_bill<A: Arithmetic>(calc: &A, total: i64, fee: i64, parts: i64) -> Result<i64, CalcError> {
    calc.clear();
    let gross = calc.add(total, fee);
    calc.divide(gross, parts)
}
