use std::cmp::Ordering;
use std::fmt;

use crate::codegen::ArithOp;
use crate::error::RuntimeError;

/// Runtime value. Flags are stored as the integers `1` and `0`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl Value {
    /// Reads a number literal as written by the code generator.
    pub fn parse_number(s: &str) -> Option<Value> {
        if let Ok(n) = s.parse::<i64>() {
            return Some(Value::Integer(n));
        }
        s.parse::<f64>().ok().map(Value::Decimal)
    }

    /// Interprets one line of user input: integer, then decimal, then text.
    pub fn from_input(s: &str) -> Value {
        let s = s.trim();
        Value::parse_number(s).unwrap_or_else(|| Value::Text(s.to_string()))
    }

    fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Decimal(x) => Some(*x),
            Value::Text(_) => None,
        }
    }

    pub fn compare(&self, other: &Value) -> Result<Ordering, RuntimeError> {
        let ordering = match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => match (self.as_decimal(), other.as_decimal()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        };
        ordering.ok_or_else(|| RuntimeError::Incomparable(self.clone(), other.clone()))
    }

    pub fn apply(&self, op: ArithOp, other: &Value) -> Result<Value, RuntimeError> {
        let mismatch = || RuntimeError::TypeMismatch(self.clone(), other.clone());

        match (self, other) {
            (Value::Text(a), Value::Text(b)) if op == ArithOp::Add => {
                Ok(Value::Text(format!("{a}{b}")))
            }
            (Value::Integer(a), Value::Integer(b)) => {
                let (a, b) = (*a, *b);
                let n = match op {
                    ArithOp::Add => a.wrapping_add(b),
                    ArithOp::Sub => a.wrapping_sub(b),
                    ArithOp::Mul => a.wrapping_mul(b),
                    ArithOp::Div | ArithOp::Mod if b == 0 => {
                        return Err(RuntimeError::DivisionByZero)
                    }
                    ArithOp::Div => a.wrapping_div(b),
                    ArithOp::Mod => a.wrapping_rem(b),
                };
                Ok(Value::Integer(n))
            }
            _ => {
                let (Some(a), Some(b)) = (self.as_decimal(), other.as_decimal()) else {
                    return Err(mismatch());
                };
                let x = match op {
                    ArithOp::Add => a + b,
                    ArithOp::Sub => a - b,
                    ArithOp::Mul => a * b,
                    ArithOp::Div | ArithOp::Mod if b == 0.0 => {
                        return Err(RuntimeError::DivisionByZero)
                    }
                    ArithOp::Div => a / b,
                    ArithOp::Mod => a % b,
                };
                Ok(Value::Decimal(x))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            // `{:?}` keeps the fractional part of whole decimals, e.g. `2.0`
            Value::Decimal(x) => write!(f, "{x:?}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}
