//! Operation registry: maps operation names to binary numeric functions.

use thiserror::Error;

use crate::types::OperationName;

/// Failure raised while resolving or evaluating an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// The requested name is not registered.
    #[error("Unsupported operation: '{name}'. Available: {available}")]
    UnknownOperation {
        /// Name as the caller supplied it.
        name: String,
        /// Comma-joined registered names, in registration order.
        available: String,
    },
    /// Domain-invalid operand: division, zeroth root or modulus by zero.
    #[error("{0}")]
    DivisionByZero(&'static str),
}

/// A pure binary function over two operands.
pub type BinaryFn = fn(f64, f64) -> Result<f64, OperationError>;

/// A resolved registry entry.
#[derive(Debug, Clone, Copy)]
pub struct Operation {
    /// Registered name.
    pub name: OperationName,
    func: BinaryFn,
}

impl Operation {
    /// Evaluates the operation.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, OperationError> {
        (self.func)(a, b)
    }
}

/// Ordered name → function table.
///
/// Power and root use plain real exponentiation, so a negative base with a
/// fractional exponent evaluates to NaN instead of failing.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    entries: Vec<Operation>,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationRegistry {
    /// Registry holding the seven built-in operations.
    pub fn new() -> Self {
        let entries = OperationName::ALL
            .into_iter()
            .map(|name| Operation {
                name,
                func: builtin(name),
            })
            .collect();
        Self { entries }
    }

    /// Case-insensitive lookup.
    pub fn resolve(&self, name: &str) -> Result<Operation, OperationError> {
        self.entries
            .iter()
            .find(|op| op.name.as_str().eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| OperationError::UnknownOperation {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|op| op.name.as_str()).collect()
    }
}

fn builtin(name: OperationName) -> BinaryFn {
    match name {
        OperationName::Add => add,
        OperationName::Subtract => subtract,
        OperationName::Multiply => multiply,
        OperationName::Divide => divide,
        OperationName::Power => power,
        OperationName::Root => root,
        OperationName::Modulus => modulus,
    }
}

fn add(a: f64, b: f64) -> Result<f64, OperationError> {
    Ok(a + b)
}

fn subtract(a: f64, b: f64) -> Result<f64, OperationError> {
    Ok(a - b)
}

fn multiply(a: f64, b: f64) -> Result<f64, OperationError> {
    Ok(a * b)
}

fn divide(a: f64, b: f64) -> Result<f64, OperationError> {
    if b == 0.0 {
        return Err(OperationError::DivisionByZero("Cannot divide by zero."));
    }
    Ok(a / b)
}

fn power(a: f64, b: f64) -> Result<f64, OperationError> {
    Ok(a.powf(b))
}

fn root(a: f64, b: f64) -> Result<f64, OperationError> {
    if b == 0.0 {
        return Err(OperationError::DivisionByZero("Cannot calculate 0th root."));
    }
    Ok(a.powf(1.0 / b))
}

// Floored remainder: the result takes the sign of the divisor.
fn modulus(a: f64, b: f64) -> Result<f64, OperationError> {
    if b == 0.0 {
        return Err(OperationError::DivisionByZero(
            "Cannot perform modulus by zero.",
        ));
    }
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}
