//! # Operation nodes
//!
//! A binary node of an expression tree together with the rewrite rules the solver relies on.
//!
//! The solver only knows how to isolate an unknown that sits in the **left** operand: for a node
//! `l (op) r = k` with `l` unknown, [`Operation::inverse`] builds the expression for `l` out of
//! the stored right operand `r` and the known result `k`:
//!
//! | operator        | forward     | inverse for the left operand |
//! |-----------------|-------------|------------------------------|
//! | Addition        | `l + r`     | `k - r`                      |
//! | Subtraction     | `l - r`     | `k + r`                      |
//! | Multiplication  | `l * r`     | `k / r`                      |
//! | Division        | `l / r`     | `k * r`                      |
//! | Exponentiation  | `l ^ r`     | `k ^ (1.0 / r)`              |
//! | Logarithm       | `log_r(l)`  | `r ^ k`                      |
//!
//! An unknown in the right operand is handled by [`Operation::flip`] first, which rewrites the
//! node into a value-equivalent one whose left operand contains the unknown, so there is no second
//! rule set for right operands.
use crate::algebra::errors::AlgebraError;
use crate::algebra::number::Number;
use crate::algebra::value::Value;
use std::fmt;
use std::rc::Rc;
use strum_macros::{Display, EnumIter};

/// Operator tag of a binary node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum OperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    /// Only the base can be solved for: an unknown exponent makes [`Operation::flip`] fail
    Exponentiation,
    /// `log_right(left)`: the right operand is the base
    Logarithm,
}

impl OperatorKind {
    /// Infix symbol used for printing
    pub fn symbol(&self) -> &'static str {
        match self {
            OperatorKind::Addition => "+",
            OperatorKind::Subtraction => "-",
            OperatorKind::Multiplication => "*",
            OperatorKind::Division => "/",
            OperatorKind::Exponentiation => "^",
            OperatorKind::Logarithm => "log",
        }
    }
}

/// Binary node of an expression tree.
///
/// Operands are shared handles, so the same subtree may appear in many operations and equations.
/// A node is never mutated after construction.
#[derive(Clone, Debug)]
pub struct Operation {
    kind: OperatorKind,
    left: Value,
    right: Value,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            OperatorKind::Logarithm => write!(f, "log({}, {})", self.left, self.right),
            _ => write!(f, "({} {} {})", self.left, self.kind.symbol(), self.right),
        }
    }
}

impl Operation {
    pub fn new(kind: OperatorKind, left: impl Into<Value>, right: impl Into<Value>) -> Self {
        Operation {
            kind,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn left(&self) -> &Value {
        &self.left
    }

    pub fn right(&self) -> &Value {
        &self.right
    }

    /// Wraps the node into a shareable tree handle
    pub fn into_value(self) -> Value {
        Value::Operation(Rc::new(self))
    }

    /// Forward evaluation: `left (op) right`
    pub fn evaluate(&self) -> Result<Number, AlgebraError> {
        self.left.apply(self.kind, &self.right)
    }

    /// Value-equivalent rewrite that moves the right operand into the left subtree.
    ///
    /// Exponentiation has no such form among the six operators (isolating an exponent needs a
    /// logarithm of the known result), so flipping it fails with
    /// [`AlgebraError::UnsupportedShape`].
    pub fn flip(&self) -> Result<Operation, AlgebraError> {
        let (l, r) = (self.left.clone(), self.right.clone());
        let flipped = match self.kind {
            OperatorKind::Addition | OperatorKind::Multiplication => Operation::new(self.kind, r, l),
            // a - b = (-1 * b) + a
            OperatorKind::Subtraction => Operation::new(
                OperatorKind::Addition,
                Operation::new(OperatorKind::Multiplication, Number::Int(-1), r),
                l,
            ),
            // a / b = (b / a) ^ -1
            OperatorKind::Division => Operation::new(
                OperatorKind::Exponentiation,
                Operation::new(OperatorKind::Division, r, l),
                Number::Float(-1.0),
            ),
            // log_b(a) = (log_a(b)) ^ -1
            OperatorKind::Logarithm => Operation::new(
                OperatorKind::Exponentiation,
                Operation::new(OperatorKind::Logarithm, r, l),
                Number::Float(-1.0),
            ),
            OperatorKind::Exponentiation => {
                return Err(AlgebraError::UnsupportedShape(format!(
                    "cannot isolate the exponent of {}",
                    self
                )));
            }
        };
        Ok(flipped)
    }

    /// Expression computing the left operand, given the value `known` of the whole node
    pub fn inverse(&self, known: impl Into<Value>) -> Operation {
        let k = known.into();
        let r = self.right.clone();
        match self.kind {
            OperatorKind::Addition => Operation::new(OperatorKind::Subtraction, k, r),
            OperatorKind::Subtraction => Operation::new(OperatorKind::Addition, k, r),
            OperatorKind::Multiplication => Operation::new(OperatorKind::Division, k, r),
            OperatorKind::Division => Operation::new(OperatorKind::Multiplication, k, r),
            OperatorKind::Exponentiation => Operation::new(
                OperatorKind::Exponentiation,
                k,
                Operation::new(OperatorKind::Division, Number::Float(1.0), r),
            ),
            OperatorKind::Logarithm => Operation::new(OperatorKind::Exponentiation, r, k),
        }
    }
}
