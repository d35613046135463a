//! # Expression trees
//!
//! [`Value`] is a node of an expression tree: a number, a named constant, a variable or a binary
//! [`Operation`]. It is a cheap handle; cloning it shares the subtree, and a subtree may be used
//! by any number of operations and equations at once.
//!
//! Trees are built with the usual operators (`+ - * /`, unary `-`) and with the methods of the
//! [`Algebraic`] trait (`pow`, `log`, `equals`):
//!
//! ```
//! use RustedAlgebra::algebra::number::Number;
//! use RustedAlgebra::algebra::value::Algebraic;
//! use RustedAlgebra::algebra::variable::DependentVariable;
//!
//! let y = DependentVariable::new("y");
//! ((&y + 3) * 6).equals(42);
//! assert_eq!(y.value(), Ok(Number::Int(4)));
//! ```
use crate::algebra::equation::Equation;
use crate::algebra::errors::AlgebraError;
use crate::algebra::number::Number;
use crate::algebra::operation::{Operation, OperatorKind};
use crate::algebra::variable::{Constant, DependentVariable, IndependentVariable};
use num::rational::Rational64;
use std::fmt;
use std::rc::Rc;

/// Node of an expression tree.
///
/// Equality is identity: `Value` deliberately does not implement `PartialEq`, use
/// [`Value::ptr_eq`] to check whether two handles are the same node.
#[derive(Clone, Debug)]
pub enum Value {
    Number(Number),
    Constant(Rc<Constant>),
    Independent(IndependentVariable),
    Dependent(DependentVariable),
    Operation(Rc<Operation>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Constant(c) => write!(f, "{}", c),
            Value::Independent(v) => write!(f, "{}", v),
            Value::Dependent(v) => write!(f, "{}", v),
            Value::Operation(op) => write!(f, "{}", op),
        }
    }
}

impl Value {
    /// Reduces the node to a number. Numbers are a fixed point.
    ///
    /// Reading a dependent variable solves its equations, which may in turn read other
    /// dependent variables.
    pub fn evaluate(&self) -> Result<Number, AlgebraError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Constant(c) => Ok(c.value()),
            Value::Independent(v) => v.evaluate(),
            Value::Dependent(v) => v.value(),
            Value::Operation(op) => op.evaluate(),
        }
    }

    /// Forward arithmetic `self (op) other`.
    ///
    /// Two numbers are combined directly; anything else is evaluated first and the operation
    /// retried on the resulting numbers.
    pub fn apply(&self, op: OperatorKind, other: &Value) -> Result<Number, AlgebraError> {
        match (self, other) {
            (Value::Number(l), Value::Number(r)) => l.apply(op, *r),
            (Value::Number(_), _) => self.apply(op, &Value::Number(other.evaluate()?)),
            _ => Value::Number(self.evaluate()?).apply(op, other),
        }
    }

    /// Occurrence test: `true` if `dv` is this node or a leaf of one of its operations
    pub fn contains(&self, dv: &DependentVariable) -> bool {
        match self {
            Value::Dependent(v) => v.ptr_eq(dv),
            Value::Operation(op) => op.left().contains(dv) || op.right().contains(dv),
            Value::Number(_) | Value::Constant(_) | Value::Independent(_) => false,
        }
    }

    /// `true` if this node is `dv` itself
    pub fn is_variable(&self, dv: &DependentVariable) -> bool {
        matches!(self, Value::Dependent(v) if v.ptr_eq(dv))
    }

    /// Identity comparison. Plain numbers have no identity and never compare equal.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Constant(a), Value::Constant(b)) => Rc::ptr_eq(a, b),
            (Value::Independent(a), Value::Independent(b)) => a.ptr_eq(b),
            (Value::Dependent(a), Value::Dependent(b)) => a.ptr_eq(b),
            (Value::Operation(a), Value::Operation(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Calls `visit` for every dependent variable leaf reachable through operations
    pub(crate) fn visit_dependents(&self, visit: &mut dyn FnMut(&DependentVariable)) {
        match self {
            Value::Dependent(v) => visit(v),
            Value::Operation(op) => {
                op.left().visit_dependents(visit);
                op.right().visit_dependents(visit);
            }
            Value::Number(_) | Value::Constant(_) | Value::Independent(_) => {}
        }
    }
}

//___________________________________CONVERSIONS____________________________________

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Value {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, f64, Rational64, Number);

impl From<Constant> for Value {
    fn from(value: Constant) -> Value {
        Value::Constant(Rc::new(value))
    }
}

impl From<Operation> for Value {
    fn from(value: Operation) -> Value {
        value.into_value()
    }
}

impl From<IndependentVariable> for Value {
    fn from(value: IndependentVariable) -> Value {
        Value::Independent(value)
    }
}

impl From<&IndependentVariable> for Value {
    fn from(value: &IndependentVariable) -> Value {
        Value::Independent(value.clone())
    }
}

impl From<DependentVariable> for Value {
    fn from(value: DependentVariable) -> Value {
        Value::Dependent(value)
    }
}

impl From<&DependentVariable> for Value {
    fn from(value: &DependentVariable) -> Value {
        Value::Dependent(value.clone())
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Value {
        value.clone()
    }
}

//___________________________________SURFACE SYNTAX____________________________________

fn binary(kind: OperatorKind, left: impl Into<Value>, right: impl Into<Value>) -> Value {
    Operation::new(kind, left, right).into_value()
}

macro_rules! impl_binary {
    ($op:ident, $base_fn:ident, $kind:ident, [$($t:ty),*]) => {
        $(
            impl<A: Into<Value>> std::ops::$op<A> for $t {
                type Output = Value;

                fn $base_fn(self, other: A) -> Value {
                    binary(OperatorKind::$kind, self, other)
                }
            }
        )*
    };
}

// One integer type only: a second one would leave `3 + x` without a type for the literal.
// Other integers go through `Value::from`.
macro_rules! impl_scalar_lhs {
    ($op:ident, $base_fn:ident, $kind:ident, [$($t:ty),*]) => {
        $(
            impl_scalar_lhs!(@one $op, $base_fn, $kind, i32, $t);
            impl_scalar_lhs!(@one $op, $base_fn, $kind, f64, $t);
        )*
    };
    (@one $op:ident, $base_fn:ident, $kind:ident, $lhs:ty, $t:ty) => {
        impl std::ops::$op<$t> for $lhs {
            type Output = Value;

            fn $base_fn(self, other: $t) -> Value {
                binary(OperatorKind::$kind, self, other)
            }
        }
    };
}

macro_rules! impl_operators {
    ($($t:ty),*) => {
        impl_binary!(Add, add, Addition, [$($t),*]);
        impl_binary!(Sub, sub, Subtraction, [$($t),*]);
        impl_binary!(Mul, mul, Multiplication, [$($t),*]);
        impl_binary!(Div, div, Division, [$($t),*]);
        impl_scalar_lhs!(Add, add, Addition, [$($t),*]);
        impl_scalar_lhs!(Sub, sub, Subtraction, [$($t),*]);
        impl_scalar_lhs!(Mul, mul, Multiplication, [$($t),*]);
        impl_scalar_lhs!(Div, div, Division, [$($t),*]);
        $(
            impl std::ops::Neg for $t {
                type Output = Value;

                fn neg(self) -> Value {
                    binary(OperatorKind::Multiplication, Number::Int(-1), self)
                }
            }
        )*
    };
}

impl_operators!(
    Value,
    &Value,
    DependentVariable,
    &DependentVariable,
    IndependentVariable,
    &IndependentVariable
);

/// Builders that have no operator symbol in Rust
pub trait Algebraic: Into<Value> {
    /// `self ^ exponent`
    fn pow(self, exponent: impl Into<Value>) -> Value {
        binary(OperatorKind::Exponentiation, self, exponent)
    }

    /// `log_base(self)`
    fn log(self, base: impl Into<Value>) -> Value {
        binary(OperatorKind::Logarithm, self, base)
    }

    /// States `self = rhs` and registers the equation with every dependent variable in it
    fn equals(self, rhs: impl Into<Value>) -> Rc<Equation> {
        Equation::new(self, rhs)
    }
}

impl Algebraic for Value {}
impl Algebraic for &Value {}
impl Algebraic for Number {}
impl Algebraic for Constant {}
impl Algebraic for DependentVariable {}
impl Algebraic for &DependentVariable {}
impl Algebraic for IndependentVariable {}
impl Algebraic for &IndependentVariable {}
