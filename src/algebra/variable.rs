//! # Variables
//!
//! Leaves of an expression tree that carry an identity:
//! - [`Constant`]: a named number that never changes (`g`, `pi`, ...)
//! - [`IndependentVariable`]: a value owned and mutated by the application. It is always treated
//!   as known and is read again on every evaluation, so changes are visible immediately.
//! - [`DependentVariable`]: an unknown without a stored value. Every [`Equation`] it appears in
//!   registers itself with it, and reading [`DependentVariable::value`] solves those equations
//!   in registration order until one of them succeeds.
//!
//! Variables are compared by identity (`ptr_eq`), never by name or value: two unknowns that
//! happen to have the same value are still different unknowns.
use crate::algebra::equation::Equation;
use crate::algebra::errors::AlgebraError;
use crate::algebra::number::{Number, NumberKind};
use crate::algebra::value::Value;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Named immutable number
#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    name: String,
    value: Number,
}

impl Constant {
    pub fn new(name: &str, value: impl Into<Number>) -> Self {
        Constant {
            name: name.to_string(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Number {
        self.value
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

//___________________________________INDEPENDENT VARIABLE____________________________________

struct IndependentInner {
    name: String,
    value: RefCell<Value>,
}

/// Externally settable leaf.
///
/// Cloning the handle does not copy the variable: all clones see the same value.
#[derive(Clone)]
pub struct IndependentVariable(Rc<IndependentInner>);

impl IndependentVariable {
    pub fn new(name: &str, value: impl Into<Value>) -> Self {
        IndependentVariable(Rc::new(IndependentInner {
            name: name.to_string(),
            value: RefCell::new(value.into()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Current value, as set by the application
    pub fn value(&self) -> Value {
        self.0.value.borrow().clone()
    }

    pub fn set_value(&self, value: impl Into<Value>) {
        *self.0.value.borrow_mut() = value.into();
    }

    /// Evaluates the current value down to a number
    pub fn evaluate(&self) -> Result<Number, AlgebraError> {
        // the borrow is released before evaluating, the value may read other variables
        let value = self.value();
        value.evaluate()
    }

    pub fn ptr_eq(&self, other: &IndependentVariable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for IndependentVariable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("IndependentVariable")
            .field(&self.0.name)
            .finish()
    }
}

impl fmt::Display for IndependentVariable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

//___________________________________DEPENDENT VARIABLE____________________________________

struct DependentInner {
    name: String,
    kind: Option<NumberKind>,
    equations: RefCell<Vec<Rc<Equation>>>,
    resolving: Cell<bool>,
}

/// Unknown computed on demand from the equations it appears in.
///
/// The variable keeps every equation it was ever registered with, for its whole lifetime.
/// Equations in turn hold the variable through their expression trees, so a dependent variable
/// and its equations are never freed; they are meant to live as long as the program does.
#[derive(Clone)]
pub struct DependentVariable(Rc<DependentInner>);

/// Clears the "resolving" marker when a resolution attempt ends, however it ends
struct ResolvingGuard<'a>(&'a Cell<bool>);

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl DependentVariable {
    /// Unknown whose solved value is returned in whatever kind the solution evaluates to
    pub fn new(name: &str) -> Self {
        Self::with_kind(name, None)
    }

    /// Unknown whose solved value is always converted to `kind`
    pub fn typed(name: &str, kind: NumberKind) -> Self {
        Self::with_kind(name, Some(kind))
    }

    fn with_kind(name: &str, kind: Option<NumberKind>) -> Self {
        DependentVariable(Rc::new(DependentInner {
            name: name.to_string(),
            kind,
            equations: RefCell::new(Vec::new()),
            resolving: Cell::new(false),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Declared result kind, if any
    pub fn kind(&self) -> Option<NumberKind> {
        self.0.kind
    }

    /// Registered equations, in registration order
    pub fn equations(&self) -> Vec<Rc<Equation>> {
        self.0.equations.borrow().clone()
    }

    pub fn ptr_eq(&self, other: &DependentVariable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Registers `equation` unless this exact equation object is already registered.
    /// Returns `true` if it was added.
    pub(crate) fn add_equation(&self, equation: &Rc<Equation>) -> bool {
        let mut equations = self.0.equations.borrow_mut();
        if equations.iter().any(|eq| Rc::ptr_eq(eq, equation)) {
            return false;
        }
        equations.push(Rc::clone(equation));
        true
    }

    /// Converts a solved value to the declared result kind
    pub(crate) fn coerce(&self, value: Number) -> Result<Number, AlgebraError> {
        match self.0.kind {
            Some(kind) => value.coerce(kind),
            None => Ok(value),
        }
    }

    /// Solves for the variable.
    ///
    /// Registered equations are tried in order. An equation that fails for a structural reason
    /// (unsupported shape, a nested unknown that cannot be resolved, a dependency cycle) is
    /// logged and skipped; any other error is returned at once. When no equation succeeds the
    /// error is [`AlgebraError::Unsolvable`], carrying the failure of every attempt.
    pub fn value(&self) -> Result<Number, AlgebraError> {
        let inner = &self.0;
        if inner.resolving.replace(true) {
            return Err(AlgebraError::Cycle(inner.name.clone()));
        }
        let _guard = ResolvingGuard(&inner.resolving);

        // a snapshot, so solving may register new equations without a borrow conflict
        let equations = self.equations();
        let mut attempts = Vec::new();
        for (i, equation) in equations.iter().enumerate() {
            match equation.solve(self) {
                Ok(value) => {
                    debug!(
                        "`{}` = {} from equation #{} ({})",
                        inner.name, value, i, equation
                    );
                    return Ok(value);
                }
                Err(err) if err.is_retryable() => {
                    match &err {
                        AlgebraError::UnsupportedShape(_) | AlgebraError::UnknownNodeType(_) => {
                            warn!("`{}`: skipping equation {}: {}", inner.name, equation, err)
                        }
                        _ => debug!("`{}`: skipping equation {}: {}", inner.name, equation, err),
                    }
                    attempts.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(AlgebraError::Unsolvable {
            variable: inner.name.clone(),
            attempts,
        })
    }
}

impl fmt::Debug for DependentVariable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DependentVariable")
            .field("name", &self.0.name)
            .field("kind", &self.0.kind)
            .field("equations", &self.0.equations.borrow().len())
            .finish()
    }
}

impl fmt::Display for DependentVariable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::value::Algebraic;

    #[test]
    fn test_independent_variable_is_shared_between_clones() {
        let w = IndependentVariable::new("w", 3);
        let alias = w.clone();
        alias.set_value(5);
        assert_eq!(w.evaluate(), Ok(Number::Int(5)));
        assert!(w.ptr_eq(&alias));
        assert!(!w.ptr_eq(&IndependentVariable::new("w", 5)));
    }

    #[test]
    fn test_independent_variable_holding_expression() {
        let a = IndependentVariable::new("a", 2);
        let b = IndependentVariable::new("b", &a * 10);
        assert_eq!(b.evaluate(), Ok(Number::Int(20)));
        a.set_value(4);
        assert_eq!(b.evaluate(), Ok(Number::Int(40)));
    }

    #[test]
    fn test_registration_is_idempotent() {
        let x = DependentVariable::new("x");
        let eq = (&x + &x).equals(4);
        assert_eq!(x.equations().len(), 1);
        assert!(!x.add_equation(&eq));
        assert_eq!(x.equations().len(), 1);
    }

    #[test]
    fn test_no_equations_is_unsolvable() {
        let x = DependentVariable::new("x");
        match x.value() {
            Err(AlgebraError::Unsolvable { variable, attempts }) => {
                assert_eq!(variable, "x");
                assert!(attempts.is_empty());
            }
            other => panic!("expected Unsolvable, got {:?}", other),
        }
    }

    #[test]
    fn test_resolving_marker_is_cleared_after_failure() {
        let x = DependentVariable::new("x");
        assert!(x.value().is_err());
        (&x * 2).equals(10);
        assert_eq!(x.value(), Ok(Number::Int(5)));
    }

    #[test]
    fn test_constant() {
        let g = Constant::new("g", 9.81);
        assert_eq!(g.to_string(), "g");
        assert_eq!(Value::from(g).evaluate(), Ok(Number::Float(9.81)));
    }
}
