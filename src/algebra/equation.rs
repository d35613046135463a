//! # Equations
//!
//! An [`Equation`] states that two expression trees have the same value. Creating one links it
//! to every [`DependentVariable`] found in either tree, which is all it takes for those variables
//! to become computable: reading one of them calls [`Equation::solve`], which isolates the unknown
//! by walking down the tree and inverting one operation per level.
//!
//! Only equations mentioning the unknown exactly once are supported.
use crate::algebra::errors::AlgebraError;
use crate::algebra::number::Number;
use crate::algebra::operation::Operation;
use crate::algebra::value::Value;
use crate::algebra::variable::DependentVariable;
use log::{debug, trace};
use std::fmt;
use std::rc::Rc;

/// `left = right`
#[derive(Debug)]
pub struct Equation {
    left: Value,
    right: Value,
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.left, self.right)
    }
}

impl Equation {
    /// Creates the equation and registers it with every dependent variable in both sides
    pub fn new(left: impl Into<Value>, right: impl Into<Value>) -> Rc<Equation> {
        let equation = Rc::new(Equation::unregistered(left.into(), right.into()));
        Equation::register(&equation);
        equation
    }

    fn unregistered(left: Value, right: Value) -> Equation {
        Equation { left, right }
    }

    fn register(equation: &Rc<Equation>) {
        for side in [&equation.left, &equation.right] {
            side.visit_dependents(&mut |dv| {
                if dv.add_equation(equation) {
                    debug!("registered `{}` with {}", dv, equation);
                }
            });
        }
    }

    pub fn left(&self) -> &Value {
        &self.left
    }

    pub fn right(&self) -> &Value {
        &self.right
    }

    /// The same equation with its sides swapped.
    ///
    /// The view is not registered anywhere: the variables already know this equation.
    pub fn inverse(&self) -> Equation {
        Equation::unregistered(self.right.clone(), self.left.clone())
    }

    /// Computes the value of `dv` from this equation
    pub fn solve(&self, dv: &DependentVariable) -> Result<Number, AlgebraError> {
        match (self.left.contains(dv), self.right.contains(dv)) {
            (true, false) => self.isolate_left(dv),
            (false, true) => self.inverse().solve(dv),
            (false, false) => Err(AlgebraError::NotInEquation {
                variable: dv.name().to_string(),
                equation: self.to_string(),
            }),
            (true, true) => Err(AlgebraError::UnsupportedShape(format!(
                "`{}` appears on both sides of {}",
                dv, self
            ))),
        }
    }

    /// Peels operations off the left side until only `dv` remains, applying the inverse of
    /// every peeled operation to the right side
    fn isolate_left(&self, dv: &DependentVariable) -> Result<Number, AlgebraError> {
        let mut current = self.left.clone();
        let mut known = self.right.clone();
        while !current.is_variable(dv) {
            let node = match &current {
                Value::Operation(op) => Rc::clone(op),
                other => return Err(AlgebraError::UnknownNodeType(other.to_string())),
            };
            let node: Operation = match (node.left().contains(dv), node.right().contains(dv)) {
                (true, false) => (*node).clone(),
                (false, true) => {
                    let flipped = node.flip()?;
                    if !flipped.left().contains(dv) || flipped.right().contains(dv) {
                        return Err(AlgebraError::Internal(format!(
                            "flipping {} did not move `{}` into the left operand",
                            node, dv
                        )));
                    }
                    flipped
                }
                (true, true) => {
                    return Err(AlgebraError::UnsupportedShape(format!(
                        "`{}` appears more than once in {}",
                        dv, node
                    )));
                }
                (false, false) => {
                    return Err(AlgebraError::Internal(format!(
                        "`{}` was expected in {}",
                        dv, node
                    )));
                }
            };
            trace!("solving `{}`: {} = {}", dv, node, known);
            known = node.inverse(known).into_value();
            current = node.left().clone();
        }
        trace!("solving `{}`: {} = {}", dv, dv, known);
        let value = known.evaluate()?;
        dv.coerce(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::value::Algebraic;
    use crate::algebra::variable::IndependentVariable;

    #[test]
    fn test_registers_with_dependents_of_both_sides() {
        let x = DependentVariable::new("x");
        let y = DependentVariable::new("y");
        let w = IndependentVariable::new("w", 1);
        let eq = Equation::new(&x + &w, &y * 2);
        assert_eq!(x.equations().len(), 1);
        assert_eq!(y.equations().len(), 1);
        assert!(Rc::ptr_eq(&x.equations()[0], &eq));
    }

    #[test]
    fn test_inverse_is_not_registered() {
        let x = DependentVariable::new("x");
        let eq = (&x + 2).equals(4);
        let inverse = eq.inverse();
        assert_eq!(inverse.to_string(), "4 = (x + 2)");
        assert_eq!(x.equations().len(), 1);
        assert_eq!(inverse.solve(&x), Ok(Number::Int(2)));
    }

    #[test]
    fn test_solve_for_absent_variable() {
        let x = DependentVariable::new("x");
        let z = DependentVariable::new("z");
        let eq = (&x + 2).equals(4);
        assert!(matches!(
            eq.solve(&z),
            Err(AlgebraError::NotInEquation { .. })
        ));
    }

    #[test]
    fn test_both_sides_is_unsupported() {
        let x = DependentVariable::new("x");
        let eq = (&x + 2).equals(&x * 3);
        assert!(matches!(eq.solve(&x), Err(AlgebraError::UnsupportedShape(_))));
    }

    #[test]
    fn test_repeated_unknown_is_unsupported() {
        let x = DependentVariable::new("x");
        let eq = (&x + &x).equals(4);
        assert!(matches!(eq.solve(&x), Err(AlgebraError::UnsupportedShape(_))));
    }

    #[test]
    fn test_bare_variable_side() {
        let x = DependentVariable::new("x");
        let eq = Equation::new(&x, 7);
        assert_eq!(eq.solve(&x), Ok(Number::Int(7)));
        let eq = Equation::new(Value::from(7) * 3, &x);
        assert_eq!(eq.solve(&x), Ok(Number::Int(21)));
    }
}
