//! # Declarative algebra
//!
//! Expression trees built out of numbers, named constants and variables, equations stating that
//! two trees are equal, and dependent variables that compute their own value by symbolically
//! inverting the equations they appear in.
//!
//!# Example
//! ```
//! use RustedAlgebra::algebra::number::Number;
//! use RustedAlgebra::algebra::equation::Equation;
//! use RustedAlgebra::algebra::variable::{DependentVariable, IndependentVariable};
//!
//! let width = IndependentVariable::new("width", 12);
//! let height = IndependentVariable::new("height", 14);
//! let area = DependentVariable::new("area");
//! Equation::new(&area, &width * &height);
//! assert_eq!(area.value(), Ok(Number::Int(168)));
//! // independent variables are read again on every solve
//! width.set_value(0);
//! assert_eq!(area.value(), Ok(Number::Int(0)));
//! ```
/// ________________________________________________________________________________________________
/// error types and the retry policy of the resolution loop
pub mod errors;
/// numeric leaves: Int, Rational and Float with promotion between them
pub mod number;
/// binary operation nodes, their flip and inverse rewrites
pub mod operation;
/// expression tree handle and the operator overloads building it
pub mod value;
/// constants, independent variables and self-solving dependent variables
pub mod variable;
/// equations and the isolate-the-unknown walk
pub mod equation;
