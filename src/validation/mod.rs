//! Document validation
//!
//! Conformance checking is a seam: the [`ConformanceChecker`] trait accepts
//! a document and a resolved schema and reports structured violations.
//! [`StructuralChecker`] is the bundled implementation. [`Validator`] wraps
//! a checker and additionally applies schema-declared default values.

mod checker;
mod validator;

pub use checker::{ConformanceChecker, StructuralChecker};
pub use validator::Validator;
