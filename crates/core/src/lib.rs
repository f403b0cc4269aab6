//! Business-rule validation for travel booking and fare documents.
//!
//! Documents are parsed with `roxmltree` and handed to a [`BookingValidator`]
//! or [`FareValidator`], each of which runs a fixed sequence of independent
//! checks and folds their findings into a [`ValidationResult`].

pub mod error;
pub mod models;
pub mod parsing;
pub mod report;
pub mod validation;

pub use error::DocumentError;
pub use models::{DocumentKind, Findings, ValidationResult};
pub use validation::{validate_xml, BookingValidator, FareValidator, RuleSet};
