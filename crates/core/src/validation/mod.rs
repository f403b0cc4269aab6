pub mod booking;
pub mod fare;
pub mod rules;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::models::{DocumentKind, ValidationResult};
use crate::parsing::parse_document;

pub use booking::BookingValidator;
pub use fare::FareValidator;

/// Thresholds and allow-lists used by the checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub min_connection_minutes: f64,
    pub child_age_limit_years: f64,
    pub max_total_baggage_kg: f64,
    pub booking_tax_rate: f64,
    pub amount_tolerance: f64,
    pub max_displayed_seats: i64,
    pub max_rule_days: i64,
    pub common_currencies: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            min_connection_minutes: 90.0,
            child_age_limit_years: 12.0,
            max_total_baggage_kg: 100.0,
            booking_tax_rate: 0.15,
            amount_tolerance: 0.01,
            max_displayed_seats: 9,
            max_rule_days: 365,
            common_currencies: ["USD", "EUR", "GBP", "JPY", "PLN", "CAD", "AUD", "CHF"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl RuleSet {
    pub fn is_common_currency(&self, code: &str) -> bool {
        self.common_currencies.iter().any(|c| c == code)
    }
}

/// Parse `xml` and run the validator matching `kind`, or the root element if
/// `kind` is `None`.
///
/// `as_of` only affects the fare expiry warning.
pub fn validate_xml(
    xml: &str,
    kind: Option<DocumentKind>,
    rules: &RuleSet,
    as_of: Option<NaiveDateTime>,
) -> Result<(DocumentKind, ValidationResult), DocumentError> {
    let doc = parse_document(xml)?;
    let kind = match kind {
        Some(kind) => kind,
        None => DocumentKind::detect(&doc)?,
    };
    let result = match kind {
        DocumentKind::Booking => BookingValidator::new(&doc)
            .with_rules(rules.clone())
            .validate(),
        DocumentKind::Fare => {
            let mut validator = FareValidator::new(&doc).with_rules(rules.clone());
            if let Some(as_of) = as_of {
                validator = validator.with_reference_time(as_of);
            }
            validator.validate()
        }
    };
    Ok((kind, result))
}
