use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Booking,
    Fare,
}

impl DocumentKind {
    pub const BOOKING_ROOT: &'static str = "BookingResponse";
    pub const FARE_ROOT: &'static str = "FareResponse";

    /// Infer the document kind from the root element name.
    pub fn detect(doc: &roxmltree::Document) -> Result<Self, DocumentError> {
        match doc.root_element().tag_name().name() {
            Self::BOOKING_ROOT => Ok(Self::Booking),
            Self::FARE_ROOT => Ok(Self::Fare),
            other => Err(DocumentError::UnsupportedRoot(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Fare => "fare",
        }
    }
}

/// Errors and warnings contributed by a single check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn append(&mut self, mut other: Findings) {
        self.errors.append(&mut other.errors);
        self.warnings.append(&mut other.warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Outcome of one `validate()` run.
///
/// `is_valid` is true exactly when `errors` is empty; warnings never affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl From<Findings> for ValidationResult {
    fn from(findings: Findings) -> Self {
        Self {
            is_valid: findings.errors.is_empty(),
            errors: findings.errors,
            warnings: findings.warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassengerType {
    Adult,
    Child,
    Other(String),
}

impl PassengerType {
    pub fn parse(s: &str) -> Self {
        match s {
            "adult" => Self::Adult,
            "child" => Self::Child,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FareRuleType {
    AdvancePurchase,
    MinStay,
    MaxStay,
    Penalties,
    BlackoutDates,
    Unknown(String),
}

impl FareRuleType {
    pub const KNOWN: [&'static str; 5] = [
        "ADVANCE_PURCHASE",
        "MIN_STAY",
        "MAX_STAY",
        "PENALTIES",
        "BLACKOUT_DATES",
    ];

    pub fn parse(s: &str) -> Self {
        match s {
            "ADVANCE_PURCHASE" => Self::AdvancePurchase,
            "MIN_STAY" => Self::MinStay,
            "MAX_STAY" => Self::MaxStay,
            "PENALTIES" => Self::Penalties,
            "BLACKOUT_DATES" => Self::BlackoutDates,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Rule types whose `Days` child is range-checked.
    pub fn has_day_limit(&self) -> bool {
        matches!(self, Self::AdvancePurchase | Self::MinStay | Self::MaxStay)
    }
}

/// Descriptive data pulled from a booking; never a source of findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub booking_reference: Option<String>,
    pub agency_code: Option<String>,
    pub agency_name: Option<String>,
    pub passenger_count: usize,
    pub adult_count: usize,
    pub child_count: usize,
    pub total_price: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialRequest {
    pub passenger_id: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}
