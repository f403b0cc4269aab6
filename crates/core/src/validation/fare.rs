//! Fare quote rules.

use chrono::NaiveDateTime;
use roxmltree::{Document, Node};

use super::rules::{amounts_differ, is_currency_code, is_fare_basis_code, is_fare_rule_code};
use super::RuleSet;
use crate::models::{FareRuleType, Findings, ValidationResult};
use crate::parsing::{
    child, descendants_named, element_text, parse_amount, parse_timestamp, parse_whole_number,
};

const REQUIRED_FARE_FIELDS: [&str; 3] = ["FareReference", "FareBasis", "ValidatingCarrier"];

pub struct FareValidator<'a, 'input> {
    doc: &'a Document<'input>,
    rules: RuleSet,
    reference_time: Option<NaiveDateTime>,
}

impl<'a, 'input> FareValidator<'a, 'input> {
    pub fn new(doc: &'a Document<'input>) -> Self {
        Self {
            doc,
            rules: RuleSet::default(),
            reference_time: None,
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Enables the expiry warning for fares whose `ValidTo` precedes `now`.
    pub fn with_reference_time(mut self, now: NaiveDateTime) -> Self {
        self.reference_time = Some(now);
        self
    }

    pub fn validate(&self) -> ValidationResult {
        let root = self.doc.root_element();

        let mut findings = Findings::new();
        findings.append(check_structure(root));
        findings.append(check_fare_basis_codes(root));
        findings.append(check_pricing_components(root, &self.rules));
        findings.append(check_fare_rules(root, &self.rules));
        findings.append(check_availability(root, &self.rules));
        findings.append(check_currency(root, &self.rules));
        findings.append(check_validity_dates(root, self.reference_time));

        tracing::debug!(
            errors = findings.errors.len(),
            warnings = findings.warnings.len(),
            "fare validation finished"
        );
        findings.into()
    }
}

fn raw_text(node: Node) -> String {
    element_text(node).unwrap_or_default()
}

pub fn check_structure(root: Node) -> Findings {
    let mut findings = Findings::new();
    let Some(fare_info) = child(root, "FareInfo") else {
        findings.error("Missing FareInfo element");
        return findings;
    };
    for field in REQUIRED_FARE_FIELDS {
        if child(fare_info, field).is_none() {
            findings.error(format!("Missing required field: {field}"));
        }
    }
    findings
}

/// Applies to every `FareBasis` element in the document, not only the one
/// under `FareInfo`.
pub fn check_fare_basis_codes(root: Node) -> Findings {
    let mut findings = Findings::new();
    for node in descendants_named(root, "FareBasis") {
        let code = raw_text(node);
        if !is_fare_basis_code(&code) {
            findings.error(format!(
                "Invalid fare basis code format: {code} (must be 4-15 uppercase alphanumeric characters)"
            ));
        }
    }
    findings
}

pub fn check_pricing_components(root: Node, rules: &RuleSet) -> Findings {
    let mut findings = Findings::new();
    let Some(pricing) = child(root, "Pricing") else {
        findings.error("Missing Pricing element");
        return findings;
    };

    let (Some(base), Some(taxes), Some(total)) = (
        child(pricing, "BaseFare"),
        child(pricing, "Taxes"),
        child(pricing, "Total"),
    ) else {
        findings.error("Missing pricing components (BaseFare, Taxes, or Total)");
        return findings;
    };

    let mut invalid = Vec::new();
    let mut amount = |name: &str, node: Node| {
        let raw = raw_text(node);
        let value = parse_amount(&raw);
        if value.is_none() {
            invalid.push(format!("{name} = {raw:?}"));
        }
        value
    };
    let (base, taxes, total) = (
        amount("BaseFare", base),
        amount("Taxes", taxes),
        amount("Total", total),
    );
    let (Some(base), Some(taxes), Some(total)) = (base, taxes, total) else {
        findings.error(format!(
            "Invalid numeric value in pricing: {}",
            invalid.join(", ")
        ));
        return findings;
    };

    let calculated = base + taxes;
    if amounts_differ(calculated, total, rules.amount_tolerance) {
        findings.error(format!(
            "Total mismatch: BaseFare ({base:.2}) + Taxes ({taxes:.2}) = {calculated:.2}, but Total is {total:.2}"
        ));
    }
    if base < 0.0 {
        findings.error(format!("BaseFare cannot be negative: {base:.2}"));
    }
    if taxes < 0.0 {
        findings.error(format!("Taxes cannot be negative: {taxes:.2}"));
    }
    findings
}

pub fn check_fare_rules(root: Node, rules: &RuleSet) -> Findings {
    let mut findings = Findings::new();
    for rule in descendants_named(root, "FareRule") {
        let raw_type = rule.attribute("type").filter(|t| !t.is_empty());
        let rule_type = raw_type.map(FareRuleType::parse);

        if let (Some(name), Some(FareRuleType::Unknown(_))) = (raw_type, &rule_type) {
            findings.warning(format!(
                "Unknown fare rule type: {name}. Expected one of: {}",
                FareRuleType::KNOWN.join(", ")
            ));
        }

        if let Some(code) = rule.attribute("code").filter(|c| !c.is_empty()) {
            if !is_fare_rule_code(code) {
                findings.error(format!(
                    "Invalid fare rule code format: {code} (must be 2-4 uppercase alphanumeric characters)"
                ));
            }
        }

        let (Some(name), Some(rule_type)) = (raw_type, rule_type) else {
            continue;
        };
        if !rule_type.has_day_limit() {
            continue;
        }
        let Some(days) = child(rule, "Days") else {
            continue;
        };
        let raw = raw_text(days);
        match parse_whole_number(&raw) {
            Some(days) if (0..=rules.max_rule_days).contains(&days) => {}
            Some(_) => {
                let what = match rule_type {
                    FareRuleType::AdvancePurchase => "advance purchase".to_string(),
                    _ => name.to_string(),
                };
                findings.error(format!(
                    "Invalid {what} days: {raw} (must be 0-{})",
                    rules.max_rule_days
                ));
            }
            None => findings.error(format!("Invalid days value: {raw}")),
        }
    }
    findings
}

pub fn check_availability(root: Node, rules: &RuleSet) -> Findings {
    let mut findings = Findings::new();
    let Some(seats) = descendants_named(root, "Availability")
        .next()
        .and_then(|availability| child(availability, "SeatsAvailable"))
    else {
        return findings;
    };

    let raw = raw_text(seats);
    match parse_whole_number(&raw) {
        Some(count) if count < 0 => {
            findings.error(format!("Seats available cannot be negative: {raw}"))
        }
        Some(0) => findings.warning("No seats available for this fare"),
        Some(count) if count > rules.max_displayed_seats => findings.warning(format!(
            "Unusual seat count: {raw} (typically capped at {} for display)",
            rules.max_displayed_seats
        )),
        Some(_) => {}
        None => findings.error(format!("Invalid seat count: {raw}")),
    }
    findings
}

/// Checks every `currency` attribute in the document. A malformed code is an
/// error and is not additionally flagged as uncommon.
pub fn check_currency(root: Node, rules: &RuleSet) -> Findings {
    let mut findings = Findings::new();
    for node in root.descendants().filter(|n| n.is_element()) {
        let Some(currency) = node.attribute("currency") else {
            continue;
        };
        if !is_currency_code(currency) {
            findings.error(format!(
                "Invalid currency code: {currency} (must be 3 uppercase letters, ISO 4217)"
            ));
        } else if !rules.is_common_currency(currency) {
            findings.warning(format!(
                "Uncommon currency code: {currency}. Verify this is correct."
            ));
        }
    }
    findings
}

/// Only runs when both `ValidFrom` and `ValidTo` are present.
pub fn check_validity_dates(root: Node, reference_time: Option<NaiveDateTime>) -> Findings {
    let mut findings = Findings::new();
    let (Some(from), Some(to)) = (
        descendants_named(root, "ValidFrom").next(),
        descendants_named(root, "ValidTo").next(),
    ) else {
        return findings;
    };

    let (raw_from, raw_to) = (raw_text(from), raw_text(to));
    let (Some(from), Some(to)) = (parse_timestamp(&raw_from), parse_timestamp(&raw_to)) else {
        findings.error(format!(
            "Invalid date format: ValidFrom = {raw_from:?}, ValidTo = {raw_to:?}"
        ));
        return findings;
    };

    if to <= from {
        findings.error(format!(
            "ValidTo date ({to}) must be after ValidFrom date ({from})"
        ));
    }
    if let Some(now) = reference_time {
        if to < now {
            findings.warning(format!("Fare has expired (ValidTo: {})", to.date()));
        }
    }
    findings
}
