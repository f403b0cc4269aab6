//! Booking document rules.
//!
//! Paths are relative to the `BookingResponse` root. Segments are taken from
//! `Itinerary/Route/Segment` by document position; the `number` attribute is
//! never consulted.

use std::str::FromStr;

use chrono::NaiveDateTime;
use roxmltree::{Document, Node};

use super::rules::amounts_differ;
use super::RuleSet;
use crate::models::{BookingSummary, Findings, PassengerType, SpecialRequest, ValidationResult};
use crate::parsing::{
    child, children_named, element_text, find_element, parse_amount, parse_timestamp, text_at,
};
use crate::report::{BookingObserver, TracingObserver};

const SECONDS_PER_DAY: i64 = 86_400;
const DAYS_PER_YEAR: f64 = 365.25;

pub struct BookingValidator<'a, 'input> {
    doc: &'a Document<'input>,
    rules: RuleSet,
    observer: &'a dyn BookingObserver,
}

impl<'a, 'input> BookingValidator<'a, 'input> {
    pub fn new(doc: &'a Document<'input>) -> Self {
        Self {
            doc,
            rules: RuleSet::default(),
            observer: &TracingObserver,
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn BookingObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Run every booking check. Each call starts from empty findings.
    pub fn validate(&self) -> ValidationResult {
        let root = self.doc.root_element();
        self.observer.on_summary(&self.summary());

        let mut findings = Findings::new();
        findings.append(check_connection_time(root, &self.rules));
        findings.append(check_passenger_ages(root, &self.rules));
        findings.append(check_baggage(root, &self.rules));
        findings.append(check_pricing(root, &self.rules));

        for request in self.special_requests() {
            self.observer.on_special_request(&request);
        }

        tracing::debug!(
            errors = findings.errors.len(),
            warnings = findings.warnings.len(),
            "booking validation finished"
        );
        findings.into()
    }

    pub fn summary(&self) -> BookingSummary {
        extract_summary(self.doc.root_element())
    }

    pub fn special_requests(&self) -> Vec<SpecialRequest> {
        extract_special_requests(self.doc.root_element())
    }
}

fn segments<'a, 'input: 'a>(root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    find_element(root, &["Itinerary", "Route"])
        .map(|route| children_named(route, "Segment").collect())
        .unwrap_or_default()
}

fn passengers<'a, 'input: 'a>(root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    child(root, "Passengers")
        .map(|list| children_named(list, "Passenger").collect())
        .unwrap_or_default()
}

fn passenger_id<'a>(passenger: Node<'a, '_>) -> &'a str {
    passenger.attribute("id").unwrap_or("<unknown>")
}

/// `leg` is `Departure` or `Arrival`; `position` is 1-based, for messages.
fn segment_time(segment: Node, position: usize, leg: &str) -> Result<NaiveDateTime, String> {
    let raw = text_at(segment, &["Flight", leg, "DateTime"]).ok_or_else(|| {
        format!(
            "segment {position} has no {} time",
            leg.to_ascii_lowercase()
        )
    })?;
    parse_timestamp(&raw).ok_or_else(|| {
        format!(
            "segment {position} has an invalid {} time: {raw}",
            leg.to_ascii_lowercase()
        )
    })
}

/// `Ok(None)` when the child is absent, `Err(raw)` when present but unparsable.
fn parse_child<T>(
    parent: Node,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, String> {
    match child(parent, name) {
        None => Ok(None),
        Some(node) => {
            let raw = element_text(node).unwrap_or_default();
            parse(&raw).map(Some).ok_or(raw)
        }
    }
}

fn parse_int<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

pub fn check_connection_time(root: Node, rules: &RuleSet) -> Findings {
    let mut findings = Findings::new();
    let segments = segments(root);
    if segments.len() < 2 {
        tracing::debug!(
            segments = segments.len(),
            "fewer than two segments, connection time not checked"
        );
        return findings;
    }

    let arrival = segment_time(segments[0], 1, "Arrival");
    let departure = segment_time(segments[1], 2, "Departure");
    let (arrival, departure) = match (arrival, departure) {
        (Ok(a), Ok(d)) => (a, d),
        (a, d) => {
            for reason in [a.err(), d.err()].into_iter().flatten() {
                findings.error(format!("Connection time could not be checked: {reason}"));
            }
            return findings;
        }
    };

    let minutes = (departure - arrival).num_seconds() as f64 / 60.0;
    if minutes < rules.min_connection_minutes {
        findings.error(format!(
            "Connection time too short: {minutes:.0} minutes (minimum {:.0} minutes required)",
            rules.min_connection_minutes
        ));
    } else {
        tracing::debug!(minutes, "connection time ok");
    }
    findings
}

pub fn check_passenger_ages(root: Node, rules: &RuleSet) -> Findings {
    let mut findings = Findings::new();
    let passengers = passengers(root);
    if passengers.is_empty() {
        return findings;
    }

    let reference = match segments(root).first() {
        Some(first) => segment_time(*first, 1, "Departure"),
        None => Err("itinerary has no segments".to_string()),
    };
    let reference = match reference {
        Ok(t) => t,
        Err(reason) => {
            findings.error(format!("Passenger ages could not be checked: {reason}"));
            return findings;
        }
    };

    let limit = rules.child_age_limit_years;
    for passenger in passengers {
        let id = passenger_id(passenger);
        let kind = PassengerType::parse(passenger.attribute("type").unwrap_or_default());
        if let PassengerType::Other(other) = &kind {
            tracing::debug!(passenger = id, kind = %other, "no age rule for passenger type");
            continue;
        }

        let dob = match text_at(passenger, &["DateOfBirth"]) {
            None => {
                findings.error(format!("Passenger {id} has no date of birth"));
                continue;
            }
            Some(raw) => match parse_timestamp(&raw) {
                Some(dob) => dob,
                None => {
                    findings.error(format!(
                        "Passenger {id} has an invalid date of birth: {raw}"
                    ));
                    continue;
                }
            },
        };

        let days = (reference - dob).num_seconds().div_euclid(SECONDS_PER_DAY);
        let age = days as f64 / DAYS_PER_YEAR;
        match kind {
            PassengerType::Child if age >= limit => findings.error(format!(
                "Passenger {id} is classified as child but is {age:.1} years old (should be under {limit})"
            )),
            PassengerType::Adult if age < limit => findings.error(format!(
                "Passenger {id} is classified as adult but is {age:.1} years old (should be {limit} or older)"
            )),
            _ => {}
        }
    }
    findings
}

pub fn check_baggage(root: Node, rules: &RuleSet) -> Findings {
    let mut findings = Findings::new();
    let mut total_weight = 0.0;
    let mut total_checked: Option<u64> = Some(0);

    for passenger in passengers(root) {
        let Some(baggage) = child(passenger, "Baggage") else {
            continue;
        };
        let id = passenger_id(passenger);
        match parse_child(baggage, "Weight", parse_amount) {
            Ok(weight) => total_weight += weight.unwrap_or(0.0),
            Err(raw) => findings.error(format!(
                "Passenger {id} has an invalid baggage weight: {raw}"
            )),
        }
        match parse_child(baggage, "Checked", parse_int::<u64>) {
            Ok(checked) => {
                let next = total_checked.and_then(|sum| sum.checked_add(checked.unwrap_or(0)));
                if next.is_none() && total_checked.is_some() {
                    findings.error(format!("Checked bag count overflows at passenger {id}"));
                }
                total_checked = next;
            }
            Err(raw) => findings.error(format!(
                "Passenger {id} has an invalid checked bag count: {raw}"
            )),
        }
    }

    let limit = rules.max_total_baggage_kg;
    if total_weight > limit {
        let checked = total_checked.map_or_else(|| "unknown".to_string(), |c| c.to_string());
        findings.error(format!(
            "Baggage limit exceeded: Total weight {total_weight}kg (limit {limit}kg), Total checked bags: {checked}"
        ));
    }
    findings
}

pub fn check_pricing(root: Node, rules: &RuleSet) -> Findings {
    let mut findings = Findings::new();

    let mut fare_sum = Some(0.0);
    for passenger in passengers(root) {
        let id = passenger_id(passenger);
        match parse_child(passenger, "Fare", parse_amount) {
            Ok(Some(fare)) => fare_sum = fare_sum.map(|sum| sum + fare),
            Ok(None) => {
                findings.error(format!("Passenger {id} has no fare"));
                fare_sum = None;
            }
            Err(raw) => {
                findings.error(format!("Passenger {id} has an invalid fare: {raw}"));
                fare_sum = None;
            }
        }
    }

    let Some(pricing) = child(root, "Pricing") else {
        findings.error("Missing Pricing element");
        return findings;
    };
    let mut field = |name: &str| match parse_child(pricing, name, parse_amount) {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            findings.error(format!("Missing pricing field: {name}"));
            None
        }
        Err(raw) => {
            findings.error(format!("Invalid numeric value in pricing: {name} = {raw}"));
            None
        }
    };
    let subtotal = field("SubTotal");
    let tax = field("Tax");
    let total = field("Total");

    let tolerance = rules.amount_tolerance;
    if let (Some(fare_sum), Some(subtotal)) = (fare_sum, subtotal) {
        if amounts_differ(fare_sum, subtotal, tolerance) {
            findings.error(format!(
                "SubTotal mismatch: sum of fares is {fare_sum:.2}, but SubTotal is {subtotal:.2}"
            ));
        }
    }
    if let (Some(subtotal), Some(tax)) = (subtotal, tax) {
        let expected = subtotal * rules.booking_tax_rate;
        if amounts_differ(expected, tax, tolerance) {
            findings.error(format!(
                "Tax mismatch: expected {expected:.2} ({:.0}% of {subtotal:.2}), but got {tax:.2}",
                rules.booking_tax_rate * 100.0
            ));
        }
    }
    if let (Some(subtotal), Some(tax), Some(total)) = (subtotal, tax, total) {
        let expected = subtotal + tax;
        if amounts_differ(expected, total, tolerance) {
            findings.error(format!(
                "Total mismatch: expected {expected:.2} (SubTotal + Tax), but got {total:.2}"
            ));
        }
    }
    findings
}

pub fn extract_summary(root: Node) -> BookingSummary {
    let passengers = passengers(root);
    let count_type = |kind: PassengerType| {
        passengers
            .iter()
            .filter(|p| PassengerType::parse(p.attribute("type").unwrap_or_default()) == kind)
            .count()
    };
    let agency = child(root, "Agency");
    let pricing = child(root, "Pricing");

    BookingSummary {
        booking_reference: text_at(root, &["BookingReference"]),
        agency_code: agency.and_then(|a| a.attribute("code")).map(String::from),
        agency_name: agency.and_then(|a| a.attribute("name")).map(String::from),
        passenger_count: passengers.len(),
        adult_count: count_type(PassengerType::Adult),
        child_count: count_type(PassengerType::Child),
        total_price: pricing.and_then(|p| text_at(p, &["Total"])),
        currency: pricing
            .and_then(|p| p.attribute("currency"))
            .map(String::from),
    }
}

pub fn extract_special_requests(root: Node) -> Vec<SpecialRequest> {
    let mut out = Vec::new();
    for passenger in passengers(root) {
        let Some(requests) = child(passenger, "SpecialRequests") else {
            continue;
        };
        for request in children_named(requests, "Request") {
            out.push(SpecialRequest {
                passenger_id: passenger.attribute("id").map(String::from),
                code: request.attribute("code").map(String::from),
                description: element_text(request),
            });
        }
    }
    out
}
