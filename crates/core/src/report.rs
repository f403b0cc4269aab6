//! Sinks for informational booking data.
//!
//! The booking summary and special requests never affect validity. They are
//! handed to a [`BookingObserver`] so callers decide where they end up.

use crate::models::{BookingSummary, SpecialRequest};

pub trait BookingObserver {
    fn on_summary(&self, summary: &BookingSummary);
    fn on_special_request(&self, request: &SpecialRequest);
}

/// Logs through `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BookingObserver for TracingObserver {
    fn on_summary(&self, summary: &BookingSummary) {
        tracing::info!(
            booking_reference = summary.booking_reference.as_deref().unwrap_or("-"),
            agency_code = summary.agency_code.as_deref().unwrap_or("-"),
            agency_name = summary.agency_name.as_deref().unwrap_or("-"),
            passengers = summary.passenger_count,
            adults = summary.adult_count,
            children = summary.child_count,
            total_price = summary.total_price.as_deref().unwrap_or("-"),
            currency = summary.currency.as_deref().unwrap_or("-"),
            "Booking summary"
        );
    }

    fn on_special_request(&self, request: &SpecialRequest) {
        tracing::info!(
            passenger_id = request.passenger_id.as_deref().unwrap_or("-"),
            code = request.code.as_deref().unwrap_or("-"),
            description = request.description.as_deref().unwrap_or("-"),
            "Special request"
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BookingObserver for NoopObserver {
    fn on_summary(&self, _summary: &BookingSummary) {}
    fn on_special_request(&self, _request: &SpecialRequest) {}
}
