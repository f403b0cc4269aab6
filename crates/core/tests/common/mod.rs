#![allow(dead_code)]

use std::cell::RefCell;

use travel_rules_core::models::{BookingSummary, SpecialRequest};
use travel_rules_core::report::BookingObserver;

pub const BOOKING_XML: &str = r#"
<BookingResponse>
    <BookingReference>REF2025001</BookingReference>
    <BookingDate>2025-01-15T10:30:00</BookingDate>
    <Agency code="AG001" name="Travel Solutions"/>
    <Itinerary>
        <Route>
            <Segment number="1" status="confirmed">
                <Flight carrier="LO" number="281" class="Y">
                    <Departure>
                        <Airport>WAW</Airport>
                        <DateTime>2025-06-15T08:30:00</DateTime>
                    </Departure>
                    <Arrival>
                        <Airport>LHR</Airport>
                        <DateTime>2025-06-15T10:45:00</DateTime>
                    </Arrival>
                </Flight>
            </Segment>
            <Segment number="2" status="confirmed">
                <Flight carrier="BA" number="117" class="J">
                    <Departure>
                        <Airport>LHR</Airport>
                        <DateTime>2025-06-15T14:00:00</DateTime>
                    </Departure>
                    <Arrival>
                        <Airport>JFK</Airport>
                        <DateTime>2025-06-15T17:30:00</DateTime>
                    </Arrival>
                </Flight>
            </Segment>
        </Route>
    </Itinerary>
    <Passengers>
        <Passenger id="P001" type="adult" title="Mr">
            <Name>
                <First>John</First>
                <Last>Smith</Last>
            </Name>
            <DateOfBirth>1985-03-20</DateOfBirth>
            <Baggage>
                <CarryOn>1</CarryOn>
                <Checked>1</Checked>
                <Weight unit="kg">20</Weight>
            </Baggage>
            <Fare currency="GBP">899.00</Fare>
        </Passenger>
    </Passengers>
    <Pricing currency="GBP">
        <SubTotal>899.00</SubTotal>
        <Tax>134.85</Tax>
        <Total>1033.85</Total>
    </Pricing>
</BookingResponse>
"#;

pub const FARE_XML: &str = r#"
<FareResponse>
    <FareInfo>
        <FareReference>FARE2025001</FareReference>
        <FareBasis>YOWUS</FareBasis>
        <ValidatingCarrier>LO</ValidatingCarrier>
    </FareInfo>
    <Pricing currency="USD">
        <BaseFare>500.00</BaseFare>
        <Taxes>75.00</Taxes>
        <Total>575.00</Total>
    </Pricing>
    <FareRules>
        <FareRule type="ADVANCE_PURCHASE" code="AP14">
            <Days>14</Days>
            <Description>Must be purchased 14 days in advance</Description>
        </FareRule>
        <FareRule type="MIN_STAY" code="MS03">
            <Days>3</Days>
            <Description>Minimum stay 3 days</Description>
        </FareRule>
    </FareRules>
    <Availability>
        <SeatsAvailable>7</SeatsAvailable>
    </Availability>
</FareResponse>
"#;

/// Replace the single occurrence of `from`, failing loudly if the fixture drifted.
pub fn edit(xml: &str, from: &str, to: &str) -> String {
    assert_eq!(xml.matches(from).count(), 1, "fixture must contain {from:?} once");
    xml.replacen(from, to, 1)
}

/// A second adult with the given baggage weight and a fare of 899.00.
pub fn second_passenger(weight: &str) -> String {
    format!(
        r#"<Passenger id="P002" type="adult" title="Mrs">
            <DateOfBirth>1987-07-15</DateOfBirth>
            <Baggage>
                <CarryOn>1</CarryOn>
                <Checked>1</Checked>
                <Weight unit="kg">{weight}</Weight>
            </Baggage>
            <Fare currency="GBP">899.00</Fare>
        </Passenger>"#
    )
}

/// Booking with two passengers weighing `first` and `second` kg, priced consistently.
pub fn two_passenger_booking(first: &str, second: &str) -> String {
    let xml = edit(
        BOOKING_XML,
        r#"<Weight unit="kg">20</Weight>"#,
        &format!(r#"<Weight unit="kg">{first}</Weight>"#),
    );
    let xml = edit(
        &xml,
        "</Passengers>",
        &format!("{}</Passengers>", second_passenger(second)),
    );
    let xml = edit(&xml, "<SubTotal>899.00</SubTotal>", "<SubTotal>1798.00</SubTotal>");
    let xml = edit(&xml, "<Tax>134.85</Tax>", "<Tax>269.70</Tax>");
    edit(&xml, "<Total>1033.85</Total>", "<Total>2067.70</Total>")
}

pub fn contains_ci(messages: &[String], needles: &[&str]) -> bool {
    messages.iter().any(|m| {
        let lower = m.to_lowercase();
        needles.iter().all(|n| lower.contains(&n.to_lowercase()))
    })
}

#[derive(Default)]
pub struct RecordingObserver {
    pub summaries: RefCell<Vec<BookingSummary>>,
    pub requests: RefCell<Vec<SpecialRequest>>,
}

impl BookingObserver for RecordingObserver {
    fn on_summary(&self, summary: &BookingSummary) {
        self.summaries.borrow_mut().push(summary.clone());
    }

    fn on_special_request(&self, request: &SpecialRequest) {
        self.requests.borrow_mut().push(request.clone());
    }
}
