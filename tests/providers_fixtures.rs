// tests/providers_fixtures.rs
// Both source adapters against captured response fixtures.

use forex_calendar_bot::calendar::providers::{
    fcs_api::FcsApiProvider, html_fallback::HtmlFallbackProvider,
};
use forex_calendar_bot::calendar::types::Impact;

#[test]
fn fcs_fixture_normalizes_all_field_aliases() {
    let body = include_str!("fixtures/fcs_response.json");
    let events = FcsApiProvider::parse_response(body).unwrap();
    assert_eq!(events.len(), 5);

    assert_eq!(events[0].name, "CPI Release");
    assert_eq!(events[0].currency, "USD");
    assert_eq!(events[0].impact, Impact::High);
    assert_eq!(events[0].time, "08:30");

    // title/country/importance/date aliases resolve too
    assert_eq!(events[1].name, "ECB Rate Decision");
    assert_eq!(events[1].currency, "EUR");
    assert_eq!(events[1].impact, Impact::High);
    assert_eq!(events[1].time, "12:45");

    assert_eq!(events[2].impact, Impact::Medium);
    assert_eq!(events[3].impact, Impact::Low);

    // no impact field at all
    assert_eq!(events[4].impact, Impact::Unknown);
}

#[test]
fn scrape_fixture_parses_event_rows_only() {
    let html = include_str!("fixtures/calendar_page.html");
    let events = HtmlFallbackProvider::parse_page(html);
    assert_eq!(events.len(), 2); // the day-separator row is not an event

    assert_eq!(events[0].time, "08:30");
    assert_eq!(events[0].currency, "USD");
    assert_eq!(events[0].impact, Impact::High);
    assert_eq!(events[0].name, "CPI (YoY) (Aug)");

    assert_eq!(events[1].currency, "EUR");
    assert_eq!(events[1].impact, Impact::Medium);
    assert_eq!(events[1].name, "ECB Interest Rate Decision");
}
