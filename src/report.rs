// src/report.rs
// Turns normalized events into the daily digest. Pure; the scheduler owns
// rendering-to-text and delivery.

use std::collections::HashMap;

use crate::calendar::types::{EconomicEvent, Impact};

pub const NO_EVENTS_MESSAGE: &str = "📢 No significant events today.";
const HEADER: &str = "📅 24-hour economic calendar:";
const FOOTER: &str = "⚠️ Source: FCS API";

/// Ordered lines of one daily digest. Produced once per cycle and consumed
/// exactly once by the chunker; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub lines: Vec<String>,
}

impl Report {
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Default)]
struct ImpactCounts {
    high: usize,
    medium: usize,
    low: usize,
}

/// Build the digest: one summary line per currency (first-occurrence order),
/// then every event in fetch order.
pub fn format_report(events: &[EconomicEvent]) -> Report {
    if events.is_empty() {
        return Report {
            lines: vec![NO_EVENTS_MESSAGE.to_string()],
        };
    }

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, ImpactCounts> = HashMap::new();
    for ev in events {
        let key = group_key(ev);
        let entry = counts.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            ImpactCounts::default()
        });
        match ev.impact {
            Impact::High => entry.high += 1,
            Impact::Medium => entry.medium += 1,
            Impact::Low => entry.low += 1,
            Impact::Unknown => {}
        }
    }

    let mut lines = Vec::with_capacity(2 * events.len() + order.len() + 3);
    lines.push(HEADER.to_string());
    for key in &order {
        let c = &counts[key];
        lines.push(format!(
            "{key}: High={}, Medium={}, Low={}",
            c.high, c.medium, c.low
        ));
    }
    lines.push(String::new());
    for ev in events {
        lines.push(format!(
            "{} | {} | Impact:{} | {} ({})",
            ev.time, ev.currency, ev.impact, ev.name, ev.translated_name
        ));
        lines.push(volatility_note(ev));
    }
    lines.push(String::new());
    lines.push(FOOTER.to_string());

    Report { lines }
}

/// Short commentary under each detail line, keyed off the impact level.
fn volatility_note(ev: &EconomicEvent) -> String {
    match ev.impact {
        Impact::High => format!("⚡ Strong volatility expected for {}", group_key(ev)),
        Impact::Medium => format!("🔹 Moderate moves possible for {}", group_key(ev)),
        Impact::Low | Impact::Unknown => "🔸 Low impact".to_string(),
    }
}

fn group_key(ev: &EconomicEvent) -> String {
    if ev.currency.is_empty() {
        "?".to_string()
    } else {
        ev.currency.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(time: &str, currency: &str, impact: Impact, name: &str) -> EconomicEvent {
        EconomicEvent {
            time: time.into(),
            currency: currency.into(),
            impact,
            name: name.into(),
            translated_name: format!("{name}-bg"),
        }
    }

    #[test]
    fn empty_input_yields_the_fixed_message() {
        let r = format_report(&[]);
        assert_eq!(r.lines, vec![NO_EVENTS_MESSAGE.to_string()]);
    }

    #[test]
    fn single_event_summary_and_detail() {
        let r = format_report(&[ev("08:30", "USD", Impact::High, "CPI Release")]);
        let text = r.to_text();
        assert!(text.contains("USD: High=1, Medium=0, Low=0"));
        assert!(text.contains("08:30 | USD | Impact:High | CPI Release (CPI Release-bg)"));
    }

    #[test]
    fn groups_keep_first_occurrence_order_and_details_keep_fetch_order() {
        let events = vec![
            ev("08:30", "JPY", Impact::Low, "a"),
            ev("09:00", "USD", Impact::High, "b"),
            ev("09:30", "JPY", Impact::Medium, "c"),
        ];
        let r = format_report(&events);
        let jpy = r.lines.iter().position(|l| l.starts_with("JPY:")).unwrap();
        let usd = r.lines.iter().position(|l| l.starts_with("USD:")).unwrap();
        assert!(jpy < usd);
        assert_eq!(r.lines[jpy], "JPY: High=0, Medium=1, Low=1");

        let a = r.lines.iter().position(|l| l.contains("| a (")).unwrap();
        let b = r.lines.iter().position(|l| l.contains("| b (")).unwrap();
        let c = r.lines.iter().position(|l| l.contains("| c (")).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn each_detail_line_carries_a_volatility_note() {
        let events = vec![
            ev("08:30", "USD", Impact::High, "CPI Release"),
            ev("09:00", "EUR", Impact::Medium, "PMI"),
            ev("10:00", "JPY", Impact::Low, "Leading Index"),
        ];
        let r = format_report(&events);
        let detail = r
            .lines
            .iter()
            .position(|l| l.contains("| CPI Release ("))
            .unwrap();
        assert_eq!(r.lines[detail + 1], "⚡ Strong volatility expected for USD");

        let text = r.to_text();
        assert!(text.contains("🔹 Moderate moves possible for EUR"));
        assert!(text.contains("🔸 Low impact"));
    }

    #[test]
    fn unknown_impact_counts_in_no_bucket() {
        let r = format_report(&[ev("10:00", "GBP", Impact::Unknown, "mystery")]);
        assert!(r.to_text().contains("GBP: High=0, Medium=0, Low=0"));
        assert!(r.to_text().contains("Impact:Unknown"));
    }
}
