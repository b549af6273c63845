// tests/pipeline_e2e.rs
// Full delivery cycle with mock sources and a recording sink.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use forex_calendar_bot::calendar::types::{
    CalendarSource, EconomicEvent, FilterCriteria, Impact,
};
use forex_calendar_bot::config::BotConfig;
use forex_calendar_bot::notify::ChannelSink;
use forex_calendar_bot::report::NO_EVENTS_MESSAGE;
use forex_calendar_bot::scheduler::{run_cycle, FETCH_FAILED_MESSAGE};

struct FixedSource(Vec<EconomicEvent>);
struct FailingSource;

#[async_trait]
impl CalendarSource for FixedSource {
    async fn fetch(&self, _limit: usize) -> Result<Vec<EconomicEvent>> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &'static str {
        "Fixed"
    }
}

#[async_trait]
impl CalendarSource for FailingSource {
    async fn fetch(&self, _limit: usize) -> Result<Vec<EconomicEvent>> {
        Err(anyhow!("connection refused"))
    }
    fn name(&self) -> &'static str {
        "Failing"
    }
}

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl ChannelSink for RecordingSink {
    async fn send_text(&self, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct EchoTranslator;

#[async_trait]
impl forex_calendar_bot::translate::Translator for EchoTranslator {
    async fn translate(&self, text: &str, _sl: &str, _tl: &str) -> String {
        format!("bg:{text}")
    }
}

fn test_config() -> BotConfig {
    BotConfig {
        post_hour: 7,
        post_minute: 0,
        timezone: chrono_tz::Europe::Sofia,
        fcs_api_key: Some("k".into()),
        discord_webhook_url: "https://discord.test/hook".into(),
        filters: FilterCriteria::default(),
        importance_codes: vec!["2".into(), "3".into()],
        result_limit: 50,
        max_message_len: 1900,
        send_pace: std::time::Duration::ZERO,
        port: 0,
    }
}

fn cpi_event() -> EconomicEvent {
    EconomicEvent {
        time: "08:30".into(),
        currency: "USD".into(),
        impact: Impact::High,
        name: "CPI Release".into(),
        translated_name: "CPI Release".into(),
    }
}

#[tokio::test]
async fn happy_path_delivers_summary_and_detail() {
    let cfg = test_config();
    let sink = RecordingSink::default();

    let delivered = run_cycle(
        &cfg,
        &FixedSource(vec![cpi_event()]),
        &FailingSource,
        &EchoTranslator,
        &sink,
    )
    .await
    .unwrap();

    assert_eq!(delivered, 1);
    let sent = sink.sent.lock().unwrap();
    let text = sent.join("\n");
    assert!(text.contains("USD: High=1, Medium=0, Low=0"));
    assert!(text.contains("08:30 | USD | Impact:High | CPI Release (bg:CPI Release)"));
}

#[tokio::test]
async fn primary_down_and_empty_fallback_posts_no_events_message() {
    let cfg = test_config();
    let sink = RecordingSink::default();

    run_cycle(
        &cfg,
        &FailingSource,
        &FixedSource(vec![]),
        &EchoTranslator,
        &sink,
    )
    .await
    .unwrap();

    let sent = sink.sent.lock().unwrap();
    assert!(sent.join("\n").contains(NO_EVENTS_MESSAGE));
}

#[tokio::test]
async fn both_sources_down_posts_fetch_failure_notice() {
    let cfg = test_config();
    let sink = RecordingSink::default();

    let delivered = run_cycle(&cfg, &FailingSource, &FailingSource, &EchoTranslator, &sink)
        .await
        .unwrap();

    assert_eq!(delivered, 1);
    let sent = sink.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], FETCH_FAILED_MESSAGE);
}

#[tokio::test]
async fn currency_filter_drops_other_currencies_before_formatting() {
    let mut cfg = test_config();
    cfg.filters.currencies = ["EUR".to_string()].into();
    let sink = RecordingSink::default();

    run_cycle(
        &cfg,
        &FixedSource(vec![cpi_event()]),
        &FailingSource,
        &EchoTranslator,
        &sink,
    )
    .await
    .unwrap();

    let sent = sink.sent.lock().unwrap();
    assert!(sent.join("\n").contains(NO_EVENTS_MESSAGE));
}

#[tokio::test]
async fn long_reports_arrive_in_order_across_parts() {
    let mut cfg = test_config();
    cfg.max_message_len = 200;
    let events: Vec<EconomicEvent> = (0..40)
        .map(|i| EconomicEvent {
            time: format!("{:02}:00", i % 24),
            currency: "USD".into(),
            impact: Impact::Medium,
            name: format!("Event number {i} with a reasonably long name"),
            translated_name: format!("Event number {i} with a reasonably long name"),
        })
        .collect();
    let sink = RecordingSink::default();

    let delivered = run_cycle(
        &cfg,
        &FixedSource(events),
        &FailingSource,
        &EchoTranslator,
        &sink,
    )
    .await
    .unwrap();

    assert!(delivered > 1);
    let sent = sink.sent.lock().unwrap();
    assert_eq!(sent.len(), delivered);
    for part in sent.iter() {
        assert!(part.chars().count() <= 200);
    }
    // Rejoined parts reconstruct the full report text.
    let rejoined = sent.join("\n");
    assert!(rejoined.contains("Event number 0"));
    assert!(rejoined.contains("Event number 39"));
    assert!(rejoined.contains("USD: High=0, Medium=40, Low=0"));
}
