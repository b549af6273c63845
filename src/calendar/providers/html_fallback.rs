// src/calendar/providers/html_fallback.rs
// Secondary source: scrapes a calendar page by structural markers (row and
// cell class attributes) instead of an API contract. Inherently fragile;
// rows that do not match degrade to an empty result rather than an error.
// Only transport failures surface as errors.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::calendar::types::{CalendarSource, EconomicEvent, Impact};

const CALENDAR_PAGE_URL: &str = "https://www.investing.com/economic-calendar/";

pub struct HtmlFallbackProvider {
    client: reqwest::Client,
    url: String,
    timeout: std::time::Duration,
}

impl HtmlFallbackProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            url: CALENDAR_PAGE_URL.to_string(),
            timeout: std::time::Duration::from_secs(10),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Parse an event table out of a calendar page.
    pub fn parse_page(html: &str) -> Vec<EconomicEvent> {
        let t0 = std::time::Instant::now();

        static RE_ROW: OnceCell<Regex> = OnceCell::new();
        let re_row = RE_ROW.get_or_init(|| {
            Regex::new(r#"(?is)<tr[^>]*class="[^"]*(?:js-event-item|event-item)[^"]*"[^>]*>(.*?)</tr>"#)
                .unwrap()
        });
        static RE_CELL: OnceCell<Regex> = OnceCell::new();
        let re_cell = RE_CELL
            .get_or_init(|| Regex::new(r#"(?is)<td([^>]*)>(.*?)</td>"#).unwrap());

        let mut out = Vec::new();
        for row in re_row.captures_iter(html) {
            let mut time = String::new();
            let mut currency = String::new();
            let mut impact = Impact::Unknown;
            let mut name = String::new();

            for cell in re_cell.captures_iter(&row[1]) {
                let attrs = cell[1].to_ascii_lowercase();
                let inner = &cell[2];
                if attrs.contains("time") && time.is_empty() {
                    time = inner_text(inner);
                } else if attrs.contains("flagcur") || attrs.contains("currency") {
                    // Cell holds a flag icon plus the code; keep the last token.
                    currency = inner_text(inner)
                        .split_whitespace()
                        .last()
                        .unwrap_or_default()
                        .to_ascii_uppercase();
                } else if attrs.contains("sentiment") {
                    impact = impact_from_icons(inner);
                } else if attrs.contains("event") {
                    name = inner_text(inner);
                }
            }

            if name.is_empty() {
                continue;
            }
            if time.is_empty() {
                time = "00:00".to_string();
            }
            out.push(EconomicEvent {
                time,
                currency,
                impact,
                translated_name: name.clone(),
                name,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("calendar_parse_ms").record(ms);
        counter!("calendar_events_total").increment(out.len() as u64);
        out
    }
}

impl Default for HtmlFallbackProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Filled "bull" icons encode importance on the scraped page: three icons
/// for high, two for medium, one for low.
fn impact_from_icons(cell: &str) -> Impact {
    let filled = cell.to_ascii_lowercase().matches("fullbullishicon").count();
    match filled {
        n if n >= 3 => Impact::High,
        2 => Impact::Medium,
        1 => Impact::Low,
        _ => Impact::Unknown,
    }
}

/// Strip tags, decode entities, collapse whitespace.
fn inner_text(html: &str) -> String {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());

    let no_tags = re_tags.replace_all(html, " ");
    let decoded = html_escape::decode_html_entities(no_tags.as_ref()).to_string();
    re_ws.replace_all(&decoded, " ").trim().to_string()
}

#[async_trait]
impl CalendarSource for HtmlFallbackProvider {
    async fn fetch(&self, limit: usize) -> Result<Vec<EconomicEvent>> {
        let body = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .header("User-Agent", "Mozilla/5.0 (compatible; forex-calendar-bot)")
            .send()
            .await
            .context("calendar page get()")?
            .error_for_status()
            .context("calendar page non-2xx")?
            .text()
            .await
            .context("calendar page .text()")?;

        let mut events = Self::parse_page(&body);
        events.truncate(limit);
        Ok(events)
    }

    fn name(&self) -> &'static str {
        "CalendarScrape"
    }
}
