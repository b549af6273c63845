// src/calendar/providers/fcs_api.rs
// Primary source: FCS economy-calendar JSON API. The upstream schema is
// loose, so every field is read through a small alias list and normalized
// into `EconomicEvent` here, keeping schema drift out of the pipeline.

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde_json::Value;

use crate::calendar::types::{CalendarSource, EconomicEvent, Impact};

const FCS_CALENDAR_URL: &str = "https://fcsapi.com/api-v3/forex/economy_cal";

pub struct FcsApiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Raw importance codes forwarded as the `importance` query param.
    importance_codes: Vec<String>,
    timeout: std::time::Duration,
}

impl FcsApiProvider {
    pub fn new(api_key: String, importance_codes: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: FCS_CALENDAR_URL.to_string(),
            api_key,
            importance_codes,
            timeout: std::time::Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Parse an API response body into normalized events.
    pub fn parse_response(body: &str) -> Result<Vec<EconomicEvent>> {
        let t0 = std::time::Instant::now();
        let root: Value = serde_json::from_str(body).context("parsing fcs response json")?;
        let items = root
            .get("response")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut out = Vec::with_capacity(items.len());
        for item in &items {
            if let Some(ev) = normalize_item(item) {
                out.push(ev);
            }
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("calendar_parse_ms").record(ms);
        counter!("calendar_events_total").increment(out.len() as u64);
        Ok(out)
    }
}

/// Adapt one raw API item to the canonical shape. Returns `None` only when
/// no name alias is present at all.
fn normalize_item(item: &Value) -> Option<EconomicEvent> {
    let name = first_string(item, &["event", "title", "name"])?;
    let currency = first_string(item, &["currency", "country"])
        .unwrap_or_default()
        .to_ascii_uppercase();
    let impact_raw = first_scalar(item, &["impact", "importance"]);
    let time = first_string(item, &["time", "date"]).unwrap_or_else(|| "00:00".to_string());

    Some(EconomicEvent {
        time,
        currency,
        impact: Impact::from_raw(impact_raw.as_deref()),
        translated_name: name.clone(),
        name,
    })
}

fn first_string(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| item.get(k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Like `first_string`, but also accepts numeric values ("impact": 3).
fn first_scalar(item: &Value, keys: &[&str]) -> Option<String> {
    for k in keys {
        match item.get(*k) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

#[async_trait]
impl CalendarSource for FcsApiProvider {
    async fn fetch(&self, limit: usize) -> Result<Vec<EconomicEvent>> {
        let importance = self.importance_codes.join(",");
        let limit_s = limit.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("access_key", self.api_key.as_str()),
            ("limit", limit_s.as_str()),
        ];
        if !importance.is_empty() {
            query.push(("importance", importance.as_str()));
        }

        let body = self
            .client
            .get(&self.base_url)
            .timeout(self.timeout)
            .query(&query)
            .send()
            .await
            .context("fcs http get()")?
            .error_for_status()
            .context("fcs non-2xx")?
            .text()
            .await
            .context("fcs http .text()")?;

        Self::parse_response(&body)
    }

    fn name(&self) -> &'static str {
        "FCS"
    }
}
