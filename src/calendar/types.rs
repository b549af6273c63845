// src/calendar/types.rs
use std::collections::BTreeSet;
use std::fmt;

use anyhow::Result;

/// Categorical severity of an economic event. Upstream sources encode this
/// as numeric string codes; the mapping here is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
    Unknown,
}

impl Impact {
    /// "3" -> High, "2" -> Medium, any other non-empty value -> Low,
    /// absent/empty -> Unknown.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("3") => Impact::High,
            Some("2") => Impact::Medium,
            Some(s) if !s.is_empty() => Impact::Low,
            _ => Impact::Unknown,
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
            Impact::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Canonical event shape after adapting away source-specific field naming.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EconomicEvent {
    pub time: String,
    /// Uppercase ISO-like currency code, or empty when the source omits it.
    pub currency: String,
    pub impact: Impact,
    /// Event name in the source language.
    pub name: String,
    /// Best-effort translation; falls back to `name`.
    pub translated_name: String,
}

/// Pure predicate over [`EconomicEvent`]. An empty set means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub currencies: BTreeSet<String>,
    pub importances: BTreeSet<Impact>,
}

impl FilterCriteria {
    pub fn matches(&self, ev: &EconomicEvent) -> bool {
        let currency_ok =
            self.currencies.is_empty() || self.currencies.contains(&ev.currency.to_ascii_uppercase());
        let impact_ok = self.importances.is_empty() || self.importances.contains(&ev.impact);
        currency_ok && impact_ok
    }
}

/// One upstream calendar source (primary API or scrape fallback).
#[async_trait::async_trait]
pub trait CalendarSource: Send + Sync {
    async fn fetch(&self, limit: usize) -> Result<Vec<EconomicEvent>>;
    fn name(&self) -> &'static str;
}

/// Raised only when every configured source failed. An `Ok(vec![])` from the
/// pipeline means "no events today", which is a different condition.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("all calendar sources failed: {reasons}")]
    Unavailable { reasons: String },
}
