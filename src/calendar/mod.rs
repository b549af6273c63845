// src/calendar/mod.rs
pub mod providers;
pub mod types;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::calendar::types::{CalendarSource, EconomicEvent, FilterCriteria, SourceError};
use crate::translate::Translator;

/// Target language for event-name translation.
pub const TRANSLATE_TARGET_LANG: &str = "bg";
const TRANSLATE_SOURCE_LANG: &str = "en";

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "calendar_events_total",
            "Total events parsed from calendar sources."
        );
        describe_counter!(
            "calendar_kept_total",
            "Events kept after filtering and truncation."
        );
        describe_counter!(
            "calendar_filtered_total",
            "Events dropped by currency/importance filters."
        );
        describe_counter!(
            "calendar_source_errors_total",
            "Calendar source fetch/parse errors."
        );
        describe_counter!("calendar_fallback_total", "Fetches served by the fallback source.");
        describe_histogram!("calendar_parse_ms", "Source parse time in milliseconds.");
        describe_gauge!(
            "calendar_last_fetch_ts",
            "Unix ts when the calendar pipeline last ran."
        );
    });
}

/// Apply `filters` as a pure predicate, preserving order.
pub fn apply_filters(events: Vec<EconomicEvent>, filters: &FilterCriteria) -> Vec<EconomicEvent> {
    events.into_iter().filter(|ev| filters.matches(ev)).collect()
}

/// Fetch today's events: primary source first, fallback on failure.
///
/// `Ok(vec![])` means the sources answered and there is nothing to report;
/// `Err(SourceError::Unavailable)` means every source failed. Retained
/// events get a best-effort translated name.
pub async fn fetch_events(
    primary: &dyn CalendarSource,
    fallback: &dyn CalendarSource,
    translator: &dyn Translator,
    limit: usize,
    filters: &FilterCriteria,
) -> Result<Vec<EconomicEvent>, SourceError> {
    ensure_metrics_described();

    let raw = match primary.fetch(limit).await {
        Ok(v) => v,
        Err(primary_err) => {
            tracing::warn!(error = ?primary_err, source = primary.name(), "primary source failed, trying fallback");
            counter!("calendar_source_errors_total").increment(1);
            match fallback.fetch(limit).await {
                Ok(v) => {
                    counter!("calendar_fallback_total").increment(1);
                    v
                }
                Err(fallback_err) => {
                    counter!("calendar_source_errors_total").increment(1);
                    return Err(SourceError::Unavailable {
                        reasons: format!(
                            "{}: {primary_err:#}; {}: {fallback_err:#}",
                            primary.name(),
                            fallback.name()
                        ),
                    });
                }
            }
        }
    };

    let total = raw.len();
    let mut kept = apply_filters(raw, filters);
    let filtered_out = total - kept.len();
    kept.truncate(limit);

    counter!("calendar_kept_total").increment(kept.len() as u64);
    counter!("calendar_filtered_total").increment(filtered_out as u64);
    gauge!("calendar_last_fetch_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    for ev in &mut kept {
        ev.translated_name = translator
            .translate(&ev.name, TRANSLATE_SOURCE_LANG, TRANSLATE_TARGET_LANG)
            .await;
    }

    Ok(kept)
}
