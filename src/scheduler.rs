// src/scheduler.rs
// The daily loop: compute the next trigger in the configured timezone,
// sleep until it, run one fetch→format→chunk→deliver cycle, repeat.
// Cycle errors are caught at the loop boundary; nothing here is fatal.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use chrono_tz::Tz;
use metrics::counter;

use crate::calendar;
use crate::calendar::types::CalendarSource;
use crate::config::BotConfig;
use crate::notify::{send_long_message, ChannelSink};
use crate::report::format_report;
use crate::translate::Translator;

pub const FETCH_FAILED_MESSAGE: &str = "❌ An error occurred while fetching news.";
pub const CYCLE_FAILED_MESSAGE: &str = "❌ Failed to fetch or publish today's news.";
const DELIVERY_PREFIX: &str = "📢 Forex news:";

/// Cooldown after a cycle before recomputing the next target, so clock or
/// timezone edge cases cannot re-trigger in a tight loop.
const POST_CYCLE_COOLDOWN: std::time::Duration = std::time::Duration::from_secs(30);

/// Next daily trigger at `hour:minute` wall clock in `tz`, at or after
/// `now`; only a target already in the past rolls to tomorrow, so a call
/// exactly at the trigger instant fires immediately (the post-cycle
/// cooldown keeps that from re-triggering). A DST-ambiguous local time
/// resolves to its earliest instant; a nonexistent one (spring-forward
/// gap) slides one hour later.
pub fn next_trigger(now: DateTime<Utc>, tz: Tz, hour: u32, minute: u32) -> DateTime<Utc> {
    let local_now = now.with_timezone(&tz);
    let mut date = local_now.date_naive();

    loop {
        let naive = date
            .and_hms_opt(hour, minute, 0)
            .expect("hour/minute validated at config load");
        let candidate = tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(naive + ChronoDuration::hours(1))).earliest());
        if let Some(t) = candidate {
            let t_utc = t.with_timezone(&Utc);
            if t_utc >= now {
                return t_utc;
            }
        }
        date = date + ChronoDuration::days(1);
    }
}

/// One delivery cycle: fetch, format, chunk, send. A source outage is
/// reported to the channel as a short notice instead of a digest.
pub async fn run_cycle(
    cfg: &BotConfig,
    primary: &dyn CalendarSource,
    fallback: &dyn CalendarSource,
    translator: &dyn Translator,
    sink: &dyn ChannelSink,
) -> anyhow::Result<usize> {
    let report = match calendar::fetch_events(
        primary,
        fallback,
        translator,
        cfg.result_limit,
        &cfg.filters,
    )
    .await
    {
        Ok(events) => format_report(&events),
        Err(e) => {
            tracing::warn!(error = %e, "calendar sources unavailable");
            counter!("scheduler_source_outages_total").increment(1);
            sink.send_text(FETCH_FAILED_MESSAGE).await?;
            return Ok(1);
        }
    };

    let text = format!("{DELIVERY_PREFIX}\n\n{}", report.to_text());
    let delivered = send_long_message(sink, &text, cfg.max_message_len, cfg.send_pace).await;
    Ok(delivered)
}

/// Run the daily loop forever. Waiting and delivering alternate; errors in
/// a cycle are logged, a best-effort failure notice is posted, and the loop
/// carries on to the next day.
pub async fn run_loop(
    cfg: BotConfig,
    primary: Box<dyn CalendarSource>,
    fallback: Box<dyn CalendarSource>,
    translator: Box<dyn Translator>,
    sink: Box<dyn ChannelSink>,
) {
    loop {
        let now = Utc::now();
        let target = next_trigger(now, cfg.timezone, cfg.post_hour, cfg.post_minute);
        let wait = (target - now).to_std().unwrap_or_default();
        tracing::info!(
            target_time = %target.with_timezone(&cfg.timezone),
            wait_mins = wait.as_secs() / 60,
            "waiting for next post"
        );
        tokio::time::sleep(wait).await;

        tracing::info!("fetching news");
        match run_cycle(&cfg, primary.as_ref(), fallback.as_ref(), translator.as_ref(), sink.as_ref())
            .await
        {
            Ok(parts) => {
                counter!("scheduler_cycles_total").increment(1);
                tracing::info!(parts, "news published");
            }
            Err(e) => {
                counter!("scheduler_cycle_failures_total").increment(1);
                tracing::error!(error = ?e, "delivery cycle failed");
                if let Err(e2) = sink.send_text(CYCLE_FAILED_MESSAGE).await {
                    tracing::warn!(error = ?e2, "failure notice could not be sent");
                }
            }
        }

        tokio::time::sleep(POST_CYCLE_COOLDOWN).await;
    }
}
