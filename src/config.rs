// src/config.rs
// Immutable runtime configuration, built once at startup from the
// environment and passed by reference into every component. No ambient
// globals after this point.

use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;

use crate::calendar::types::{FilterCriteria, Impact};

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Daily trigger, wall clock in `timezone`.
    pub post_hour: u32,
    pub post_minute: u32,
    pub timezone: Tz,

    pub fcs_api_key: Option<String>,
    pub discord_webhook_url: String,

    pub filters: FilterCriteria,
    /// Raw importance codes ("3","2",...) forwarded to the primary API query.
    pub importance_codes: Vec<String>,

    pub result_limit: usize,
    /// Max characters per delivered message part.
    pub max_message_len: usize,
    /// Delay between successive message parts.
    pub send_pace: std::time::Duration,
    pub port: u16,
}

impl BotConfig {
    /// Read configuration from the process environment.
    ///
    /// `DISCORD_WEBHOOK_URL` is the only hard requirement; everything else
    /// has a default matching the original deployment (07:00 Europe/Sofia,
    /// importances 2+3, no currency restriction).
    pub fn from_env() -> Result<Self> {
        let post_hour = parse_env_or("POST_HOUR", 7u32)?;
        let post_minute = parse_env_or("POST_MINUTE", 0u32)?;
        if post_hour > 23 || post_minute > 59 {
            return Err(anyhow!(
                "invalid trigger time {post_hour:02}:{post_minute:02}"
            ));
        }

        let tz_name = std::env::var("TIMEZONE").unwrap_or_else(|_| "Europe/Sofia".to_string());
        let timezone: Tz = tz_name
            .parse()
            .map_err(|e| anyhow!("unknown TIMEZONE {tz_name:?}: {e}"))?;

        let discord_webhook_url = std::env::var("DISCORD_WEBHOOK_URL")
            .context("DISCORD_WEBHOOK_URL not set")?
            .trim()
            .to_string();
        if discord_webhook_url.is_empty() {
            return Err(anyhow!("DISCORD_WEBHOOK_URL is empty"));
        }

        let fcs_api_key = std::env::var("FCS_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let importance_codes = split_csv(
            &std::env::var("FILTER_IMPORTANCES").unwrap_or_else(|_| "2,3".to_string()),
        );
        let importances: BTreeSet<Impact> = importance_codes
            .iter()
            .map(|code| Impact::from_raw(Some(code.as_str())))
            .collect();

        let result_limit = parse_env_or("RESULT_LIMIT", 50usize)?;
        if result_limit == 0 {
            return Err(anyhow!("RESULT_LIMIT must be at least 1"));
        }
        let max_message_len = parse_env_or("MAX_MESSAGE_LEN", 1900usize)?;
        if max_message_len == 0 {
            return Err(anyhow!("MAX_MESSAGE_LEN must be at least 1"));
        }

        let currencies: BTreeSet<String> =
            split_csv(&std::env::var("FILTER_CURRENCIES").unwrap_or_default())
                .into_iter()
                .map(|c| c.to_ascii_uppercase())
                .collect();

        Ok(Self {
            post_hour,
            post_minute,
            timezone,
            fcs_api_key,
            discord_webhook_url,
            filters: FilterCriteria {
                currencies,
                importances,
            },
            importance_codes,
            result_limit,
            max_message_len,
            send_pace: crate::notify::SEND_PACE,
            port: parse_env_or("PORT", 10000u16)?,
        })
    }
}

fn parse_env_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("parsing {key}={v:?}")),
        _ => Ok(default),
    }
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
