// src/notify/discord.rs
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;

use super::ChannelSink;

/// Posts plain-text messages to a Discord channel via webhook.
#[derive(Clone)]
pub struct DiscordWebhook {
    webhook: String,
    client: Client,
    timeout: Duration,
}

impl DiscordWebhook {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

#[async_trait::async_trait]
impl ChannelSink for DiscordWebhook {
    async fn send_text(&self, text: &str) -> Result<()> {
        self.client
            .post(&self.webhook)
            .timeout(self.timeout)
            .json(&WebhookPayload { content: text })
            .send()
            .await
            .context("discord webhook request failed")?
            .error_for_status()
            .context("discord webhook non-2xx")?;
        Ok(())
    }
}
