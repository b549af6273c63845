// src/translate.rs
// Best-effort translation of event names. This is an enrichment step only:
// any failure (network, timeout, malformed body) degrades to the original
// text, never to an error at the caller.

use std::time::Duration;

use reqwest::Client;

const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";
const DEFAULT_TIMEOUT_SECS: u64 = 8;

#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text`. Never fails; callers must not assume success.
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String;
}

/// Uses the public Google web-translate endpoint (the `gtx` client).
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            endpoint: GOOGLE_TRANSLATE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Point the adapter at a different endpoint (tests, proxies).
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    async fn try_translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> anyhow::Result<String> {
        let resp = self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        // Shape: [[["translated","original",...], ...], ...] — one segment
        // per sentence; join the first column of each segment.
        let segments = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow::anyhow!("unexpected translate response shape"))?;
        let out: String = segments
            .iter()
            .filter_map(|seg| seg.get(0).and_then(|s| s.as_str()))
            .collect();
        if out.is_empty() {
            anyhow::bail!("empty translation");
        }
        Ok(out)
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        match self.try_translate(text, source_lang, target_lang).await {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!(error = ?e, "translation failed, passing text through");
                text.to_string()
            }
        }
    }
}

/// Pass-through translator for tests and offline runs.
pub struct NoopTranslator;

#[async_trait::async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, text: &str, _source_lang: &str, _target_lang: &str) -> String {
        text.to_string()
    }
}
