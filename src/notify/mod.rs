// src/notify/mod.rs
pub mod discord;

use std::time::Duration;

use anyhow::Result;

use crate::chunk::split_message;

/// Delay between successive message parts, to respect platform pacing.
pub const SEND_PACE: Duration = Duration::from_millis(500);

/// The one thing the core asks of the chat platform: deliver a text message.
#[async_trait::async_trait]
pub trait ChannelSink: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<()>;
}

/// Chunk `text` and send the parts in order with pacing. A failed part is
/// logged and skipped; the remaining parts still go out. Returns how many
/// parts were delivered.
pub async fn send_long_message(
    sink: &dyn ChannelSink,
    text: &str,
    max_len: usize,
    pace: Duration,
) -> usize {
    let parts = split_message(text, max_len);
    let total = parts.len();
    let mut delivered = 0usize;

    for (i, part) in parts.iter().enumerate() {
        match sink.send_text(part).await {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::warn!(error = ?e, part = i + 1, total, "failed to send message part");
            }
        }
        if i + 1 < total {
            tokio::time::sleep(pace).await;
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records sends; fails on attempts listed in `fail_on` (1-based).
    struct RecordingSink {
        sent: Mutex<Vec<String>>,
        attempts: Mutex<usize>,
        fail_on: Vec<usize>,
    }

    impl RecordingSink {
        fn failing_on(fail_on: Vec<usize>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                attempts: Mutex::new(0),
                fail_on,
            }
        }
    }

    #[async_trait::async_trait]
    impl ChannelSink for RecordingSink {
        async fn send_text(&self, text: &str) -> Result<()> {
            let n = {
                let mut attempts = self.attempts.lock().unwrap();
                *attempts += 1;
                *attempts
            };
            if self.fail_on.contains(&n) {
                anyhow::bail!("simulated delivery failure on part {n}");
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn all_parts_are_paced_out() {
        let sink = RecordingSink::failing_on(vec![]);
        let text = "aaaa\nbbbb\ncccc";
        let delivered = send_long_message(&sink, text, 9, Duration::ZERO).await;
        assert_eq!(delivered, 2);
        assert_eq!(sink.sent.lock().unwrap().join("\n"), text);
    }

    #[tokio::test]
    async fn a_failed_part_does_not_abort_the_rest() {
        let sink = RecordingSink::failing_on(vec![1]);
        let delivered = send_long_message(&sink, "aaaa\nbbbb\ncccc", 9, Duration::ZERO).await;
        assert_eq!(delivered, 1);
        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], "cccc");
    }
}
