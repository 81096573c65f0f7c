//! Chat webhook posts (Discord-style `{"content": ...}` payloads).

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::{Notifier, NotifierKind, NotifyError, build_http_client, check_response};

/// Per-message character cap of chat webhooks.
const MAX_CONTENT_CHARS: usize = 2000;

/// Posts the report to a chat webhook.
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

// Webhook URLs embed their secret, so the whole URL is redacted.
impl fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("url", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        Ok(Self {
            http: build_http_client()?,
            url: url.into(),
        })
    }
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn kind(&self) -> NotifierKind {
        NotifierKind::Webhook
    }

    fn max_message_len(&self) -> Option<usize> {
        Some(MAX_CONTENT_CHARS)
    }

    async fn send(&self, _title: &str, body: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.url)
            .json(&WebhookMessage { content: body })
            .send()
            .await?;
        check_response(response).await
    }
}
