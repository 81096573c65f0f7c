//! Notification transports for recap.
//!
//! Each transport implements [`Notifier`]. [`dispatch`] sends one report to
//! every selected transport in turn, splitting it into chunks for transports
//! with a message length cap, and collects per-transport outcomes.

mod chunk;
mod facebook;
mod pushbullet;
mod selection;
mod webhook;

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use chunk::chunk_message;
pub use facebook::FacebookNotifier;
pub use pushbullet::PushbulletNotifier;
pub use selection::{ALL_CODE, NotifierKind, NotifierSelection};
pub use webhook::WebhookNotifier;

/// Default request timeout for transport calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The transport was selected but its credentials are not configured.
    #[error("{kind} is not configured: missing {missing}")]
    NotConfigured {
        kind: NotifierKind,
        missing: &'static str,
    },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service rejected the message.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A destination for the rendered report.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn kind(&self) -> NotifierKind;

    /// Largest message the transport accepts, in characters.
    fn max_message_len(&self) -> Option<usize> {
        None
    }

    /// Sends one message. `body` already fits within [`Self::max_message_len`].
    async fn send(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Credentials for every transport; each is optional until selected.
#[derive(Clone, Default)]
pub struct Credentials {
    pub pushbullet_api_key: Option<String>,
    pub facebook_access_token: Option<String>,
    pub facebook_group_id: Option<String>,
    pub webhook_url: Option<String>,
}

fn required(
    value: Option<&str>,
    kind: NotifierKind,
    missing: &'static str,
) -> Result<String, NotifyError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(NotifyError::NotConfigured { kind, missing })
}

/// Builds the transport for `kind` from its credentials.
pub fn build_notifier(
    kind: NotifierKind,
    credentials: &Credentials,
) -> Result<Box<dyn Notifier>, NotifyError> {
    match kind {
        NotifierKind::Pushbullet => {
            let api_key = required(
                credentials.pushbullet_api_key.as_deref(),
                kind,
                "pushbullet_api_key",
            )?;
            Ok(Box::new(PushbulletNotifier::new(api_key)?))
        }
        NotifierKind::Facebook => {
            let token = required(
                credentials.facebook_access_token.as_deref(),
                kind,
                "facebook_access_token",
            )?;
            let group = required(
                credentials.facebook_group_id.as_deref(),
                kind,
                "facebook_group_id",
            )?;
            Ok(Box::new(FacebookNotifier::new(token, group)?))
        }
        NotifierKind::Webhook => {
            let url = required(credentials.webhook_url.as_deref(), kind, "webhook_url")?;
            Ok(Box::new(WebhookNotifier::new(url)?))
        }
    }
}

/// Outcome of a dispatch, per transport.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: Vec<NotifierKind>,
    pub failed: Vec<(NotifierKind, NotifyError)>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sends `message` to every selected transport, one at a time.
///
/// A transport that cannot be built (e.g. missing credentials) is recorded as
/// failed; the remaining transports are still attempted.
pub async fn dispatch(
    selection: &NotifierSelection,
    credentials: &Credentials,
    title: &str,
    message: &str,
) -> DispatchReport {
    let mut notifiers = Vec::new();
    let mut report = DispatchReport::default();
    for &kind in selection.kinds() {
        match build_notifier(kind, credentials) {
            Ok(notifier) => notifiers.push(notifier),
            Err(err) => {
                tracing::error!(notifier = %kind, error = %err, "notifier unavailable");
                report.failed.push((kind, err));
            }
        }
    }

    let delivered = deliver(&notifiers, title, message).await;
    report.delivered = delivered.delivered;
    report.failed.extend(delivered.failed);
    report
}

/// Sends `message` through already-built transports, one at a time.
pub async fn deliver(
    notifiers: &[Box<dyn Notifier>],
    title: &str,
    message: &str,
) -> DispatchReport {
    let mut report = DispatchReport::default();
    for notifier in notifiers {
        let kind = notifier.kind();
        match send_chunked(notifier.as_ref(), title, message).await {
            Ok(chunks) => {
                tracing::info!(notifier = %kind, chunks, "summary delivered");
                report.delivered.push(kind);
            }
            Err(err) => {
                tracing::error!(notifier = %kind, error = %err, "summary delivery failed");
                report.failed.push((kind, err));
            }
        }
    }
    report
}

/// Sends `message` in sequential chunks; returns how many were sent.
///
/// Titles of multi-chunk messages are suffixed with `(i/n)`. Stops at the
/// first failed chunk.
pub async fn send_chunked(
    notifier: &dyn Notifier,
    title: &str,
    message: &str,
) -> Result<usize, NotifyError> {
    let chunks = chunk_message(message, notifier.max_message_len().unwrap_or(0));
    let total = chunks.len();
    for (index, chunk) in chunks.iter().enumerate() {
        if total == 1 {
            notifier.send(title, chunk).await?;
        } else {
            let numbered = format!("{title} ({}/{total})", index + 1);
            notifier.send(&numbered, chunk).await?;
        }
    }
    Ok(total)
}

pub(crate) fn build_http_client() -> Result<reqwest::Client, NotifyError> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(NotifyError::ClientBuild)
}

pub(crate) async fn check_response(response: reqwest::Response) -> Result<(), NotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await?;
    Err(api_error(status.as_u16(), &body))
}

/// Pushbullet and the Graph API both report `{"error": {"message": ...}}`.
fn api_error(status: u16, body: &str) -> NotifyError {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    let message = serde_json::from_str::<ErrorPayload>(body)
        .map_or_else(|_| body.trim().to_string(), |payload| payload.error.message);
    NotifyError::Api { status, message }
}
