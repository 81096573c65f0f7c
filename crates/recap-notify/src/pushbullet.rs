//! Pushbullet push notes.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::{Notifier, NotifierKind, NotifyError, build_http_client, check_response};

const PUSHES_URL: &str = "https://api.pushbullet.com/v2/pushes";

/// Sends the report as a Pushbullet note.
pub struct PushbulletNotifier {
    http: reqwest::Client,
    api_key: String,
}

impl fmt::Debug for PushbulletNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushbulletNotifier")
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl PushbulletNotifier {
    pub fn new(api_key: impl Into<String>) -> Result<Self, NotifyError> {
        Ok(Self {
            http: build_http_client()?,
            api_key: api_key.into(),
        })
    }
}

#[derive(Debug, Serialize)]
struct NotePush<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    body: &'a str,
}

fn note<'a>(title: &'a str, body: &'a str) -> NotePush<'a> {
    NotePush {
        kind: "note",
        title,
        body,
    }
}

#[async_trait]
impl Notifier for PushbulletNotifier {
    fn kind(&self) -> NotifierKind {
        NotifierKind::Pushbullet
    }

    async fn send(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(PUSHES_URL)
            .header("Access-Token", &self.api_key)
            .json(&note(title, body))
            .send()
            .await?;
        check_response(response).await
    }
}
