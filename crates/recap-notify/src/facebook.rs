//! Facebook group feed posts via the Graph API.

use std::fmt;

use async_trait::async_trait;

use crate::{Notifier, NotifierKind, NotifyError, build_http_client, check_response};

const GRAPH_URL: &str = "https://graph.facebook.com";
/// Graph API limit on a post message.
const MAX_POST_CHARS: usize = 63_206;

/// Posts the report to a group feed.
pub struct FacebookNotifier {
    http: reqwest::Client,
    access_token: String,
    group_id: String,
}

impl fmt::Debug for FacebookNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacebookNotifier")
            .field("group_id", &self.group_id)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl FacebookNotifier {
    pub fn new(
        access_token: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        Ok(Self {
            http: build_http_client()?,
            access_token: access_token.into(),
            group_id: group_id.into(),
        })
    }

    fn feed_url(&self) -> String {
        format!("{GRAPH_URL}/{}/feed", self.group_id)
    }
}

#[async_trait]
impl Notifier for FacebookNotifier {
    fn kind(&self) -> NotifierKind {
        NotifierKind::Facebook
    }

    fn max_message_len(&self) -> Option<usize> {
        Some(MAX_POST_CHARS)
    }

    // Feed posts have no title; the intro line already names the server.
    async fn send(&self, _title: &str, body: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(self.feed_url())
            .form(&[("message", body), ("access_token", self.access_token.as_str())])
            .send()
            .await?;
        check_response(response).await
    }
}
