//! Transport codes and the selection built from them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Code that selects every transport.
pub const ALL_CODE: char = 'a';

/// A notification transport, identified by a one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Push notification (`p`).
    Pushbullet,
    /// Group feed post (`f`).
    Facebook,
    /// Chat webhook post (`w`).
    Webhook,
}

impl NotifierKind {
    /// Every transport, in dispatch order.
    pub const ALL: [Self; 3] = [Self::Pushbullet, Self::Facebook, Self::Webhook];

    pub const fn code(self) -> char {
        match self {
            Self::Pushbullet => 'p',
            Self::Facebook => 'f',
            Self::Webhook => 'w',
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pushbullet => "pushbullet",
            Self::Facebook => "facebook",
            Self::Webhook => "webhook",
        }
    }
}

impl fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The set of transports a run dispatches to, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierSelection {
    kinds: Vec<NotifierKind>,
}

impl NotifierSelection {
    pub fn all() -> Self {
        Self {
            kinds: NotifierKind::ALL.to_vec(),
        }
    }

    /// Parses concatenated codes such as `"fp"`.
    ///
    /// `a` anywhere selects everything. Unknown letters are ignored; returns
    /// `None` when no letter names a transport.
    pub fn parse(codes: &str) -> Option<Self> {
        let codes = codes.trim().to_lowercase();
        if codes.contains(ALL_CODE) {
            return Some(Self::all());
        }

        let kinds: Vec<_> = NotifierKind::ALL
            .into_iter()
            .filter(|kind| codes.contains(kind.code()))
            .collect();
        if kinds.is_empty() {
            None
        } else {
            Some(Self { kinds })
        }
    }

    /// Resolves the requested codes, falling back to the configured default
    /// and then to every transport.
    pub fn resolve(requested: &str, default: &str) -> Self {
        if let Some(selection) = Self::parse(requested) {
            return selection;
        }
        tracing::warn!(requested, default, "no valid notifier requested, using default");
        Self::parse(default).unwrap_or_else(|| {
            tracing::warn!(default, "configured default notifier is invalid, using all");
            Self::all()
        })
    }

    pub fn kinds(&self) -> &[NotifierKind] {
        &self.kinds
    }
}

impl fmt::Display for NotifierSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.kinds.iter().map(|kind| kind.as_str()).collect();
        write!(f, "{}", names.join(", "))
    }
}
