use serde::{Deserialize, Serialize};

/// Chat surface an event arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatContext {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatContext {
    /// Only multi-party surfaces qualify for XP.
    pub fn is_multiparty(self) -> bool {
        matches!(self, ChatContext::Group | ChatContext::Supergroup)
    }
}

/// One candidate message. Transient: consumed per call, never stored by
/// the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    pub context: ChatContext,
    #[serde(default)]
    pub is_bot: bool,
    /// Unix seconds at which the message was sent.
    pub at: u64,
}

impl ActivityEvent {
    /// Message payload: text, else caption, else empty. An empty text
    /// field falls through to the caption, matching media messages that
    /// carry their words in the caption.
    pub fn payload(&self) -> &str {
        match self.text.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => self.caption.as_deref().unwrap_or(""),
        }
    }
}
