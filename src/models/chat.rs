use serde::{ Serialize, Deserialize };
use std::fmt;

pub type ConversationId = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Bot,
}

/// Local reconciliation marker for a message. Never sent over the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Delivery {
    #[default]
    Delivered,
    /// Optimistically shown, waiting on the send request identified by the ticket.
    Pending(u64),
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(skip)]
    pub delivery: Delivery,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: MessageKind::User, delivery: Delivery::Delivered }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: MessageKind::Bot, delivery: Delivery::Delivered }
    }

    pub fn is_from_user(&self) -> bool {
        self.kind == MessageKind::User
    }
}

/// List form of a conversation: messages are not loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
}

impl ConversationSummary {
    pub fn new(id: ConversationId) -> Self {
        Self { id }
    }

    /// 1-based number shown to the user.
    pub fn display_index(&self) -> i64 {
        self.id.saturating_add(1)
    }
}

impl fmt::Display for ConversationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Conversation {}", self.display_index())
    }
}

/// The selected conversation with its messages loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveConversation {
    pub summary: ConversationSummary,
    pub messages: Vec<Message>,
}

impl ActiveConversation {
    pub fn new(summary: ConversationSummary, messages: Vec<Message>) -> Self {
        Self { summary, messages }
    }

    pub fn id(&self) -> ConversationId {
        self.summary.id
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub content: String,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl ApiMessage {
    pub fn bot(content: impl Into<String>) -> Self {
        Self { content: content.into(), role: None }
    }
}

impl From<ApiMessage> for Message {
    fn from(msg: ApiMessage) -> Self {
        match msg.role.as_deref() {
            Some(role) if role.eq_ignore_ascii_case("user") => Message::user(msg.content),
            _ => Message::bot(msg.content),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}
