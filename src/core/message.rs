use serde::{Deserialize, Serialize};

/// Who authored a transcript entry. The serialized names match the class
/// names the chat server's web widget stores, so history files are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MessageKind {
    User,
    Bot,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::User => "user-msg",
            MessageKind::Bot => "bot-msg",
        }
    }

    pub fn is_user(self) -> bool {
        self == MessageKind::User
    }

    pub fn is_bot(self) -> bool {
        self == MessageKind::Bot
    }
}

impl AsRef<str> for MessageKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for MessageKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user-msg" => Ok(MessageKind::User),
            "bot-msg" => Ok(MessageKind::Bot),
            _ => Err(format!("invalid message type: {value}")),
        }
    }
}

impl TryFrom<String> for MessageKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<MessageKind> for String {
    fn from(value: MessageKind) -> Self {
        value.as_str().to_string()
    }
}

fn default_allow_actions() -> bool {
    true
}

/// One transcript entry. Entries are never edited after creation; the log
/// only grows, gets cleared, or gets replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(rename = "allowActions", default = "default_allow_actions")]
    pub allow_actions: bool,
}

impl Message {
    pub fn new(text: impl Into<String>, kind: MessageKind, allow_actions: bool) -> Self {
        Self {
            text: text.into(),
            kind,
            allow_actions,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::User, true)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Bot, true)
    }

    /// A bot-authored line with no copy/edit affordances (status notes such
    /// as the listening indicator).
    pub fn bot_status(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::Bot, false)
    }

    pub fn user_status(text: impl Into<String>) -> Self {
        Self::new(text, MessageKind::User, false)
    }

    pub fn is_user(&self) -> bool {
        self.kind.is_user()
    }

    pub fn is_bot(&self) -> bool {
        self.kind.is_bot()
    }

    /// Copy and edit are only offered on bot replies that allow actions.
    pub fn has_actions(&self) -> bool {
        self.allow_actions && self.kind.is_bot()
    }
}

/// Positions (into `messages`) of the entries that carry copy/edit actions,
/// in transcript order. The n-th actionable reply is `ordinal` n (1-based).
pub fn actionable_indices(messages: &[Message]) -> Vec<usize> {
    messages
        .iter()
        .enumerate()
        .filter(|(_, msg)| msg.has_actions())
        .map(|(idx, _)| idx)
        .collect()
}
