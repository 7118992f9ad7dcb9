use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    pub fn is_user(self) -> bool {
        self == Sender::User
    }

    pub fn is_bot(self) -> bool {
        self == Sender::Bot
    }
}

impl TryFrom<&str> for Sender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            _ => Err(format!("invalid sender: {value}")),
        }
    }
}

impl TryFrom<String> for Sender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        value.as_str().to_string()
    }
}

/// Sentiment polarity attached to bot replies and mood-trend points.
///
/// The chat endpoint historically reports lowercase labels while the trend
/// endpoint reports uppercase ones, so parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(Sentiment::Positive),
            "NEGATIVE" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

impl TryFrom<&str> for Sentiment {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Sentiment::parse(value).ok_or_else(|| format!("invalid sentiment label: {value}"))
    }
}

impl TryFrom<String> for Sentiment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Sentiment> for String {
    fn from(value: Sentiment) -> Self {
        value.as_str().to_string()
    }
}

/// One entry in the conversation transcript. The transcript is append-only;
/// entries are never mutated or removed once pushed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ChatMessage {
    /// A user-authored message. User messages never carry sentiment data.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            sentiment: None,
            confidence: None,
        }
    }

    pub fn bot(
        text: impl Into<String>,
        sentiment: Option<Sentiment>,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            sentiment,
            confidence,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    pub fn is_bot(&self) -> bool {
        self.sender.is_bot()
    }

    /// Human-readable sentiment annotation, e.g. `Sentiment: POSITIVE (87%)`.
    pub fn sentiment_note(&self) -> Option<String> {
        let sentiment = self.sentiment?;
        match self.confidence {
            Some(confidence) => Some(format!(
                "Sentiment: {} ({:.0}%)",
                sentiment.as_str(),
                confidence * 100.0
            )),
            None => Some(format!("Sentiment: {}", sentiment.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_labels_parse_case_insensitively() {
        assert_eq!(Sentiment::parse("POSITIVE"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse("positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse("Negative"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse("neutral"), None);
        assert_eq!(Sentiment::parse(""), None);
    }

    #[test]
    fn user_messages_never_carry_sentiment() {
        let msg = ChatMessage::user("Hello");
        assert!(msg.is_user());
        assert!(msg.sentiment.is_none());
        assert!(msg.confidence.is_none());
        assert!(msg.sentiment_note().is_none());
    }

    #[test]
    fn sentiment_note_formats_confidence_as_percentage() {
        let msg = ChatMessage::bot("Hi there", Some(Sentiment::Positive), Some(0.87));
        assert_eq!(
            msg.sentiment_note().as_deref(),
            Some("Sentiment: POSITIVE (87%)")
        );

        let bare = ChatMessage::bot("Hi", Some(Sentiment::Negative), None);
        assert_eq!(bare.sentiment_note().as_deref(), Some("Sentiment: NEGATIVE"));
    }

    #[test]
    fn invalid_sender_strings_are_rejected() {
        assert!(Sender::try_from("system").is_err());
        assert_eq!(Sender::try_from("bot"), Ok(Sender::Bot));
    }
}
